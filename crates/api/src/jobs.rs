//! Background jobs.

use std::time::Duration;

use balanco_core::recurrence::RunReport;
use balanco_db::{RecurringRepository, RepositoryError};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use sea_orm::DatabaseConnection;

/// Calendar date in `timezone`.
#[must_use]
pub fn today_in(timezone: Tz) -> NaiveDate {
    Utc::now().with_timezone(&timezone).date_naive()
}

/// One materializer run for "today" in `timezone`.
///
/// # Errors
///
/// Returns an error if the due rules cannot be loaded.
pub async fn run_materializer(
    db: &DatabaseConnection,
    timezone: Tz,
) -> Result<RunReport, RepositoryError> {
    let today = today_in(timezone);
    tracing::info!(%today, %timezone, "running recurring materializer");
    RecurringRepository::new(db.clone())
        .materialize_due(today)
        .await
}

/// Runs the materializer every `period`, starting immediately.
///
/// Overlapping runs are safe; each occurrence is claimed once.
pub async fn materializer_task(db: DatabaseConnection, timezone: Tz, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        if let Err(e) = run_materializer(&db, timezone).await {
            tracing::error!(error = %e, "recurring materializer run failed");
        }
    }
}
