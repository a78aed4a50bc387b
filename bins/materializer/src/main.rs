//! Creates today's occurrences of every due recurring rule, then exits.
//!
//! Meant for an external scheduler (cron) when the in-process scheduler is
//! disabled. Safe to run concurrently with the server.

use anyhow::Context;
use chrono_tz::Tz;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use balanco_api::jobs;
use balanco_db::connect;
use balanco_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "balanco=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    let timezone: Tz = config
        .scheduler
        .timezone
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid scheduler timezone: {e}"))?;

    let db = connect(&config.database.url, 1, 1).await?;
    let report = jobs::run_materializer(&db, timezone).await?;

    info!(
        due = report.due,
        created = report.created,
        skipped = report.skipped,
        failed = report.failed,
        deactivated = report.deactivated,
        "Materializer finished"
    );
    if report.failed > 0 {
        anyhow::bail!("{} recurring rules failed", report.failed);
    }
    Ok(())
}
