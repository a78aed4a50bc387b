//! Report routes.

use axum::{Json, Router, extract::State, routing::get};
use balanco_core::reports::{CategoryInfo, ReportFilter, ReportService, ReportSummary};
use balanco_db::{CategoryRepository, TransactionRepository};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::ApiQuery;
use crate::middleware::OrgContext;

/// Query parameters of the summary report.
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    /// `caixa` (payment date) or `competencia` (due date).
    pub basis: Option<String>,
    /// Inclusive start.
    pub from: Option<NaiveDate>,
    /// Inclusive end.
    pub to: Option<NaiveDate>,
    /// Comma-separated effective statuses.
    pub status: Option<String>,
    /// Comma-separated category IDs or `sem-categoria`.
    pub category: Option<String>,
}

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/reports/summary", get(summary))
}

async fn summary(
    State(state): State<AppState>,
    ctx: OrgContext,
    ApiQuery(query): ApiQuery<SummaryQuery>,
) -> ApiResult<Json<ReportSummary>> {
    let filter = ReportFilter::parse(
        query.basis.as_deref(),
        query.from,
        query.to,
        query.status.as_deref(),
        query.category.as_deref(),
    )?;

    let entries = TransactionRepository::new(state.db.clone())
        .report_entries(ctx.organization_id, &filter)
        .await?;
    let categories: Vec<CategoryInfo> = CategoryRepository::new(state.db.clone())
        .list(ctx.organization_id)
        .await?
        .into_iter()
        .map(|c| CategoryInfo {
            id: c.id,
            name: c.name,
            color: c.color,
        })
        .collect();

    Ok(Json(ReportService::summarize(
        &entries,
        &categories,
        &filter,
        state.today(),
    )))
}
