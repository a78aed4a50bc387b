//! Recurring rule routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};
use balanco_core::ledger::EntryKind;
use balanco_core::recurrence::{Frequency, preview};
use balanco_db::RecurringRepository;
use balanco_db::entities::recurring_transactions;
use balanco_db::repositories::RecurringInput;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MessageResponse;
use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::OrgContext;

const DEFAULT_PREVIEW_COUNT: usize = 6;
const MAX_PREVIEW_COUNT: usize = 60;

/// Request body for creating or replacing a rule.
#[derive(Debug, Deserialize)]
pub struct RecurringRequest {
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Positive amount.
    pub amount: Decimal,
    /// `receita` or `despesa`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Category ID.
    #[serde(default)]
    pub category_id: Option<Uuid>,
    /// `weekly`, `monthly` or `yearly`.
    pub frequency: String,
    /// First occurrence.
    pub start_date: NaiveDate,
    /// Last day an occurrence may fall on.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Defaults to active.
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl TryFrom<RecurringRequest> for RecurringInput {
    type Error = ApiError;

    fn try_from(req: RecurringRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            description: req.description,
            amount: req.amount,
            kind: req.kind.parse::<EntryKind>()?,
            category_id: req.category_id,
            frequency: req.frequency.parse::<Frequency>()?,
            start_date: req.start_date,
            end_date: req.end_date,
            is_active: req.is_active.unwrap_or(true),
        })
    }
}

/// Query parameters of the schedule preview.
#[derive(Debug, Default, Deserialize)]
pub struct ScheduleQuery {
    /// Number of upcoming dates (1-60, default 6).
    pub count: Option<usize>,
}

/// Upcoming occurrences of a rule.
#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    /// Rule ID.
    pub rule_id: Uuid,
    /// Cadence.
    pub frequency: Frequency,
    /// Next due dates, starting at the cursor.
    pub dates: Vec<NaiveDate>,
}

/// Creates the recurring rule routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/recurring-transactions",
            get(list_rules).post(create_rule),
        )
        .route(
            "/recurring-transactions/{id}",
            put(update_rule).delete(delete_rule),
        )
        .route("/recurring-transactions/{id}/schedule", get(rule_schedule))
}

async fn list_rules(
    State(state): State<AppState>,
    ctx: OrgContext,
) -> ApiResult<Json<Vec<recurring_transactions::Model>>> {
    let rows = RecurringRepository::new(state.db.clone())
        .list(ctx.organization_id)
        .await?;
    Ok(Json(rows))
}

async fn create_rule(
    State(state): State<AppState>,
    ctx: OrgContext,
    ApiJson(body): ApiJson<RecurringRequest>,
) -> ApiResult<(StatusCode, Json<recurring_transactions::Model>)> {
    ctx.ensure_can_create()?;
    let input = RecurringInput::try_from(body)?;

    let rule = RecurringRepository::new(state.db.clone())
        .create(ctx.organization_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(rule)))
}

async fn update_rule(
    State(state): State<AppState>,
    ctx: OrgContext,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<RecurringRequest>,
) -> ApiResult<Json<recurring_transactions::Model>> {
    let input = RecurringInput::try_from(body)?;

    let rule = RecurringRepository::new(state.db.clone())
        .update(ctx.organization_id, id, input)
        .await?;
    Ok(Json(rule))
}

async fn delete_rule(
    State(state): State<AppState>,
    ctx: OrgContext,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    RecurringRepository::new(state.db.clone())
        .delete(ctx.organization_id, id)
        .await?;
    Ok(Json(MessageResponse {
        message: "Transação recorrente excluída com sucesso.",
    }))
}

async fn rule_schedule(
    State(state): State<AppState>,
    ctx: OrgContext,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<ScheduleQuery>,
) -> ApiResult<Json<ScheduleResponse>> {
    let count = query.count.unwrap_or(DEFAULT_PREVIEW_COUNT);
    if !(1..=MAX_PREVIEW_COUNT).contains(&count) {
        return Err(ApiError::validation(format!(
            "A quantidade deve estar entre 1 e {MAX_PREVIEW_COUNT}."
        )));
    }

    let rule = RecurringRepository::new(state.db.clone())
        .find(ctx.organization_id, id)
        .await?;
    let frequency = rule.frequency.parse::<Frequency>()?;

    let dates = if rule.is_active {
        preview(
            rule.next_run_date,
            frequency,
            rule.start_date.day(),
            count,
            rule.end_date,
        )
    } else {
        Vec::new()
    };

    Ok(Json(ScheduleResponse {
        rule_id: rule.id,
        frequency,
        dates,
    }))
}
