//! Ledger entry routes.

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use balanco_core::ledger::{
    EffectiveStatus, EntryKind, EntryStatus, export_filename, write_csv,
};
use balanco_db::TransactionRepository;
use balanco_db::entities::transactions;
use balanco_db::repositories::{TransactionFilter, TransactionInput};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MessageResponse;
use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{ApiJson, ApiPath, ApiQuery, OptionalJson};
use crate::middleware::OrgContext;

/// Query parameters for listing entries.
#[derive(Debug, Default, Deserialize)]
pub struct ListTransactionsQuery {
    /// `pago`, `pendente` or `vencido`.
    pub status: Option<String>,
    /// `receita` or `despesa`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Entry date lower bound (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Entry date upper bound (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
    /// Category ID.
    pub category_id: Option<Uuid>,
}

/// Request body for creating or replacing an entry.
#[derive(Debug, Deserialize)]
pub struct TransactionRequest {
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Positive amount.
    pub amount: Decimal,
    /// `receita` or `despesa`.
    #[serde(rename = "type")]
    pub kind: String,
    /// `pago` or `pendente` (default).
    #[serde(default)]
    pub status: Option<String>,
    /// Category ID.
    #[serde(default)]
    pub category_id: Option<Uuid>,
    /// Bookkeeping date; defaults to today.
    #[serde(default)]
    pub entry_date: Option<NaiveDate>,
    /// Due date of a pending entry.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Payment date of a paid entry.
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
}

impl TryFrom<TransactionRequest> for TransactionInput {
    type Error = ApiError;

    fn try_from(req: TransactionRequest) -> Result<Self, Self::Error> {
        let status = match req.status.as_deref() {
            Some(raw) => raw.parse::<EntryStatus>()?,
            None => EntryStatus::default(),
        };
        Ok(Self {
            description: req.description,
            amount: req.amount,
            kind: req.kind.parse::<EntryKind>()?,
            status,
            category_id: req.category_id,
            entry_date: req.entry_date,
            due_date: req.due_date,
            payment_date: req.payment_date,
        })
    }
}

/// Request body for settling an entry.
#[derive(Debug, Default, Deserialize)]
pub struct SettleRequest {
    /// Payment date; defaults to today.
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
}

/// Request body for bulk deletion.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteRequest {
    /// Entries to delete.
    #[serde(default)]
    pub transaction_ids: Vec<Uuid>,
}

/// Bulk deletion result.
#[derive(Debug, Serialize)]
pub struct BulkDeleteResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// Entries deleted.
    pub deleted: u64,
}

/// An entry with its effective status.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Stored entry.
    #[serde(flatten)]
    pub transaction: transactions::Model,
    /// `vencido` for pending entries past due.
    pub effective_status: EffectiveStatus,
}

impl TransactionResponse {
    /// Wraps `transaction`, deriving its status on `today`.
    #[must_use]
    pub fn new(transaction: transactions::Model, today: NaiveDate) -> Self {
        let effective_status = transaction.effective_status(today);
        Self {
            transaction,
            effective_status,
        }
    }
}

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route("/transactions/bulk-delete", post(bulk_delete))
        .route("/transactions/export", get(export_transactions))
        .route(
            "/transactions/{id}",
            put(update_transaction).delete(delete_transaction),
        )
        .route("/transactions/{id}/settle", post(settle_transaction))
}

async fn list_transactions(
    State(state): State<AppState>,
    ctx: OrgContext,
    ApiQuery(query): ApiQuery<ListTransactionsQuery>,
) -> ApiResult<Json<Vec<TransactionResponse>>> {
    let filter = TransactionFilter {
        status: query
            .status
            .as_deref()
            .map(str::parse::<EffectiveStatus>)
            .transpose()?,
        kind: query
            .kind
            .as_deref()
            .map(str::parse::<EntryKind>)
            .transpose()?,
        from: query.from,
        to: query.to,
        category_id: query.category_id,
    };

    let today = state.today();
    let rows = TransactionRepository::new(state.db.clone())
        .list(ctx.organization_id, &filter, today)
        .await?;

    Ok(Json(
        rows.into_iter()
            .map(|row| TransactionResponse::new(row, today))
            .collect(),
    ))
}

async fn create_transaction(
    State(state): State<AppState>,
    ctx: OrgContext,
    ApiJson(body): ApiJson<TransactionRequest>,
) -> ApiResult<(StatusCode, Json<TransactionResponse>)> {
    ctx.ensure_can_create()?;
    let input = TransactionInput::try_from(body)?;

    let today = state.today();
    let entry = TransactionRepository::new(state.db.clone())
        .create(ctx.organization_id, input, today)
        .await?;
    Ok((StatusCode::CREATED, Json(TransactionResponse::new(entry, today))))
}

async fn update_transaction(
    State(state): State<AppState>,
    ctx: OrgContext,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<TransactionRequest>,
) -> ApiResult<Json<TransactionResponse>> {
    let input = TransactionInput::try_from(body)?;

    let today = state.today();
    let entry = TransactionRepository::new(state.db.clone())
        .update(ctx.organization_id, id, input, today)
        .await?;
    Ok(Json(TransactionResponse::new(entry, today)))
}

async fn settle_transaction(
    State(state): State<AppState>,
    ctx: OrgContext,
    ApiPath(id): ApiPath<Uuid>,
    OptionalJson(body): OptionalJson<SettleRequest>,
) -> ApiResult<Json<TransactionResponse>> {
    let today = state.today();
    let entry = TransactionRepository::new(state.db.clone())
        .settle(ctx.organization_id, id, body.payment_date, today)
        .await?;
    Ok(Json(TransactionResponse::new(entry, today)))
}

async fn delete_transaction(
    State(state): State<AppState>,
    ctx: OrgContext,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    TransactionRepository::new(state.db.clone())
        .delete(ctx.organization_id, id)
        .await?;
    Ok(Json(MessageResponse {
        message: "Lançamento excluído com sucesso.",
    }))
}

async fn bulk_delete(
    State(state): State<AppState>,
    ctx: OrgContext,
    ApiJson(body): ApiJson<BulkDeleteRequest>,
) -> ApiResult<Json<BulkDeleteResponse>> {
    if body.transaction_ids.is_empty() {
        return Err(ApiError::validation(
            "Informe ao menos um lançamento para excluir.",
        ));
    }

    let deleted = TransactionRepository::new(state.db.clone())
        .bulk_delete(ctx.organization_id, &body.transaction_ids)
        .await?;
    Ok(Json(BulkDeleteResponse {
        message: format!("{deleted} lançamento(s) excluído(s) com sucesso."),
        deleted,
    }))
}

async fn export_transactions(
    State(state): State<AppState>,
    ctx: OrgContext,
) -> ApiResult<Response> {
    let rows = TransactionRepository::new(state.db.clone())
        .export_rows(ctx.organization_id)
        .await?;

    let mut csv = Vec::new();
    write_csv(&mut csv, rows).map_err(|e| ApiError::internal(e.to_string()))?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_filename(state.today())
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}
