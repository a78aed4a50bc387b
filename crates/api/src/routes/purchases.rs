//! Credit card purchase routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};
use balanco_core::invoice::InvoiceMonth;
use balanco_db::PurchaseRepository;
use balanco_db::entities::credit_card_purchases;
use balanco_db::repositories::{PurchaseFilter, PurchaseInput};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use super::MessageResponse;
use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::OrgContext;

/// Query parameters for listing purchases.
#[derive(Debug, Default, Deserialize)]
pub struct ListPurchasesQuery {
    /// Card ID.
    pub card_id: Option<Uuid>,
    /// Invoice month `YYYY-MM`.
    pub month: Option<String>,
}

/// Request body for creating or replacing a purchase.
#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    /// Card ID.
    pub credit_card_id: Uuid,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Amount of each row.
    pub amount: Decimal,
    /// Purchase date.
    pub purchase_date: NaiveDate,
    /// Category ID.
    #[serde(default)]
    pub category_id: Option<Uuid>,
    /// Expand into this many monthly rows (create only).
    #[serde(default)]
    pub installments: Option<u32>,
    /// Plan length of a single row.
    #[serde(default)]
    pub total_installments: Option<i32>,
    /// Position of a single row.
    #[serde(default)]
    pub current_installment: Option<i32>,
}

impl From<PurchaseRequest> for PurchaseInput {
    fn from(req: PurchaseRequest) -> Self {
        Self {
            credit_card_id: req.credit_card_id,
            description: req.description,
            amount: req.amount,
            purchase_date: req.purchase_date,
            category_id: req.category_id,
            total_installments: req.total_installments,
            current_installment: req.current_installment,
        }
    }
}

/// Creates the purchase routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/credit-card-purchases",
            get(list_purchases).post(create_purchase),
        )
        .route(
            "/credit-card-purchases/{id}",
            put(update_purchase).delete(delete_purchase),
        )
}

async fn list_purchases(
    State(state): State<AppState>,
    ctx: OrgContext,
    ApiQuery(query): ApiQuery<ListPurchasesQuery>,
) -> ApiResult<Json<Vec<credit_card_purchases::Model>>> {
    let filter = PurchaseFilter {
        card_id: query.card_id,
        month: query
            .month
            .as_deref()
            .map(str::parse::<InvoiceMonth>)
            .transpose()?,
    };

    let rows = PurchaseRepository::new(state.db.clone())
        .list(ctx.organization_id, filter)
        .await?;
    Ok(Json(rows))
}

/// Creates one purchase, or a whole installment plan when `installments`
/// is greater than one. Always answers with the created rows.
async fn create_purchase(
    State(state): State<AppState>,
    ctx: OrgContext,
    ApiJson(body): ApiJson<PurchaseRequest>,
) -> ApiResult<(StatusCode, Json<Vec<credit_card_purchases::Model>>)> {
    ctx.ensure_can_create()?;
    let installments = body.installments;
    let repo = PurchaseRepository::new(state.db.clone());

    let rows = match installments {
        None | Some(1) => vec![repo.create(ctx.organization_id, body.into()).await?],
        Some(n) => repo.create_plan(ctx.organization_id, body.into(), n).await?,
    };
    Ok((StatusCode::CREATED, Json(rows)))
}

async fn update_purchase(
    State(state): State<AppState>,
    ctx: OrgContext,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<PurchaseRequest>,
) -> ApiResult<Json<credit_card_purchases::Model>> {
    let purchase = PurchaseRepository::new(state.db.clone())
        .update(ctx.organization_id, id, body.into())
        .await?;
    Ok(Json(purchase))
}

async fn delete_purchase(
    State(state): State<AppState>,
    ctx: OrgContext,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    PurchaseRepository::new(state.db.clone())
        .delete(ctx.organization_id, id)
        .await?;
    Ok(Json(MessageResponse {
        message: "Compra excluída com sucesso.",
    }))
}
