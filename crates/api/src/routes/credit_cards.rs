//! Credit card and invoice routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use balanco_core::invoice::{Invoice, InvoiceMonth};
use balanco_db::CreditCardRepository;
use balanco_db::entities::credit_cards;
use balanco_db::repositories::CreditCardInput;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::transactions::TransactionResponse;
use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::OrgContext;

/// Request body for creating or replacing a card.
#[derive(Debug, Deserialize)]
pub struct CreditCardRequest {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Brand.
    #[serde(default)]
    pub card_brand: Option<String>,
    /// Display color.
    #[serde(default)]
    pub card_color: Option<String>,
    /// Statement closing day (1-31).
    pub closing_day: i32,
    /// Payment due day (1-31).
    pub due_day: i32,
}

impl From<CreditCardRequest> for CreditCardInput {
    fn from(req: CreditCardRequest) -> Self {
        Self {
            name: req.name,
            card_brand: req.card_brand,
            card_color: req.card_color,
            closing_day: req.closing_day,
            due_day: req.due_day,
        }
    }
}

/// Query parameters of the invoice view.
#[derive(Debug, Default, Deserialize)]
pub struct InvoiceQuery {
    /// `YYYY-MM`; defaults to the current month.
    pub month: Option<String>,
}

/// Request body for closing an invoice.
#[derive(Debug, Deserialize)]
pub struct CloseInvoiceRequest {
    /// `YYYY-MM`.
    pub month: String,
}

/// A card's invoice.
#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    /// The card.
    pub card: credit_cards::Model,
    /// Purchases of the month and their total.
    #[serde(flatten)]
    pub invoice: Invoice,
}

/// Creates the credit card routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/credit-cards", get(list_cards).post(create_card))
        .route("/credit-cards/{id}", get(get_card).put(update_card))
        .route("/credit-cards/{id}/invoice", get(get_invoice))
        .route("/credit-cards/{id}/invoice/close", post(close_invoice))
}

async fn list_cards(
    State(state): State<AppState>,
    ctx: OrgContext,
) -> ApiResult<Json<Vec<credit_cards::Model>>> {
    let rows = CreditCardRepository::new(state.db.clone())
        .list(ctx.organization_id)
        .await?;
    Ok(Json(rows))
}

async fn get_card(
    State(state): State<AppState>,
    ctx: OrgContext,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<credit_cards::Model>> {
    let card = CreditCardRepository::new(state.db.clone())
        .find(ctx.organization_id, id)
        .await?;
    Ok(Json(card))
}

async fn create_card(
    State(state): State<AppState>,
    ctx: OrgContext,
    ApiJson(body): ApiJson<CreditCardRequest>,
) -> ApiResult<(StatusCode, Json<credit_cards::Model>)> {
    ctx.ensure_can_create()?;
    let card = CreditCardRepository::new(state.db.clone())
        .create(ctx.organization_id, body.into())
        .await?;
    Ok((StatusCode::CREATED, Json(card)))
}

async fn update_card(
    State(state): State<AppState>,
    ctx: OrgContext,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<CreditCardRequest>,
) -> ApiResult<Json<credit_cards::Model>> {
    let card = CreditCardRepository::new(state.db.clone())
        .update(ctx.organization_id, id, body.into())
        .await?;
    Ok(Json(card))
}

async fn get_invoice(
    State(state): State<AppState>,
    ctx: OrgContext,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<InvoiceQuery>,
) -> ApiResult<Json<InvoiceResponse>> {
    let month = match query.month.as_deref() {
        Some(raw) => raw.parse::<InvoiceMonth>()?,
        None => InvoiceMonth::containing(state.today()),
    };

    let (card, invoice) = CreditCardRepository::new(state.db.clone())
        .invoice(ctx.organization_id, id, month)
        .await?;
    Ok(Json(InvoiceResponse { card, invoice }))
}

async fn close_invoice(
    State(state): State<AppState>,
    ctx: OrgContext,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<CloseInvoiceRequest>,
) -> ApiResult<(StatusCode, Json<TransactionResponse>)> {
    ctx.ensure_can_create()?;
    let month = body.month.parse::<InvoiceMonth>()?;

    let today = state.today();
    let entry = CreditCardRepository::new(state.db.clone())
        .close_invoice(ctx.organization_id, id, month, today)
        .await?;
    Ok((StatusCode::CREATED, Json(TransactionResponse::new(entry, today))))
}
