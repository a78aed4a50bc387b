//! Subscription checkout and the payment provider webhook.

use axum::{
    Json, Router,
    extract::State,
    routing::post,
};
use balanco_db::OrganizationRepository;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{ApiQuery, OptionalJson};
use crate::middleware::OrgContext;
use crate::payments::{Checkout, SubscriptionRequest};

/// Notification topics that carry a subscription.
const SUBSCRIPTION_TOPICS: [&str; 2] = ["preapproval", "subscription_preapproval"];

/// Optional checkout parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSubscriptionRequest {
    /// Overrides the e-mail from the token.
    pub payer_email: Option<String>,
}

/// Notification identifiers sent in the query string.
#[derive(Debug, Default, Deserialize)]
pub struct WebhookQuery {
    /// Notification type.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Legacy notification topic.
    pub topic: Option<String>,
    /// Resource ID (legacy format).
    pub id: Option<String>,
    /// Resource ID.
    #[serde(rename = "data.id")]
    pub data_id: Option<String>,
}

/// Notification body.
#[derive(Debug, Default, Deserialize)]
pub struct WebhookBody {
    /// Notification type.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Legacy notification topic.
    pub topic: Option<String>,
    /// Resource reference.
    pub data: Option<WebhookData>,
}

/// Resource reference of a notification.
#[derive(Debug, Default, Deserialize)]
pub struct WebhookData {
    /// Resource ID.
    pub id: Option<String>,
}

/// Webhook acknowledgement.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    /// Always true once the notification was processed or ignored.
    pub received: bool,
}

/// Creates the authenticated billing routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/billing/subscriptions/create", post(create_subscription))
}

/// Creates the public billing routes.
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/billing/webhook", post(webhook))
}

async fn create_subscription(
    State(state): State<AppState>,
    ctx: OrgContext,
    OptionalJson(body): OptionalJson<CreateSubscriptionRequest>,
) -> ApiResult<Json<Checkout>> {
    let payer_email = body
        .payer_email
        .filter(|e| !e.trim().is_empty())
        .or_else(|| ctx.email.clone())
        .ok_or_else(|| ApiError::validation("O e-mail do pagador é obrigatório."))?;

    let checkout = state
        .payments
        .create_subscription(&SubscriptionRequest {
            organization_id: ctx.organization_id,
            payer_email,
        })
        .await?;

    info!(
        organization_id = %ctx.organization_id,
        subscription_id = %checkout.id,
        "Subscription checkout created"
    );
    Ok(Json(checkout))
}

/// Resolves the topic and resource ID, preferring the body over the query.
fn notification_target(query: WebhookQuery, body: WebhookBody) -> (Option<String>, Option<String>) {
    let topic = body
        .kind
        .or(body.topic)
        .or(query.kind)
        .or(query.topic);
    let id = body
        .data
        .and_then(|d| d.id)
        .or(query.data_id)
        .or(query.id);
    (topic, id)
}

async fn webhook(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<WebhookQuery>,
    OptionalJson(body): OptionalJson<WebhookBody>,
) -> ApiResult<Json<WebhookAck>> {
    let (topic, id) = notification_target(query, body);

    let (Some(topic), Some(id)) = (topic, id) else {
        return Ok(Json(WebhookAck { received: true }));
    };
    if !SUBSCRIPTION_TOPICS.contains(&topic.as_str()) {
        return Ok(Json(WebhookAck { received: true }));
    }

    let preapproval = state.payments.fetch_subscription(&id).await?;
    let Some(organization_id) = preapproval.organization_id() else {
        warn!(subscription_id = %id, "Subscription without organization reference");
        return Ok(Json(WebhookAck { received: true }));
    };

    let status = preapproval.subscription_status();
    let updated = OrganizationRepository::new(state.db.clone())
        .update_subscription(organization_id, status, &preapproval.id)
        .await?;

    if updated {
        info!(
            %organization_id,
            subscription_id = %preapproval.id,
            ?status,
            "Subscription status updated"
        );
    } else {
        warn!(%organization_id, "Subscription notification for unknown organization");
    }

    Ok(Json(WebhookAck { received: true }))
}
