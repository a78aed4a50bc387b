//! The caller's organization and trial snapshot.

use axum::{Json, Router, routing::get};
use balanco_core::trial::TrialStatus;
use balanco_db::entities::sea_orm_active_enums::SubscriptionStatus;
use serde::Serialize;
use uuid::Uuid;

use crate::AppState;
use crate::middleware::OrgContext;

/// Organization snapshot.
#[derive(Debug, Serialize)]
pub struct OrganizationResponse {
    /// Organization ID.
    pub id: Uuid,
    /// Organization name.
    pub name: String,
    /// Subscription state.
    pub subscription_status: SubscriptionStatus,
    /// Trial evaluated now.
    pub trial: TrialStatus,
    /// Whether new resources may be created.
    pub can_create: bool,
}

/// Creates the organization routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/organization", get(get_organization))
}

async fn get_organization(ctx: OrgContext) -> Json<OrganizationResponse> {
    let can_create = ctx.can_create();
    Json(OrganizationResponse {
        id: ctx.organization_id,
        name: ctx.organization_name,
        subscription_status: ctx.subscription_status,
        trial: ctx.trial,
        can_create,
    })
}
