//! Signup provisioning hook.
//!
//! Called by the auth provider's database webhook when a user is inserted.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use balanco_db::OrganizationRepository;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extractors::ApiJson;

/// Header carrying the shared secret.
pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/// Database webhook payload.
#[derive(Debug, Deserialize)]
pub struct SignupPayload {
    /// The inserted auth user.
    pub record: SignupRecord,
}

/// The inserted auth user.
#[derive(Debug, Deserialize)]
pub struct SignupRecord {
    /// Auth user ID.
    pub id: Uuid,
    /// Metadata given at signup.
    #[serde(default)]
    pub raw_user_meta_data: Option<UserMetadata>,
}

/// Signup metadata.
#[derive(Debug, Default, Deserialize)]
pub struct UserMetadata {
    /// Name typed in the signup form.
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Provisioning result.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    /// The user's organization.
    pub organization_id: Uuid,
    /// False when the user was already provisioned.
    pub created: bool,
}

/// Creates the hook routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/hooks/signup", post(signup))
}

async fn signup(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<SignupPayload>,
) -> ApiResult<(StatusCode, Json<SignupResponse>)> {
    if let Some(expected) = state.signup_secret.as_deref() {
        let given = headers
            .get(WEBHOOK_SECRET_HEADER)
            .and_then(|v| v.to_str().ok());
        if given != Some(expected) {
            tracing::warn!("signup hook called with a wrong secret");
            return Err(ApiError::unauthorized("Segredo do webhook inválido."));
        }
    }

    let full_name = payload
        .record
        .raw_user_meta_data
        .and_then(|m| m.full_name);

    let provisioned = OrganizationRepository::new(state.db.clone())
        .provision_for_user(payload.record.id, full_name.as_deref())
        .await?;

    let status = if provisioned.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(SignupResponse {
            organization_id: provisioned.organization_id,
            created: provisioned.created,
        }),
    ))
}
