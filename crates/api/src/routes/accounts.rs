//! Pre-signup e-mail check.

use axum::{Json, Router, extract::State, routing::post};
use balanco_db::AuthUserRepository;
use balanco_db::repositories::EmailStatus;
use serde::Deserialize;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extractors::ApiJson;

/// Request body for the e-mail check.
#[derive(Debug, Deserialize)]
pub struct CheckEmailRequest {
    /// E-mail to look up.
    #[serde(default)]
    pub email: Option<String>,
}

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/check-email", post(check_email))
}

async fn check_email(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CheckEmailRequest>,
) -> ApiResult<Json<EmailStatus>> {
    let email = body
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::validation("O e-mail é obrigatório."))?;

    let status = AuthUserRepository::new(state.db.clone())
        .check_email(email)
        .await?;
    Ok(Json(status))
}
