//! The caller's own profile.

use axum::{Json, Router, extract::State, routing::get};
use balanco_core::profile::ProfileDraft;
use balanco_db::ProfileRepository;
use balanco_db::entities::profiles;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::ApiJson;
use crate::middleware::OrgContext;

/// Profile as shown on the settings screen.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    /// Auth user ID.
    pub id: Uuid,
    /// E-mail from the token.
    pub email: Option<String>,
    /// Owning organization.
    pub organization_id: Uuid,
    /// Display name.
    pub full_name: Option<String>,
    /// Birth date.
    pub date_of_birth: Option<NaiveDate>,
    /// Normalized phone.
    pub phone_number: Option<String>,
    /// CPF or CNPJ digits.
    pub document_number: Option<String>,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
    /// Last change.
    pub updated_at: DateTime<FixedOffset>,
}

impl ProfileResponse {
    fn new(profile: profiles::Model, email: Option<String>) -> Self {
        Self {
            id: profile.id,
            email,
            organization_id: profile.organization_id,
            full_name: profile.full_name,
            date_of_birth: profile.date_of_birth,
            phone_number: profile.phone_number,
            document_number: profile.document_number,
            avatar_url: profile.avatar_url,
            updated_at: profile.updated_at,
        }
    }
}

/// Creates the profile routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(update_profile))
}

async fn get_profile(
    State(state): State<AppState>,
    ctx: OrgContext,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = ProfileRepository::new(state.db.clone())
        .find(ctx.user_id)
        .await?;
    Ok(Json(ProfileResponse::new(profile, ctx.email)))
}

async fn update_profile(
    State(state): State<AppState>,
    ctx: OrgContext,
    ApiJson(body): ApiJson<ProfileDraft>,
) -> ApiResult<Json<ProfileResponse>> {
    let input = body.validate(state.today())?;
    let profile = ProfileRepository::new(state.db.clone())
        .update(ctx.user_id, input)
        .await?;
    Ok(Json(ProfileResponse::new(profile, ctx.email)))
}
