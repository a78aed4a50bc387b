//! Authentication middleware for protected routes.
//!
//! Resolves bearer token → user → profile → organization once per request
//! and hands handlers a read-only [`OrgContext`].

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use balanco_core::trial::TrialStatus;
use balanco_db::OrganizationRepository;
use balanco_db::entities::sea_orm_active_enums::SubscriptionStatus;
use balanco_shared::AppError;
use chrono::Utc;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;

/// The authenticated caller and their organization.
#[derive(Debug, Clone)]
pub struct OrgContext {
    /// Auth user ID.
    pub user_id: Uuid,
    /// E-mail from the token, when present.
    pub email: Option<String>,
    /// Caller's organization.
    pub organization_id: Uuid,
    /// Organization name.
    pub organization_name: String,
    /// Subscription state.
    pub subscription_status: SubscriptionStatus,
    /// Trial evaluated at request time.
    pub trial: TrialStatus,
}

impl OrgContext {
    /// Whether the organization may create new resources.
    #[must_use]
    pub fn can_create(&self) -> bool {
        !self
            .trial
            .blocks_creation(self.subscription_status == SubscriptionStatus::Active)
    }

    /// Refuses creation once the trial expired without a subscription.
    ///
    /// # Errors
    ///
    /// Returns a 402 `ApiError`.
    pub fn ensure_can_create(&self) -> Result<(), ApiError> {
        if self.can_create() {
            Ok(())
        } else {
            Err(AppError::TrialExpired(
                "Seu período de teste terminou. Assine um plano para continuar criando registros."
                    .to_string(),
            )
            .into())
        }
    }
}

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Authentication middleware.
///
/// 1. Extracts and verifies the bearer token
/// 2. Loads the caller's profile and organization
/// 3. Stores an [`OrgContext`] in request extensions
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_bearer_token)
        .ok_or_else(|| ApiError::unauthorized("Token de autenticação não fornecido."))?;

    let claims = state.verifier.verify(token)?;

    let (profile, organization) = OrganizationRepository::new(state.db.clone())
        .context_for_user(claims.user_id())
        .await?;

    let trial = state.trial.evaluate(
        organization.created_at.with_timezone(&Utc),
        organization.trial_ends_at.map(|t| t.with_timezone(&Utc)),
        Utc::now(),
    );

    request.extensions_mut().insert(OrgContext {
        user_id: profile.id,
        email: claims.email,
        organization_id: organization.id,
        organization_name: organization.name,
        subscription_status: organization.subscription_status,
        trial,
    });

    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for OrgContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Autenticação necessária."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn context(expired: bool, status: SubscriptionStatus) -> OrgContext {
        OrgContext {
            user_id: Uuid::new_v4(),
            email: None,
            organization_id: Uuid::new_v4(),
            organization_name: "Organização de Teste".to_string(),
            subscription_status: status,
            trial: TrialStatus {
                trial_end: Utc::now() + Duration::days(if expired { -1 } else { 3 }),
                expired,
                remaining_days: if expired { 0 } else { 3 },
            },
        }
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }

    #[test]
    fn test_expired_trial_blocks_creation() {
        assert!(!context(true, SubscriptionStatus::Trialing).can_create());
        assert!(!context(true, SubscriptionStatus::Cancelled).can_create());
        assert!(context(true, SubscriptionStatus::Active).can_create());
        assert!(context(false, SubscriptionStatus::Trialing).can_create());
    }

    #[test]
    fn test_ensure_can_create_is_402() {
        let err = context(true, SubscriptionStatus::Paused)
            .ensure_can_create()
            .unwrap_err();
        assert_eq!(err.0.status_code(), 402);
    }
}
