//! Claims carried by the bearer tokens the auth provider issues.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Audience the auth provider stamps on tokens of signed-in users.
pub const AUTHENTICATED_AUDIENCE: &str = "authenticated";

/// JWT claims of an authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// E-mail address, when the provider includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Provider role (`authenticated`, `anon`, `service_role`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Audience.
    pub aud: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a signed-in user expiring at `expires_at`.
    #[must_use]
    pub fn new(user_id: Uuid, email: Option<&str>, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: user_id,
            email: email.map(str::to_string),
            role: Some(AUTHENTICATED_AUDIENCE.to_string()),
            aud: AUTHENTICATED_AUDIENCE.to_string(),
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }
}
