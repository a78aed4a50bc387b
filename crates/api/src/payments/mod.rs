//! Payment provider abstraction.
//!
//! Subscriptions are Mercado Pago preapprovals. Webhook notifications only
//! name a preapproval; its state is always fetched back from the provider.

pub mod mercadopago;

use async_trait::async_trait;
use balanco_db::entities::sea_orm_active_enums::SubscriptionStatus;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use mercadopago::MercadoPagoClient;

/// Errors talking to the payment provider.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// No access token configured.
    #[error("payment provider is not configured")]
    NotConfigured,

    /// The request did not complete.
    #[error("payment provider request failed: {0}")]
    Http(String),

    /// The provider answered with an error status.
    #[error("payment provider returned {status}: {body}")]
    Provider {
        /// HTTP status.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The provider's response could not be read.
    #[error("unexpected payment provider response: {0}")]
    Decode(String),
}

/// A subscription checkout to start.
#[derive(Debug, Clone)]
pub struct SubscriptionRequest {
    /// Organization the subscription pays for; sent as external reference.
    pub organization_id: Uuid,
    /// Payer e-mail.
    pub payer_email: String,
}

/// A created subscription awaiting the payer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkout {
    /// Provider subscription ID.
    pub id: String,
    /// URL the payer is sent to.
    pub init_point: String,
}

/// A subscription as the provider reports it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Preapproval {
    /// Provider subscription ID.
    pub id: String,
    /// Provider status (`pending`, `authorized`, `paused`, `cancelled`).
    pub status: String,
    /// Organization ID given at creation.
    #[serde(default)]
    pub external_reference: Option<String>,
}

impl Preapproval {
    /// Local subscription status for the provider's status.
    #[must_use]
    pub fn subscription_status(&self) -> SubscriptionStatus {
        map_status(&self.status)
    }

    /// The organization named by the external reference.
    #[must_use]
    pub fn organization_id(&self) -> Option<Uuid> {
        self.external_reference
            .as_deref()
            .and_then(|r| Uuid::parse_str(r.trim()).ok())
    }
}

/// Maps a provider status onto the local subscription status.
#[must_use]
pub fn map_status(provider_status: &str) -> SubscriptionStatus {
    match provider_status {
        "authorized" => SubscriptionStatus::Active,
        "paused" => SubscriptionStatus::Paused,
        "cancelled" => SubscriptionStatus::Cancelled,
        _ => SubscriptionStatus::Trialing,
    }
}

/// Payment provider operations.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates a monthly subscription and returns its checkout link.
    async fn create_subscription(
        &self,
        request: &SubscriptionRequest,
    ) -> Result<Checkout, PaymentError>;

    /// Fetches a subscription by ID.
    async fn fetch_subscription(&self, id: &str) -> Result<Preapproval, PaymentError>;
}
