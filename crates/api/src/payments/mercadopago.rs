//! Mercado Pago preapproval client.

use std::time::Duration;

use async_trait::async_trait;
use balanco_shared::config::BillingConfig;
use reqwest::{Client, Response};
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{Checkout, PaymentError, PaymentGateway, Preapproval, SubscriptionRequest};

const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Mercado Pago API client.
#[derive(Clone)]
pub struct MercadoPagoClient {
    http: Client,
    config: BillingConfig,
}

impl std::fmt::Debug for MercadoPagoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MercadoPagoClient")
            .field("api_base_url", &self.config.api_base_url)
            .field("access_token", &"[hidden]")
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct PreapprovalBody<'a> {
    reason: &'a str,
    external_reference: String,
    payer_email: &'a str,
    back_url: &'a str,
    auto_recurring: AutoRecurring<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notification_url: Option<&'a str>,
    status: &'static str,
}

#[derive(Serialize)]
struct AutoRecurring<'a> {
    frequency: u32,
    frequency_type: &'static str,
    #[serde(with = "rust_decimal::serde::float")]
    transaction_amount: Decimal,
    currency_id: &'a str,
}

impl MercadoPagoClient {
    /// Creates a client for the configured account.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::Http` if the HTTP client cannot be built.
    pub fn new(config: BillingConfig) -> Result<Self, PaymentError> {
        let http = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| PaymentError::Http(e.to_string()))?;
        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_base_url.trim_end_matches('/'))
    }

    fn token(&self) -> Result<&str, PaymentError> {
        if self.config.access_token.is_empty() {
            Err(PaymentError::NotConfigured)
        } else {
            Ok(&self.config.access_token)
        }
    }

    async fn read<T: DeserializeOwned>(response: Response) -> Result<T, PaymentError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Provider {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| PaymentError::Decode(e.to_string()))
    }
}

#[async_trait]
impl PaymentGateway for MercadoPagoClient {
    async fn create_subscription(
        &self,
        request: &SubscriptionRequest,
    ) -> Result<Checkout, PaymentError> {
        let token = self.token()?;
        let body = PreapprovalBody {
            reason: &self.config.plan_reason,
            external_reference: request.organization_id.to_string(),
            payer_email: &request.payer_email,
            back_url: &self.config.back_url,
            auto_recurring: AutoRecurring {
                frequency: 1,
                frequency_type: "months",
                transaction_amount: self.config.plan_amount,
                currency_id: &self.config.plan_currency,
            },
            notification_url: self.config.notification_url.as_deref(),
            status: "pending",
        };

        let response = self
            .http
            .post(self.url("/preapproval"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| PaymentError::Http(e.to_string()))?;

        let checkout: Checkout = Self::read(response).await?;
        tracing::info!(
            org_id = %request.organization_id,
            subscription_id = %checkout.id,
            "subscription checkout created"
        );
        Ok(checkout)
    }

    async fn fetch_subscription(&self, id: &str) -> Result<Preapproval, PaymentError> {
        let token = self.token()?;
        let response = self
            .http
            .get(self.url(&format!("/preapproval/{id}")))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| PaymentError::Http(e.to_string()))?;

        Self::read(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_unconfigured_client_refuses() {
        let client = MercadoPagoClient::new(BillingConfig::default()).unwrap();
        let err = client
            .create_subscription(&SubscriptionRequest {
                organization_id: Uuid::new_v4(),
                payer_email: "dono@empresa.com.br".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::NotConfigured));
    }

    #[test]
    fn test_url_joins_base() {
        let mut config = BillingConfig::default();
        config.api_base_url = "https://api.mercadopago.com/".to_string();
        let client = MercadoPagoClient::new(config).unwrap();
        assert_eq!(
            client.url("/preapproval"),
            "https://api.mercadopago.com/preapproval"
        );
    }

    #[test]
    fn test_body_sends_amount_as_number() {
        let config = BillingConfig::default();
        let body = PreapprovalBody {
            reason: &config.plan_reason,
            external_reference: "org".to_string(),
            payer_email: "dono@empresa.com.br",
            back_url: &config.back_url,
            auto_recurring: AutoRecurring {
                frequency: 1,
                frequency_type: "months",
                transaction_amount: config.plan_amount,
                currency_id: &config.plan_currency,
            },
            notification_url: None,
            status: "pending",
        };

        let json = serde_json::to_value(&body).unwrap();
        assert!(json["auto_recurring"]["transaction_amount"].is_number());
        assert_eq!(json["auto_recurring"]["currency_id"], "BRL");
        assert!(json.get("notification_url").is_none());
    }

    #[test]
    fn test_debug_hides_token() {
        let mut config = BillingConfig::default();
        config.access_token = "APP_USR-secret".to_string();
        let client = MercadoPagoClient::new(config).unwrap();
        assert!(!format!("{client:?}").contains("APP_USR"));
    }
}
