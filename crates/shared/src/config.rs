//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Token verification configuration.
    pub auth: AuthConfig,
    /// Free-trial configuration.
    #[serde(default)]
    pub trial: TrialConfig,
    /// Payment provider configuration.
    #[serde(default)]
    pub billing: BillingConfig,
    /// Recurring-transaction scheduler configuration.
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Inbound webhook configuration.
    #[serde(default)]
    pub hooks: HooksConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Token verification configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Project JWT secret shared with the auth provider.
    pub jwt_secret: String,
    /// Expected audience claim.
    #[serde(default = "default_audience")]
    pub audience: String,
}

fn default_audience() -> String {
    crate::auth::AUTHENTICATED_AUDIENCE.to_string()
}

/// Free-trial configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TrialConfig {
    /// Trial length in days, counted from organization creation.
    #[serde(default = "default_trial_days")]
    pub days: i64,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            days: default_trial_days(),
        }
    }
}

fn default_trial_days() -> i64 {
    7
}

/// Mercado Pago configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// Access token for the provider API. Empty disables checkout.
    #[serde(default)]
    pub access_token: String,
    /// Provider API base URL.
    #[serde(default = "default_billing_api_base_url")]
    pub api_base_url: String,
    /// Subscription plan name shown at checkout.
    #[serde(default = "default_plan_reason")]
    pub plan_reason: String,
    /// Monthly plan amount.
    #[serde(default = "default_plan_amount")]
    pub plan_amount: Decimal,
    /// Plan currency (ISO 4217).
    #[serde(default = "default_plan_currency")]
    pub plan_currency: String,
    /// Where the provider sends the user after checkout.
    #[serde(default = "default_back_url")]
    pub back_url: String,
    /// Webhook URL registered with each subscription.
    #[serde(default)]
    pub notification_url: Option<String>,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            api_base_url: default_billing_api_base_url(),
            plan_reason: default_plan_reason(),
            plan_amount: default_plan_amount(),
            plan_currency: default_plan_currency(),
            back_url: default_back_url(),
            notification_url: None,
        }
    }
}

fn default_billing_api_base_url() -> String {
    "https://api.mercadopago.com".to_string()
}

fn default_plan_reason() -> String {
    "Assinatura Balanço Certo".to_string()
}

fn default_plan_amount() -> Decimal {
    Decimal::new(3990, 2)
}

fn default_plan_currency() -> String {
    "BRL".to_string()
}

fn default_back_url() -> String {
    "http://localhost:5173/dashboard".to_string()
}

/// Recurring-transaction scheduler configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Run the materializer inside the server process.
    #[serde(default = "default_scheduler_enabled")]
    pub enabled: bool,
    /// Seconds between runs.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// IANA timezone that defines "today".
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: default_scheduler_enabled(),
            interval_secs: default_interval_secs(),
            timezone: default_timezone(),
        }
    }
}

fn default_scheduler_enabled() -> bool {
    true
}

fn default_interval_secs() -> u64 {
    86_400 // daily
}

fn default_timezone() -> String {
    "America/Sao_Paulo".to_string()
}

/// Inbound webhook configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HooksConfig {
    /// Value expected in the `x-webhook-secret` header of the signup hook.
    #[serde(default)]
    pub signup_secret: Option<String>,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("BALANCO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_env_with_defaults() {
        temp_env::with_vars(
            [
                ("BALANCO__DATABASE__URL", Some("postgres://localhost/balanco")),
                ("BALANCO__AUTH__JWT_SECRET", Some("secret")),
                ("RUN_MODE", Some("test-does-not-exist")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/balanco");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.auth.audience, "authenticated");
                assert_eq!(config.server.port, 3001);
                assert_eq!(config.trial.days, 7);
                assert!(config.scheduler.enabled);
                assert_eq!(config.scheduler.timezone, "America/Sao_Paulo");
                assert_eq!(config.billing.plan_amount, Decimal::new(3990, 2));
                assert!(config.hooks.signup_secret.is_none());
            },
        );
    }

    #[test]
    fn test_env_overrides() {
        temp_env::with_vars(
            [
                ("BALANCO__DATABASE__URL", Some("postgres://db/balanco")),
                ("BALANCO__AUTH__JWT_SECRET", Some("secret")),
                ("BALANCO__SERVER__PORT", Some("8080")),
                ("BALANCO__TRIAL__DAYS", Some("14")),
                ("BALANCO__SCHEDULER__ENABLED", Some("false")),
                ("BALANCO__HOOKS__SIGNUP_SECRET", Some("hook-secret")),
                ("RUN_MODE", Some("test-does-not-exist")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.server.port, 8080);
                assert_eq!(config.trial.days, 14);
                assert!(!config.scheduler.enabled);
                assert_eq!(config.hooks.signup_secret.as_deref(), Some("hook-secret"));
            },
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        temp_env::with_vars(
            [
                ("BALANCO__DATABASE__URL", None::<&str>),
                ("BALANCO__AUTH__JWT_SECRET", Some("secret")),
                ("RUN_MODE", Some("test-does-not-exist")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }
}
