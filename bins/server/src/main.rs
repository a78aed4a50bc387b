//! Balanço Certo API Server
//!
//! Main entry point for the backend service.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono_tz::Tz;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use balanco_api::payments::{MercadoPagoClient, PaymentGateway};
use balanco_api::{AppState, create_router, jobs};
use balanco_core::trial::TrialPolicy;
use balanco_db::connect;
use balanco_shared::{AppConfig, TokenVerifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "balanco=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let timezone: Tz = config
        .scheduler
        .timezone
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid scheduler timezone: {e}"))?;

    let db = connect(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!("Connected to database");

    if config.billing.access_token.is_empty() {
        warn!("Billing access token not set; subscription checkout will fail");
    }
    let payments: Arc<dyn PaymentGateway> = Arc::new(MercadoPagoClient::new(config.billing.clone())?);

    let state = AppState {
        db: db.clone(),
        verifier: Arc::new(TokenVerifier::new(
            &config.auth.jwt_secret,
            &config.auth.audience,
        )),
        payments,
        trial: TrialPolicy::new(config.trial.days),
        timezone,
        signup_secret: config.hooks.signup_secret.as_deref().map(Arc::from),
    };

    if config.scheduler.enabled {
        let period = Duration::from_secs(config.scheduler.interval_secs.max(60));
        info!(?period, %timezone, "Recurring materializer scheduled");
        tokio::spawn(jobs::materializer_task(db, timezone, period));
    }

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
