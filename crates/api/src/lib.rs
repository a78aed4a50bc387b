//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api`
//! - Authentication middleware resolving the caller's organization
//! - Request extractors and the JSON error boundary
//! - The payment provider client
//! - The recurring-transaction scheduler

pub mod error;
pub mod extractors;
pub mod jobs;
pub mod middleware;
pub mod payments;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use balanco_core::trial::TrialPolicy;
use balanco_shared::TokenVerifier;
use chrono::NaiveDate;
use chrono_tz::Tz;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::payments::PaymentGateway;

/// Upper bound on a request's processing time.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: DatabaseConnection,
    /// Bearer token verifier.
    pub verifier: Arc<TokenVerifier>,
    /// Payment provider.
    pub payments: Arc<dyn PaymentGateway>,
    /// Free-trial rules.
    pub trial: TrialPolicy,
    /// Timezone that defines "today".
    pub timezone: Tz,
    /// Expected `x-webhook-secret` of the signup hook.
    pub signup_secret: Option<Arc<str>>,
}

impl AppState {
    /// Current calendar date in the configured timezone.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        jobs::today_in(self.timezone)
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes_with_state(state.clone()))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
