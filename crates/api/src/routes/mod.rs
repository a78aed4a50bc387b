//! API route definitions.

use axum::{Router, middleware};
use serde::Serialize;

use crate::{AppState, middleware::auth_middleware};

pub mod accounts;
pub mod billing;
pub mod categories;
pub mod credit_cards;
pub mod health;
pub mod hooks;
pub mod organization;
pub mod profile;
pub mod purchases;
pub mod recurring;
pub mod reports;
pub mod transactions;

/// Confirmation body of deletions.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: &'static str,
}

/// Creates the API router; protected routes get the auth middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(organization::routes())
        .merge(profile::routes())
        .merge(categories::routes())
        .merge(transactions::routes())
        .merge(recurring::routes())
        .merge(credit_cards::routes())
        .merge(purchases::routes())
        .merge(reports::routes())
        .merge(billing::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(accounts::routes())
        .merge(hooks::routes())
        .merge(billing::public_routes())
        .merge(protected_routes)
}
