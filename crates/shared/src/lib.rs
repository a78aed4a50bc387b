//! Shared errors, configuration and token verification for Balanço Certo.
//!
//! This crate provides common pieces used across all other crates:
//! - Application-wide error taxonomy
//! - Layered configuration
//! - Verification of the access tokens issued by the hosted auth service

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;

pub use auth::Claims;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtError, TokenVerifier};
