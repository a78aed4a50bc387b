//! Request middleware.

pub mod auth;

pub use auth::{OrgContext, auth_middleware};
