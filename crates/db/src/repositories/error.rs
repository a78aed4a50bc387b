//! Error type shared by the repositories.

use balanco_core::installment::InstallmentError;
use balanco_core::invoice::InvoiceError;
use balanco_core::ledger::LedgerError;
use balanco_core::profile::ProfileError;
use balanco_core::tenancy::OrgScoped;
use sea_orm::{DbErr, SqlErr};
use uuid::Uuid;

/// Error types for repository operations.
///
/// Messages of the non-database variants are shown to API clients as is.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Row (or the caller's profile/organization) absent.
    #[error("{0}")]
    NotFound(String),

    /// Row belongs to another organization.
    #[error("{0}")]
    Forbidden(String),

    /// Uniqueness violation.
    #[error("{0}")]
    Conflict(String),

    /// Input rejected by a domain rule.
    #[error("{0}")]
    Validation(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<LedgerError> for RepositoryError {
    fn from(err: LedgerError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<InstallmentError> for RepositoryError {
    fn from(err: InstallmentError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<InvoiceError> for RepositoryError {
    fn from(err: InvoiceError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ProfileError> for RepositoryError {
    fn from(err: ProfileError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Unwraps a loaded row, checking that `caller_org` owns it.
pub(crate) fn owned<M: OrgScoped>(
    row: Option<M>,
    caller_org: Uuid,
    not_found: &str,
    forbidden: &str,
) -> Result<M, RepositoryError> {
    let row = row.ok_or_else(|| RepositoryError::NotFound(not_found.to_string()))?;
    if let Err(err) = row.ensure_owned_by(caller_org) {
        tracing::warn!(org_id = %caller_org, row_id = %err.row_id, "cross-organization access refused");
        return Err(RepositoryError::Forbidden(forbidden.to_string()));
    }
    Ok(row)
}

/// Whether `err` is a unique-constraint violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
