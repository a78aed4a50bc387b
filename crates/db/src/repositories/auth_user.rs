//! Read-only lookups in the auth provider's user table.

use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};
use serde::Serialize;

use super::error::RepositoryError;

/// Whether an e-mail is registered and confirmed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EmailStatus {
    /// A user with this e-mail exists.
    pub exists: bool,
    /// The user confirmed the e-mail.
    pub confirmed: bool,
}

/// Auth user lookups.
#[derive(Debug, Clone)]
pub struct AuthUserRepository {
    db: DatabaseConnection,
}

impl AuthUserRepository {
    /// Creates a new auth user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Looks an e-mail up, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn check_email(&self, email: &str) -> Result<EmailStatus, RepositoryError> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r"SELECT email_confirmed_at IS NOT NULL AS confirmed
              FROM auth.users
              WHERE lower(email) = lower($1)
              LIMIT 1",
            [email.trim().into()],
        );

        let Some(row) = self.db.query_one(stmt).await? else {
            return Ok(EmailStatus::default());
        };
        Ok(EmailStatus {
            exists: true,
            confirmed: row.try_get::<bool>("", "confirmed")?,
        })
    }
}
