//! Profile repository.
//!
//! Profiles are keyed by the auth user id and only ever read or written by
//! that user.

use balanco_core::profile::ProfileInput;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, sea_query::Expr};
use uuid::Uuid;

use super::error::RepositoryError;
use crate::entities::profiles;

const NOT_FOUND: &str = "Perfil do usuário não encontrado.";

/// Profile repository.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    db: DatabaseConnection,
}

impl ProfileRepository {
    /// Creates a new profile repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads the user's profile.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the user has no profile.
    pub async fn find(&self, user_id: Uuid) -> Result<profiles::Model, RepositoryError> {
        profiles::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(NOT_FOUND.to_string()))
    }

    /// Replaces the user's editable profile fields.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the user has no profile.
    pub async fn update(
        &self,
        user_id: Uuid,
        input: ProfileInput,
    ) -> Result<profiles::Model, RepositoryError> {
        let result = profiles::Entity::update_many()
            .col_expr(profiles::Column::FullName, Expr::value(Some(input.full_name)))
            .col_expr(profiles::Column::DateOfBirth, Expr::value(input.date_of_birth))
            .col_expr(profiles::Column::PhoneNumber, Expr::value(input.phone_number))
            .col_expr(
                profiles::Column::DocumentNumber,
                Expr::value(input.document_number),
            )
            .col_expr(profiles::Column::AvatarUrl, Expr::value(input.avatar_url))
            .col_expr(
                profiles::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().fixed_offset()),
            )
            .filter(profiles::Column::Id.eq(user_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound(NOT_FOUND.to_string()));
        }
        tracing::info!(user_id = %user_id, "profile updated");
        self.find(user_id).await
    }
}
