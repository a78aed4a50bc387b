//! Organization and profile repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use super::error::{RepositoryError, is_unique_violation};
use crate::entities::{organizations, profiles, sea_orm_active_enums::SubscriptionStatus};

/// Name used when the signup metadata carries none.
pub const DEFAULT_USER_NAME: &str = "Novo Usuário";

/// Result of provisioning a new user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Provisioned {
    /// The user's organization.
    pub organization_id: Uuid,
    /// False when the profile already existed.
    pub created: bool,
}

/// Organization repository.
#[derive(Debug, Clone)]
pub struct OrganizationRepository {
    db: DatabaseConnection,
}

impl OrganizationRepository {
    /// Creates a new organization repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an organization by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<organizations::Model>, RepositoryError> {
        Ok(organizations::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Resolves a user's profile and organization.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when either is missing.
    pub async fn context_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<(profiles::Model, organizations::Model), RepositoryError> {
        let profile = profiles::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                RepositoryError::NotFound("Perfil do usuário não encontrado.".to_string())
            })?;

        let organization = organizations::Entity::find_by_id(profile.organization_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Organização não encontrada.".to_string()))?;

        Ok((profile, organization))
    }

    /// Creates the organization and profile of a newly signed-up user.
    ///
    /// Idempotent: a user that already has a profile is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the database fails.
    pub async fn provision_for_user(
        &self,
        user_id: Uuid,
        full_name: Option<&str>,
    ) -> Result<Provisioned, RepositoryError> {
        if let Some(profile) = profiles::Entity::find_by_id(user_id).one(&self.db).await? {
            return Ok(Provisioned {
                organization_id: profile.organization_id,
                created: false,
            });
        }

        let name = full_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_USER_NAME);

        let txn = self.db.begin().await?;
        let now = chrono::Utc::now().fixed_offset();
        let org_id = Uuid::new_v4();

        let org = organizations::ActiveModel {
            id: Set(org_id),
            name: Set(format!("Organização de {name}")),
            subscription_status: Set(SubscriptionStatus::Trialing),
            subscription_id: Set(None),
            trial_ends_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        org.insert(&txn).await?;

        let profile = profiles::ActiveModel {
            id: Set(user_id),
            organization_id: Set(org_id),
            full_name: Set(Some(name.to_string())),
            date_of_birth: Set(None),
            phone_number: Set(None),
            document_number: Set(None),
            avatar_url: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match profile.insert(&txn).await {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                // Concurrent delivery of the same hook won the race.
                txn.rollback().await?;
                let (profile, _) = self.context_for_user(user_id).await?;
                return Ok(Provisioned {
                    organization_id: profile.organization_id,
                    created: false,
                });
            }
            Err(e) => return Err(e.into()),
        }

        txn.commit().await?;
        tracing::info!(user_id = %user_id, org_id = %org_id, "organization provisioned");

        Ok(Provisioned {
            organization_id: org_id,
            created: true,
        })
    }

    /// Records the subscription state reported by the payment provider.
    ///
    /// Returns false when the organization does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update_subscription(
        &self,
        org_id: Uuid,
        status: SubscriptionStatus,
        subscription_id: &str,
    ) -> Result<bool, RepositoryError> {
        let result = organizations::Entity::update_many()
            .col_expr(organizations::Column::SubscriptionStatus, Expr::value(status))
            .col_expr(
                organizations::Column::SubscriptionId,
                Expr::value(subscription_id.to_string()),
            )
            .col_expr(
                organizations::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().fixed_offset()),
            )
            .filter(organizations::Column::Id.eq(org_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            tracing::info!(org_id = %org_id, status = ?status, "subscription status updated");
        }
        Ok(result.rows_affected > 0)
    }
}
