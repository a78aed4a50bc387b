//! Category repository.

use balanco_core::ledger::validate_category;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::error::{RepositoryError, is_unique_violation, owned};
use crate::entities::categories;

const NOT_FOUND: &str = "Categoria não encontrada.";
const FORBIDDEN: &str = "Você não tem permissão para alterar esta categoria.";
const DUPLICATE: &str = "Já existe uma categoria com este nome.";

/// Input for creating or updating a category.
#[derive(Debug, Clone)]
pub struct CategoryInput {
    /// Display name, unique within the organization.
    pub name: String,
    /// `#RRGGBB`; absent keeps the current color (default on create).
    pub color: Option<String>,
}

/// Category repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the organization's categories by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, org_id: Uuid) -> Result<Vec<categories::Model>, RepositoryError> {
        Ok(categories::Entity::find()
            .filter(categories::Column::OrganizationId.eq(org_id))
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Creates a category.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank name or malformed color and
    /// `Conflict` when the name is taken in the organization.
    pub async fn create(
        &self,
        org_id: Uuid,
        user_id: Uuid,
        input: CategoryInput,
    ) -> Result<categories::Model, RepositoryError> {
        let (name, color) = validate_category(&input.name, input.color.as_deref())?;

        let category = categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(org_id),
            user_id: Set(Some(user_id)),
            name: Set(name),
            color: Set(color),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        category.insert(&self.db).await.map_err(duplicate_name)
    }

    /// Renames or recolors a category.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Forbidden` for another organization's category,
    /// `Validation` or `Conflict`.
    pub async fn update(
        &self,
        org_id: Uuid,
        id: Uuid,
        input: CategoryInput,
    ) -> Result<categories::Model, RepositoryError> {
        let existing = self.find(org_id, id).await?;
        let color = input.color.as_deref().unwrap_or(&existing.color);
        let (name, color) = validate_category(&input.name, Some(color))?;

        let mut category: categories::ActiveModel = existing.into();
        category.name = Set(name);
        category.color = Set(color);

        category.update(&self.db).await.map_err(duplicate_name)
    }

    /// Deletes a category. Entries, rules and purchases referencing it keep
    /// existing with no category.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Forbidden`.
    pub async fn delete(&self, org_id: Uuid, id: Uuid) -> Result<(), RepositoryError> {
        let category = self.find(org_id, id).await?;
        categories::Entity::delete_by_id(category.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Loads a category owned by `org_id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Forbidden`.
    pub async fn find(&self, org_id: Uuid, id: Uuid) -> Result<categories::Model, RepositoryError> {
        let row = categories::Entity::find_by_id(id).one(&self.db).await?;
        owned(row, org_id, NOT_FOUND, FORBIDDEN)
    }
}

/// Checks that an optional category reference points at one of the
/// organization's categories.
pub(crate) async fn ensure_category<C: ConnectionTrait>(
    db: &C,
    org_id: Uuid,
    category_id: Option<Uuid>,
) -> Result<(), RepositoryError> {
    let Some(id) = category_id else {
        return Ok(());
    };
    let row = categories::Entity::find_by_id(id).one(db).await?;
    owned(
        row,
        org_id,
        "Categoria informada não existe.",
        "A categoria informada pertence a outra organização.",
    )
    .map(|_| ())
}

fn duplicate_name(err: sea_orm::DbErr) -> RepositoryError {
    if is_unique_violation(&err) {
        RepositoryError::Conflict(DUPLICATE.to_string())
    } else {
        err.into()
    }
}
