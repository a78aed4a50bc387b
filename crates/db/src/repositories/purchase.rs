//! Credit card purchase repository.

use balanco_core::installment::{expand, validate_pair};
use balanco_core::invoice::InvoiceMonth;
use balanco_core::ledger::{validate_amount, validate_description};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::category::ensure_category;
use super::error::{RepositoryError, owned};
use crate::entities::{credit_card_purchases, credit_cards};

const NOT_FOUND: &str = "Compra não encontrada.";
const FORBIDDEN: &str = "Você não tem permissão para alterar esta compra.";

/// Input for creating or replacing a purchase.
#[derive(Debug, Clone)]
pub struct PurchaseInput {
    /// Card the purchase was made with.
    pub credit_card_id: Uuid,
    /// Description.
    pub description: String,
    /// Amount of this row.
    pub amount: Decimal,
    /// Purchase date (first installment's date for a plan).
    pub purchase_date: NaiveDate,
    /// Category ID.
    pub category_id: Option<Uuid>,
    /// Plan length of a single installment row.
    pub total_installments: Option<i32>,
    /// Position of a single installment row.
    pub current_installment: Option<i32>,
}

/// Filter options for listing purchases.
#[derive(Debug, Clone, Copy, Default)]
pub struct PurchaseFilter {
    /// Card ID.
    pub card_id: Option<Uuid>,
    /// Invoice month.
    pub month: Option<InvoiceMonth>,
}

/// Credit card purchase repository.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    db: DatabaseConnection,
}

impl PurchaseRepository {
    /// Creates a new purchase repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists purchases newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        org_id: Uuid,
        filter: PurchaseFilter,
    ) -> Result<Vec<credit_card_purchases::Model>, RepositoryError> {
        let mut query = credit_card_purchases::Entity::find()
            .filter(credit_card_purchases::Column::OrganizationId.eq(org_id));
        if let Some(card_id) = filter.card_id {
            query = query.filter(credit_card_purchases::Column::CreditCardId.eq(card_id));
        }
        if let Some(month) = filter.month {
            query = query
                .filter(credit_card_purchases::Column::PurchaseDate.gte(month.first_day()))
                .filter(credit_card_purchases::Column::PurchaseDate.lte(month.last_day()));
        }

        Ok(query
            .order_by_desc(credit_card_purchases::Column::PurchaseDate)
            .order_by_asc(credit_card_purchases::Column::CurrentInstallment)
            .all(&self.db)
            .await?)
    }

    /// Loads a purchase owned by `org_id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Forbidden`.
    pub async fn find(
        &self,
        org_id: Uuid,
        id: Uuid,
    ) -> Result<credit_card_purchases::Model, RepositoryError> {
        let row = credit_card_purchases::Entity::find_by_id(id)
            .one(&self.db)
            .await?;
        owned(row, org_id, NOT_FOUND, FORBIDDEN)
    }

    /// Creates a single purchase row.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for bad fields or an inconsistent installment
    /// pair, and `NotFound`/`Forbidden` for the card.
    pub async fn create(
        &self,
        org_id: Uuid,
        input: PurchaseInput,
    ) -> Result<credit_card_purchases::Model, RepositoryError> {
        let (description, amount) = self.validate(org_id, &input).await?;
        validate_pair(input.total_installments, input.current_installment)?;

        let purchase = credit_card_purchases::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(org_id),
            credit_card_id: Set(input.credit_card_id),
            description: Set(description),
            amount: Set(amount),
            purchase_date: Set(input.purchase_date),
            category_id: Set(input.category_id),
            current_installment: Set(input.current_installment),
            total_installments: Set(input.total_installments),
            created_at: Set(chrono::Utc::now().into()),
        };

        Ok(purchase.insert(&self.db).await?)
    }

    /// Expands a purchase into `installments` monthly rows and inserts them
    /// all in one store transaction.
    ///
    /// Every row carries the input amount.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when `installments` is outside 2-72.
    pub async fn create_plan(
        &self,
        org_id: Uuid,
        input: PurchaseInput,
        installments: u32,
    ) -> Result<Vec<credit_card_purchases::Model>, RepositoryError> {
        let (description, amount) = self.validate(org_id, &input).await?;
        let plan = expand(&description, installments, input.purchase_date)?;
        let now = chrono::Utc::now().fixed_offset();

        let txn = self.db.begin().await?;
        let mut rows = Vec::with_capacity(plan.len());
        for installment in plan {
            let purchase = credit_card_purchases::ActiveModel {
                id: Set(Uuid::new_v4()),
                organization_id: Set(org_id),
                credit_card_id: Set(input.credit_card_id),
                description: Set(installment.item),
                amount: Set(amount),
                purchase_date: Set(installment.purchase_date),
                category_id: Set(input.category_id),
                current_installment: Set(Some(installment.current_installment)),
                total_installments: Set(Some(installment.total_installments)),
                created_at: Set(now),
            };
            rows.push(purchase.insert(&txn).await?);
        }
        txn.commit().await?;

        tracing::info!(
            org_id = %org_id,
            card_id = %input.credit_card_id,
            installments,
            "installment plan created"
        );
        Ok(rows)
    }

    /// Replaces a purchase's fields.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Forbidden` or `Validation`.
    pub async fn update(
        &self,
        org_id: Uuid,
        id: Uuid,
        input: PurchaseInput,
    ) -> Result<credit_card_purchases::Model, RepositoryError> {
        let existing = self.find(org_id, id).await?;
        let (description, amount) = self.validate(org_id, &input).await?;
        validate_pair(input.total_installments, input.current_installment)?;

        let mut purchase: credit_card_purchases::ActiveModel = existing.into();
        purchase.credit_card_id = Set(input.credit_card_id);
        purchase.description = Set(description);
        purchase.amount = Set(amount);
        purchase.purchase_date = Set(input.purchase_date);
        purchase.category_id = Set(input.category_id);
        purchase.current_installment = Set(input.current_installment);
        purchase.total_installments = Set(input.total_installments);

        Ok(purchase.update(&self.db).await?)
    }

    /// Deletes one purchase row.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Forbidden`.
    pub async fn delete(&self, org_id: Uuid, id: Uuid) -> Result<(), RepositoryError> {
        let purchase = self.find(org_id, id).await?;
        credit_card_purchases::Entity::delete_by_id(purchase.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn validate(
        &self,
        org_id: Uuid,
        input: &PurchaseInput,
    ) -> Result<(String, Decimal), RepositoryError> {
        let description = validate_description(&input.description)?;
        let amount = validate_amount(input.amount)?;

        let card = credit_cards::Entity::find_by_id(input.credit_card_id)
            .one(&self.db)
            .await?;
        owned(
            card,
            org_id,
            "Cartão não encontrado.",
            "O cartão informado pertence a outra organização.",
        )?;
        ensure_category(&self.db, org_id, input.category_id).await?;

        Ok((description, amount))
    }
}
