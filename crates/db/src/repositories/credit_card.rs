//! Credit card repository and invoice closing.

use balanco_core::invoice::{Invoice, InvoiceMonth, close_invoice, validate_card_day};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, Statement, TransactionTrait,
};
use uuid::Uuid;

use super::error::{RepositoryError, owned};
use crate::entities::{
    credit_card_purchases, credit_cards,
    sea_orm_active_enums::{TransactionStatus, TransactionType},
    transactions,
};

const NOT_FOUND: &str = "Cartão não encontrado.";
const FORBIDDEN: &str = "Você não tem permissão para acessar este cartão.";

/// Input for creating or replacing a card.
#[derive(Debug, Clone)]
pub struct CreditCardInput {
    /// Display name.
    pub name: String,
    /// Brand (Visa, Mastercard, ...).
    pub card_brand: Option<String>,
    /// Display color.
    pub card_color: Option<String>,
    /// Statement closing day (1-31).
    pub closing_day: i32,
    /// Payment due day (1-31).
    pub due_day: i32,
}

/// Credit card repository.
#[derive(Debug, Clone)]
pub struct CreditCardRepository {
    db: DatabaseConnection,
}

impl CreditCardRepository {
    /// Creates a new credit card repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the organization's cards by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, org_id: Uuid) -> Result<Vec<credit_cards::Model>, RepositoryError> {
        Ok(credit_cards::Entity::find()
            .filter(credit_cards::Column::OrganizationId.eq(org_id))
            .order_by_asc(credit_cards::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Loads a card owned by `org_id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Forbidden`.
    pub async fn find(
        &self,
        org_id: Uuid,
        id: Uuid,
    ) -> Result<credit_cards::Model, RepositoryError> {
        let row = credit_cards::Entity::find_by_id(id).one(&self.db).await?;
        owned(row, org_id, NOT_FOUND, FORBIDDEN)
    }

    /// Creates a card.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank name or a day outside 1-31.
    pub async fn create(
        &self,
        org_id: Uuid,
        input: CreditCardInput,
    ) -> Result<credit_cards::Model, RepositoryError> {
        let input = validate(input)?;

        let card = credit_cards::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(org_id),
            name: Set(input.name),
            card_brand: Set(input.card_brand),
            card_color: Set(input.card_color),
            closing_day: Set(input.closing_day),
            due_day: Set(input.due_day),
            created_at: Set(chrono::Utc::now().into()),
        };

        Ok(card.insert(&self.db).await?)
    }

    /// Replaces a card's fields.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Forbidden` or `Validation`.
    pub async fn update(
        &self,
        org_id: Uuid,
        id: Uuid,
        input: CreditCardInput,
    ) -> Result<credit_cards::Model, RepositoryError> {
        let existing = self.find(org_id, id).await?;
        let input = validate(input)?;

        let mut card: credit_cards::ActiveModel = existing.into();
        card.name = Set(input.name);
        card.card_brand = Set(input.card_brand);
        card.card_color = Set(input.card_color);
        card.closing_day = Set(input.closing_day);
        card.due_day = Set(input.due_day);

        Ok(card.update(&self.db).await?)
    }

    /// The card's invoice for `month`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Forbidden`.
    pub async fn invoice(
        &self,
        org_id: Uuid,
        card_id: Uuid,
        month: InvoiceMonth,
    ) -> Result<(credit_cards::Model, Invoice), RepositoryError> {
        let card = self.find(org_id, card_id).await?;
        let purchases = credit_card_purchases::Entity::find()
            .filter(credit_card_purchases::Column::CreditCardId.eq(card.id))
            .filter(credit_card_purchases::Column::PurchaseDate.gte(month.first_day()))
            .filter(credit_card_purchases::Column::PurchaseDate.lte(month.last_day()))
            .order_by_asc(credit_card_purchases::Column::PurchaseDate)
            .all(&self.db)
            .await?;

        let invoice = Invoice::build(month, purchases.into_iter().map(Into::into));
        Ok((card, invoice))
    }

    /// Closes the card's invoice for `month` into one pending expense.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty invoice and `Conflict` when the
    /// invoice was already closed.
    pub async fn close_invoice(
        &self,
        org_id: Uuid,
        card_id: Uuid,
        month: InvoiceMonth,
        today: NaiveDate,
    ) -> Result<transactions::Model, RepositoryError> {
        let (card, invoice) = self.invoice(org_id, card_id, month).await?;
        let closing = close_invoice(&invoice, &card.name, card.due_day, today)?;

        let txn = self.db.begin().await?;

        // Serializes concurrent closes of the same invoice until commit.
        txn.execute(Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT pg_advisory_xact_lock(hashtextextended($1, 0))",
            [format!("{org_id}:{}", closing.description).into()],
        ))
        .await?;

        let already_closed = transactions::Entity::find()
            .filter(transactions::Column::OrganizationId.eq(org_id))
            .filter(transactions::Column::Description.eq(closing.description.as_str()))
            .count(&txn)
            .await?;
        if already_closed > 0 {
            txn.rollback().await?;
            return Err(RepositoryError::Conflict(
                "Esta fatura já foi fechada.".to_string(),
            ));
        }

        let entry = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(org_id),
            description: Set(closing.description),
            amount: Set(closing.amount),
            kind: Set(TransactionType::Despesa),
            status: Set(TransactionStatus::Pendente),
            category_id: Set(None),
            entry_date: Set(closing.entry_date),
            due_date: Set(Some(closing.due_date)),
            payment_date: Set(None),
            recurring_transaction_id: Set(None),
            created_at: Set(chrono::Utc::now().into()),
        };
        let entry = entry.insert(&txn).await?;

        txn.commit().await?;
        tracing::info!(
            org_id = %org_id,
            card_id = %card.id,
            month = %month,
            total = %entry.amount,
            "invoice closed"
        );
        Ok(entry)
    }
}

fn validate(input: CreditCardInput) -> Result<CreditCardInput, RepositoryError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(RepositoryError::Validation(
            "O nome do cartão é obrigatório.".to_string(),
        ));
    }
    Ok(CreditCardInput {
        name: name.to_string(),
        closing_day: validate_card_day(input.closing_day)?,
        due_day: validate_card_day(input.due_day)?,
        ..input
    })
}
