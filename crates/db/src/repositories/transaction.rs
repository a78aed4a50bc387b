//! Ledger entry repository.

use balanco_core::ledger::{
    EffectiveStatus, EntryKind, EntryStatus, ExportRow, resolve_dates, validate_amount,
    validate_description,
};
use balanco_core::reports::{ReportBasis, ReportEntry, ReportFilter};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::category::ensure_category;
use super::error::{RepositoryError, owned};
use crate::entities::{
    sea_orm_active_enums::{TransactionStatus, TransactionType},
    transactions,
};

const NOT_FOUND: &str = "Lançamento não encontrado.";
const FORBIDDEN: &str = "Você não tem permissão para alterar este lançamento.";

/// Input for creating or replacing a ledger entry.
#[derive(Debug, Clone)]
pub struct TransactionInput {
    /// Description.
    pub description: String,
    /// Positive amount.
    pub amount: Decimal,
    /// Income or expense.
    pub kind: EntryKind,
    /// Stored status.
    pub status: EntryStatus,
    /// Category ID.
    pub category_id: Option<Uuid>,
    /// Bookkeeping date; defaults to today.
    pub entry_date: Option<NaiveDate>,
    /// Due date; kept only while pending.
    pub due_date: Option<NaiveDate>,
    /// Payment date; kept only once paid.
    pub payment_date: Option<NaiveDate>,
}

/// Filter options for listing entries.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Effective status.
    pub status: Option<EffectiveStatus>,
    /// Income or expense.
    pub kind: Option<EntryKind>,
    /// Entry date lower bound (inclusive).
    pub from: Option<NaiveDate>,
    /// Entry date upper bound (inclusive).
    pub to: Option<NaiveDate>,
    /// Category ID.
    pub category_id: Option<Uuid>,
}

/// Ledger entry repository.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists entries newest first.
    ///
    /// The status filter matches the effective status on `today`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        org_id: Uuid,
        filter: &TransactionFilter,
        today: NaiveDate,
    ) -> Result<Vec<transactions::Model>, RepositoryError> {
        let mut query =
            transactions::Entity::find().filter(transactions::Column::OrganizationId.eq(org_id));

        if let Some(status) = filter.status {
            query = query.filter(status_condition(status, today));
        }
        if let Some(kind) = filter.kind {
            query = query.filter(transactions::Column::Kind.eq(TransactionType::from(kind)));
        }
        if let Some(from) = filter.from {
            query = query.filter(transactions::Column::EntryDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(transactions::Column::EntryDate.lte(to));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(transactions::Column::CategoryId.eq(category_id));
        }

        Ok(query
            .order_by_desc(transactions::Column::EntryDate)
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Loads an entry owned by `org_id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Forbidden`.
    pub async fn find(
        &self,
        org_id: Uuid,
        id: Uuid,
    ) -> Result<transactions::Model, RepositoryError> {
        let row = transactions::Entity::find_by_id(id).one(&self.db).await?;
        owned(row, org_id, NOT_FOUND, FORBIDDEN)
    }

    /// Creates an entry.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for bad fields or a foreign category.
    pub async fn create(
        &self,
        org_id: Uuid,
        input: TransactionInput,
        today: NaiveDate,
    ) -> Result<transactions::Model, RepositoryError> {
        let description = validate_description(&input.description)?;
        let amount = validate_amount(input.amount)?;
        ensure_category(&self.db, org_id, input.category_id).await?;
        let dates = resolve_dates(
            input.status,
            input.entry_date,
            input.due_date,
            input.payment_date,
            today,
        );

        let entry = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(org_id),
            description: Set(description),
            amount: Set(amount),
            kind: Set(input.kind.into()),
            status: Set(input.status.into()),
            category_id: Set(input.category_id),
            entry_date: Set(dates.entry_date),
            due_date: Set(dates.due_date),
            payment_date: Set(dates.payment_date),
            recurring_transaction_id: Set(None),
            created_at: Set(chrono::Utc::now().into()),
        };

        let entry = entry.insert(&self.db).await?;
        tracing::info!(org_id = %org_id, transaction_id = %entry.id, "transaction created");
        Ok(entry)
    }

    /// Replaces an entry's fields.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Forbidden` or `Validation`.
    pub async fn update(
        &self,
        org_id: Uuid,
        id: Uuid,
        input: TransactionInput,
        today: NaiveDate,
    ) -> Result<transactions::Model, RepositoryError> {
        let existing = self.find(org_id, id).await?;
        let description = validate_description(&input.description)?;
        let amount = validate_amount(input.amount)?;
        ensure_category(&self.db, org_id, input.category_id).await?;
        let dates = resolve_dates(
            input.status,
            input.entry_date.or(Some(existing.entry_date)),
            input.due_date,
            input.payment_date,
            today,
        );

        let mut entry: transactions::ActiveModel = existing.into();
        entry.description = Set(description);
        entry.amount = Set(amount);
        entry.kind = Set(input.kind.into());
        entry.status = Set(input.status.into());
        entry.category_id = Set(input.category_id);
        entry.entry_date = Set(dates.entry_date);
        entry.due_date = Set(dates.due_date);
        entry.payment_date = Set(dates.payment_date);

        Ok(entry.update(&self.db).await?)
    }

    /// Marks an entry paid on `payment_date` (default today).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Forbidden`.
    pub async fn settle(
        &self,
        org_id: Uuid,
        id: Uuid,
        payment_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<transactions::Model, RepositoryError> {
        let existing = self.find(org_id, id).await?;

        let mut entry: transactions::ActiveModel = existing.into();
        entry.status = Set(TransactionStatus::Pago);
        entry.due_date = Set(None);
        entry.payment_date = Set(Some(payment_date.unwrap_or(today)));

        let entry = entry.update(&self.db).await?;
        tracing::info!(org_id = %org_id, transaction_id = %entry.id, "transaction settled");
        Ok(entry)
    }

    /// Deletes an entry.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Forbidden`.
    pub async fn delete(&self, org_id: Uuid, id: Uuid) -> Result<(), RepositoryError> {
        let entry = self.find(org_id, id).await?;
        transactions::Entity::delete_by_id(entry.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Deletes the listed entries that belong to `org_id`; IDs of other
    /// organizations are ignored. Returns the number deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn bulk_delete(&self, org_id: Uuid, ids: &[Uuid]) -> Result<u64, RepositoryError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = transactions::Entity::delete_many()
            .filter(transactions::Column::OrganizationId.eq(org_id))
            .filter(transactions::Column::Id.is_in(ids.iter().copied()))
            .exec(&self.db)
            .await?;

        tracing::info!(org_id = %org_id, requested = ids.len(), deleted = result.rows_affected, "bulk delete");
        Ok(result.rows_affected)
    }

    /// Rows for the CSV export.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn export_rows(&self, org_id: Uuid) -> Result<Vec<ExportRow>, RepositoryError> {
        let rows = transactions::Entity::find()
            .filter(transactions::Column::OrganizationId.eq(org_id))
            .order_by_desc(transactions::Column::EntryDate)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| ExportRow {
                entry_date: row.entry_date,
                description: row.description,
                amount: row.amount,
                kind: row.kind.into(),
            })
            .collect())
    }

    /// Entries with a date on the filter's basis inside its range.
    ///
    /// Status and category filters are applied by the aggregator.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn report_entries(
        &self,
        org_id: Uuid,
        filter: &ReportFilter,
    ) -> Result<Vec<ReportEntry>, RepositoryError> {
        let column = match filter.basis {
            ReportBasis::Caixa => transactions::Column::PaymentDate,
            ReportBasis::Competencia => transactions::Column::DueDate,
        };

        let mut query = transactions::Entity::find()
            .filter(transactions::Column::OrganizationId.eq(org_id))
            .filter(column.is_not_null());
        if let Some(from) = filter.from {
            query = query.filter(column.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(column.lte(to));
        }

        let rows = query.all(&self.db).await?;
        Ok(rows
            .into_iter()
            .map(|row| ReportEntry {
                id: row.id,
                description: row.description,
                amount: row.amount,
                kind: row.kind.into(),
                status: row.status.into(),
                category_id: row.category_id,
                due_date: row.due_date,
                payment_date: row.payment_date,
            })
            .collect())
    }
}

fn status_condition(status: EffectiveStatus, today: NaiveDate) -> Condition {
    match status {
        EffectiveStatus::Pago => {
            Condition::all().add(transactions::Column::Status.eq(TransactionStatus::Pago))
        }
        EffectiveStatus::Pendente => Condition::all()
            .add(transactions::Column::Status.eq(TransactionStatus::Pendente))
            .add(
                Condition::any()
                    .add(transactions::Column::DueDate.is_null())
                    .add(transactions::Column::DueDate.gte(today)),
            ),
        EffectiveStatus::Vencido => Condition::all()
            .add(transactions::Column::Status.eq(TransactionStatus::Pendente))
            .add(transactions::Column::DueDate.lt(today)),
    }
}
