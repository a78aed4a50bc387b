//! Recurring rule repository and the materializer's store side.

use balanco_core::ledger::{EntryKind, validate_amount, validate_description};
use balanco_core::recurrence::{Decision, Frequency, Occurrence, RunOutcome, RunReport, decide};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
    sea_query::{Expr, Func},
};
use uuid::Uuid;

use super::category::ensure_category;
use super::error::{RepositoryError, is_unique_violation, owned};
use crate::entities::{
    recurring_transactions,
    sea_orm_active_enums::{TransactionStatus, TransactionType},
    transactions,
};

const NOT_FOUND: &str = "Transação recorrente não encontrada.";
const FORBIDDEN: &str = "Você não tem permissão para alterar esta transação recorrente.";

/// Input for creating or replacing a recurring rule.
#[derive(Debug, Clone)]
pub struct RecurringInput {
    /// Description copied to each occurrence.
    pub description: String,
    /// Amount copied to each occurrence.
    pub amount: Decimal,
    /// Income or expense.
    pub kind: EntryKind,
    /// Category ID.
    pub category_id: Option<Uuid>,
    /// Cadence.
    pub frequency: Frequency,
    /// First occurrence.
    pub start_date: NaiveDate,
    /// Last day an occurrence may fall on.
    pub end_date: Option<NaiveDate>,
    /// Whether the materializer picks the rule up.
    pub is_active: bool,
}

/// Recurring rule repository.
#[derive(Debug, Clone)]
pub struct RecurringRepository {
    db: DatabaseConnection,
}

impl RecurringRepository {
    /// Creates a new recurring rule repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the organization's rules by next run date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        org_id: Uuid,
    ) -> Result<Vec<recurring_transactions::Model>, RepositoryError> {
        Ok(recurring_transactions::Entity::find()
            .filter(recurring_transactions::Column::OrganizationId.eq(org_id))
            .order_by_asc(recurring_transactions::Column::NextRunDate)
            .all(&self.db)
            .await?)
    }

    /// Loads a rule owned by `org_id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Forbidden`.
    pub async fn find(
        &self,
        org_id: Uuid,
        id: Uuid,
    ) -> Result<recurring_transactions::Model, RepositoryError> {
        let row = recurring_transactions::Entity::find_by_id(id)
            .one(&self.db)
            .await?;
        owned(row, org_id, NOT_FOUND, FORBIDDEN)
    }

    /// Creates a rule whose cursor starts at `start_date`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for bad fields or an end date before the start.
    pub async fn create(
        &self,
        org_id: Uuid,
        input: RecurringInput,
    ) -> Result<recurring_transactions::Model, RepositoryError> {
        let (description, amount) = validate(&input)?;
        ensure_category(&self.db, org_id, input.category_id).await?;

        let rule = recurring_transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(org_id),
            description: Set(description),
            amount: Set(amount),
            kind: Set(input.kind.into()),
            category_id: Set(input.category_id),
            frequency: Set(input.frequency.as_str().to_string()),
            start_date: Set(input.start_date),
            next_run_date: Set(input.start_date),
            end_date: Set(input.end_date),
            is_active: Set(input.is_active),
            claimed_at: Set(None),
            created_at: Set(chrono::Utc::now().into()),
        };

        let rule = rule.insert(&self.db).await?;
        tracing::info!(org_id = %org_id, rule_id = %rule.id, frequency = %rule.frequency, "recurring rule created");
        Ok(rule)
    }

    /// Replaces a rule's fields.
    ///
    /// The cursor never moves backwards: a later start date moves it
    /// forward, an earlier one leaves it. A concurrent materializer advance
    /// is kept.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Forbidden` or `Validation`.
    pub async fn update(
        &self,
        org_id: Uuid,
        id: Uuid,
        input: RecurringInput,
    ) -> Result<recurring_transactions::Model, RepositoryError> {
        let existing = self.find(org_id, id).await?;
        let (description, amount) = validate(&input)?;
        ensure_category(&self.db, org_id, input.category_id).await?;

        // Computed in the store; a concurrent advance wins over `existing`.
        let next_run_date = Func::greatest([
            Expr::col(recurring_transactions::Column::NextRunDate).into(),
            Expr::value(input.start_date),
        ]);

        recurring_transactions::Entity::update_many()
            .col_expr(recurring_transactions::Column::Description, Expr::value(description))
            .col_expr(recurring_transactions::Column::Amount, Expr::value(amount))
            .col_expr(
                recurring_transactions::Column::Kind,
                Expr::value(TransactionType::from(input.kind)),
            )
            .col_expr(recurring_transactions::Column::CategoryId, Expr::value(input.category_id))
            .col_expr(
                recurring_transactions::Column::Frequency,
                Expr::value(input.frequency.as_str()),
            )
            .col_expr(recurring_transactions::Column::StartDate, Expr::value(input.start_date))
            .col_expr(recurring_transactions::Column::NextRunDate, next_run_date.into())
            .col_expr(recurring_transactions::Column::EndDate, Expr::value(input.end_date))
            .col_expr(recurring_transactions::Column::IsActive, Expr::value(input.is_active))
            .filter(recurring_transactions::Column::Id.eq(existing.id))
            .filter(recurring_transactions::Column::OrganizationId.eq(org_id))
            .exec(&self.db)
            .await?;

        self.find(org_id, existing.id).await
    }

    /// Deletes a rule. Entries it produced keep existing without provenance.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Forbidden`.
    pub async fn delete(&self, org_id: Uuid, id: Uuid) -> Result<(), RepositoryError> {
        let rule = self.find(org_id, id).await?;
        recurring_transactions::Entity::delete_by_id(rule.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Active rules whose cursor is on or before `today`, across all
    /// organizations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn due_rules(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<recurring_transactions::Model>, RepositoryError> {
        Ok(recurring_transactions::Entity::find()
            .filter(recurring_transactions::Column::IsActive.eq(true))
            .filter(recurring_transactions::Column::NextRunDate.lte(today))
            .order_by_asc(recurring_transactions::Column::NextRunDate)
            .all(&self.db)
            .await?)
    }

    /// Materializes at most one occurrence of every due rule.
    ///
    /// Rules are processed independently; a failing rule is logged and
    /// counted and the run continues.
    ///
    /// # Errors
    ///
    /// Returns an error only if the due rules cannot be loaded.
    pub async fn materialize_due(&self, today: NaiveDate) -> Result<RunReport, RepositoryError> {
        let rules = self.due_rules(today).await?;
        let mut report = RunReport::default();

        for rule in &rules {
            let outcome = match self.materialize_rule(rule, today).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(rule_id = %rule.id, error = %e, "failed to materialize recurring rule");
                    RunOutcome::Failed
                }
            };
            report.record(outcome);
        }

        tracing::info!(
            %today,
            due = report.due,
            created = report.created,
            skipped = report.skipped,
            failed = report.failed,
            deactivated = report.deactivated,
            "recurring materializer run finished"
        );
        Ok(report)
    }

    /// Materializes the due occurrence of one rule.
    ///
    /// The cursor is advanced with a compare-and-swap on its current value in
    /// the same store transaction that inserts the entry; losing the swap
    /// means another run claimed the occurrence. When an entry for the due
    /// date already exists the cursor still advances and nothing is
    /// inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database fails.
    pub async fn materialize_rule(
        &self,
        rule: &recurring_transactions::Model,
        today: NaiveDate,
    ) -> Result<RunOutcome, RepositoryError> {
        match decide(&rule.snapshot(), today) {
            Decision::Inactive | Decision::NotDue => Ok(RunOutcome::Skipped),
            Decision::UnknownFrequency => {
                tracing::warn!(rule_id = %rule.id, frequency = %rule.frequency, "unknown frequency, rule skipped");
                Ok(RunOutcome::Skipped)
            }
            Decision::Ended => self.deactivate(rule).await,
            Decision::Materialize(occurrence) => self.claim_and_create(rule, occurrence).await,
        }
    }

    async fn deactivate(
        &self,
        rule: &recurring_transactions::Model,
    ) -> Result<RunOutcome, RepositoryError> {
        let result = recurring_transactions::Entity::update_many()
            .col_expr(recurring_transactions::Column::IsActive, Expr::value(false))
            .filter(recurring_transactions::Column::Id.eq(rule.id))
            .filter(recurring_transactions::Column::IsActive.eq(true))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(RunOutcome::Skipped);
        }
        tracing::info!(rule_id = %rule.id, "recurring rule ended, deactivated");
        Ok(RunOutcome::Deactivated)
    }

    async fn claim_and_create(
        &self,
        rule: &recurring_transactions::Model,
        occurrence: Occurrence,
    ) -> Result<RunOutcome, RepositoryError> {
        let txn = self.db.begin().await?;
        let now = chrono::Utc::now().fixed_offset();

        let claim = recurring_transactions::Entity::update_many()
            .col_expr(
                recurring_transactions::Column::NextRunDate,
                Expr::value(occurrence.next_run_date),
            )
            .col_expr(recurring_transactions::Column::ClaimedAt, Expr::value(now))
            .col_expr(
                recurring_transactions::Column::IsActive,
                Expr::value(!occurrence.deactivate),
            )
            .filter(recurring_transactions::Column::Id.eq(rule.id))
            .filter(recurring_transactions::Column::NextRunDate.eq(occurrence.due_date))
            .filter(recurring_transactions::Column::IsActive.eq(true))
            .exec(&txn)
            .await?;

        if claim.rows_affected == 0 {
            txn.rollback().await?;
            tracing::debug!(rule_id = %rule.id, "occurrence already claimed");
            return Ok(RunOutcome::Skipped);
        }

        let entry = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(rule.organization_id),
            description: Set(rule.description.clone()),
            amount: Set(rule.amount),
            kind: Set(rule.kind),
            status: Set(TransactionStatus::Pendente),
            category_id: Set(rule.category_id),
            entry_date: Set(occurrence.entry_date),
            due_date: Set(Some(occurrence.due_date)),
            payment_date: Set(None),
            recurring_transaction_id: Set(Some(rule.id)),
            created_at: Set(now),
        };

        // The insert runs under a savepoint: an entry that already exists for
        // this due date keeps the claim so the cursor still moves on.
        let savepoint = txn.begin().await?;
        match entry.insert(&savepoint).await {
            Ok(_) => savepoint.commit().await?,
            Err(e) if is_unique_violation(&e) => {
                savepoint.rollback().await?;
                txn.commit().await?;
                tracing::warn!(
                    rule_id = %rule.id,
                    due_date = %occurrence.due_date,
                    next_run_date = %occurrence.next_run_date,
                    "occurrence already materialized, cursor advanced"
                );
                return Ok(RunOutcome::Skipped);
            }
            Err(e) => return Err(e.into()),
        }

        txn.commit().await?;
        tracing::info!(
            rule_id = %rule.id,
            org_id = %rule.organization_id,
            due_date = %occurrence.due_date,
            next_run_date = %occurrence.next_run_date,
            "recurring occurrence materialized"
        );
        Ok(RunOutcome::Created {
            deactivated: occurrence.deactivate,
        })
    }
}

fn validate(input: &RecurringInput) -> Result<(String, Decimal), RepositoryError> {
    let description = validate_description(&input.description)?;
    let amount = validate_amount(input.amount)?;
    if input.end_date.is_some_and(|end| end < input.start_date) {
        return Err(RepositoryError::Validation(
            "A data final deve ser igual ou posterior à data inicial.".to_string(),
        ));
    }
    Ok((description, amount))
}
