//! Materializer claims.
//!
//! Adds the claim timestamp written when a run advances a rule, and the
//! unique index that keeps one ledger entry per rule and due date.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(CLAIMS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r"
            DROP INDEX IF EXISTS ux_transactions_recurring_due;
            DROP INDEX IF EXISTS idx_recurring_due;
            ALTER TABLE recurring_transactions DROP COLUMN IF EXISTS claimed_at;
            ",
        )
        .await?;
        Ok(())
    }
}

const CLAIMS_SQL: &str = r"
ALTER TABLE recurring_transactions ADD COLUMN claimed_at TIMESTAMPTZ;

-- Due-rule scan
CREATE INDEX idx_recurring_due ON recurring_transactions(next_run_date)
    WHERE is_active;

-- At most one materialized entry per rule and due date
CREATE UNIQUE INDEX ux_transactions_recurring_due
    ON transactions(recurring_transaction_id, due_date)
    WHERE recurring_transaction_id IS NOT NULL;
";
