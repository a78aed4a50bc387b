//! Initial schema.
//!
//! Creates organizations, profiles, categories, ledger entries, recurring
//! rules and credit cards with their purchases. Every business table carries
//! `organization_id`.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: AUTH STORE (no-op on the hosted provider)
        // ============================================================
        db.execute_unprepared(AUTH_SQL).await?;

        // ============================================================
        // PART 2: TENANCY
        // ============================================================
        db.execute_unprepared(TENANCY_SQL).await?;

        // ============================================================
        // PART 3: LEDGER
        // ============================================================
        db.execute_unprepared(LEDGER_SQL).await?;

        // ============================================================
        // PART 4: CREDIT CARDS
        // ============================================================
        db.execute_unprepared(CARDS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r"
            DROP TABLE IF EXISTS credit_card_purchases CASCADE;
            DROP TABLE IF EXISTS credit_cards CASCADE;
            DROP TABLE IF EXISTS transactions CASCADE;
            DROP TABLE IF EXISTS recurring_transactions CASCADE;
            DROP TABLE IF EXISTS categories CASCADE;
            DROP TABLE IF EXISTS profiles CASCADE;
            DROP TABLE IF EXISTS organizations CASCADE;
            ",
        )
        .await?;
        Ok(())
    }
}

const AUTH_SQL: &str = r"
-- The hosted auth provider owns this table. Created here only so local
-- databases have something for profiles to reference.
CREATE SCHEMA IF NOT EXISTS auth;

CREATE TABLE IF NOT EXISTS auth.users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email TEXT,
    email_confirmed_at TIMESTAMPTZ,
    raw_user_meta_data JSONB,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const TENANCY_SQL: &str = r"
CREATE TABLE organizations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name TEXT NOT NULL,
    subscription_status TEXT NOT NULL DEFAULT 'trialing',
    subscription_id TEXT,
    trial_ends_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_subscription_status
        CHECK (subscription_status IN ('trialing', 'active', 'paused', 'cancelled'))
);

CREATE INDEX idx_organizations_subscription ON organizations(subscription_id)
    WHERE subscription_id IS NOT NULL;

CREATE TABLE profiles (
    id UUID PRIMARY KEY REFERENCES auth.users(id) ON DELETE CASCADE,
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    full_name TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_profiles_org ON profiles(organization_id);
";

const LEDGER_SQL: &str = r"
CREATE TABLE categories (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    sequential_id BIGINT GENERATED ALWAYS AS IDENTITY,
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    user_id UUID,
    name TEXT NOT NULL,
    color TEXT NOT NULL DEFAULT '#94a3b8',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_categories_org_name UNIQUE (organization_id, name),
    CONSTRAINT chk_categories_color CHECK (color ~ '^#[0-9a-f]{6}$')
);

CREATE TABLE recurring_transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    description TEXT NOT NULL,
    amount NUMERIC(12, 2) NOT NULL,
    type TEXT NOT NULL,
    category_id UUID REFERENCES categories(id) ON DELETE SET NULL,
    frequency TEXT NOT NULL,
    start_date DATE NOT NULL,
    next_run_date DATE NOT NULL,
    end_date DATE,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_recurring_amount CHECK (amount > 0),
    CONSTRAINT chk_recurring_type CHECK (type IN ('receita', 'despesa'))
);

CREATE INDEX idx_recurring_org ON recurring_transactions(organization_id);

CREATE TABLE transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    description TEXT NOT NULL,
    amount NUMERIC(12, 2) NOT NULL,
    type TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pendente',
    category_id UUID REFERENCES categories(id) ON DELETE SET NULL,
    entry_date DATE NOT NULL DEFAULT CURRENT_DATE,
    due_date DATE,
    payment_date DATE,
    recurring_transaction_id UUID REFERENCES recurring_transactions(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_transactions_amount CHECK (amount > 0),
    CONSTRAINT chk_transactions_type CHECK (type IN ('receita', 'despesa')),
    CONSTRAINT chk_transactions_status CHECK (status IN ('pago', 'pendente')),
    CONSTRAINT chk_transactions_dates CHECK (
        (status = 'pago' AND due_date IS NULL)
        OR (status = 'pendente' AND payment_date IS NULL)
    )
);

-- Listing newest first per organization (most common query)
CREATE INDEX idx_transactions_org_entry ON transactions(organization_id, entry_date DESC);

-- Reports filter on either date basis
CREATE INDEX idx_transactions_org_due ON transactions(organization_id, due_date);
CREATE INDEX idx_transactions_org_payment ON transactions(organization_id, payment_date);
";

const CARDS_SQL: &str = r"
CREATE TABLE credit_cards (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    card_brand TEXT,
    card_color TEXT,
    closing_day INTEGER NOT NULL,
    due_day INTEGER NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_cards_closing_day CHECK (closing_day BETWEEN 1 AND 31),
    CONSTRAINT chk_cards_due_day CHECK (due_day BETWEEN 1 AND 31)
);

CREATE INDEX idx_cards_org ON credit_cards(organization_id);

CREATE TABLE credit_card_purchases (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    credit_card_id UUID NOT NULL REFERENCES credit_cards(id) ON DELETE CASCADE,
    description TEXT NOT NULL,
    amount NUMERIC(12, 2) NOT NULL,
    purchase_date DATE NOT NULL,
    category_id UUID REFERENCES categories(id) ON DELETE SET NULL,
    current_installment INTEGER,
    total_installments INTEGER,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_purchases_amount CHECK (amount > 0),
    CONSTRAINT chk_purchases_installments CHECK (
        (current_installment IS NULL AND total_installments IS NULL)
        OR (current_installment BETWEEN 1 AND total_installments)
    )
);

-- Invoice lookup: one card, one month
CREATE INDEX idx_purchases_card_date ON credit_card_purchases(credit_card_id, purchase_date);
";
