//! Initial database migration.
//!
//! Creates the categories, transactions, and weekly_budgets tables and the
//! transaction_kind enum.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(CATEGORIES_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(WEEKLY_BUDGETS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE transaction_kind AS ENUM (
    'income',
    'expense'
);
";

const CATEGORIES_SQL: &str = r"
CREATE TABLE categories (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL,
    name VARCHAR(100) NOT NULL,
    icon VARCHAR(16),
    monthly_ceiling NUMERIC(12, 2) NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT true,
    is_custom BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_monthly_ceiling_non_negative CHECK (monthly_ceiling >= 0),
    -- Name uniqueness spans active and archived categories alike.
    UNIQUE (user_id, name)
);

CREATE INDEX idx_categories_user_active ON categories(user_id) WHERE is_active = true;
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL,
    -- Hard-deleting a category detaches its transactions.
    category_id UUID REFERENCES categories(id) ON DELETE SET NULL,
    date DATE NOT NULL,
    description VARCHAR(255) NOT NULL,
    amount NUMERIC(12, 2) NOT NULL,
    kind transaction_kind NOT NULL,
    notes TEXT,
    source VARCHAR(50) NOT NULL DEFAULT 'manual',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    -- Amounts are magnitudes; direction lives in kind.
    CONSTRAINT chk_amount_non_negative CHECK (amount >= 0)
);

CREATE INDEX idx_transactions_user_date ON transactions(user_id, date);
CREATE INDEX idx_transactions_user_category_date ON transactions(user_id, category_id, date);
";

const WEEKLY_BUDGETS_SQL: &str = r"
CREATE TABLE weekly_budgets (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL,
    category_id UUID NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
    week_start DATE NOT NULL,
    week_end TIMESTAMPTZ NOT NULL,
    weekly_limit NUMERIC(12, 2) NOT NULL,
    spent NUMERIC(12, 2) NOT NULL DEFAULT 0,
    carryover NUMERIC(12, 2) NOT NULL DEFAULT 0,
    status VARCHAR(20) NOT NULL DEFAULT 'active',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    -- Concurrent lazy creates race on this; the engine resolves the
    -- conflict by re-reading the winner's row.
    UNIQUE (user_id, category_id, week_start)
);

CREATE INDEX idx_weekly_budgets_user_week ON weekly_budgets(user_id, week_start);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS weekly_budgets;
DROP TABLE IF EXISTS transactions;
DROP TABLE IF EXISTS categories;
DROP TYPE IF EXISTS transaction_kind;
";
