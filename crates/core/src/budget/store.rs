//! Store abstractions the budget engine depends on.
//!
//! The engine never talks to a concrete persistence client; it is handed
//! these trait objects at construction time. Production wires them to the
//! SeaORM repositories in `helm-db`; tests wire them to in-memory fakes.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use super::types::{Category, NewWeeklyBudget, WeeklyBudget};

/// Errors reported by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated (e.g. two concurrent callers
    /// both tried to create the same weekly budget row). The engine treats
    /// this as "someone else created it first" and falls through to a read.
    #[error("conflicting write: {0}")]
    Conflict(String),

    /// Any other storage failure. Not retried by the engine.
    #[error("storage error: {0}")]
    Backend(String),
}

/// Read access to category records.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Looks up a category by id, scoped to a user.
    async fn find_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
    ) -> Result<Option<Category>, StoreError>;

    /// Lists a user's active categories.
    async fn list_active_categories(&self, user_id: Uuid) -> Result<Vec<Category>, StoreError>;
}

/// Read access to transaction records.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Sums expense-type transaction amounts for a user and category whose
    /// date falls within `[from, to]` inclusive, and returns the sum
    /// together with the number of matching transactions.
    async fn expense_total(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<(Decimal, u64), StoreError>;
}

/// Read/write access to weekly budget records.
///
/// Weekly budget rows are exclusively owned by the engine; nothing else
/// writes them.
#[async_trait]
pub trait WeeklyBudgetStore: Send + Sync {
    /// Finds the row for a `(user, category, week_start)` tuple.
    async fn find_week(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        week_start: NaiveDate,
    ) -> Result<Option<WeeklyBudget>, StoreError>;

    /// Inserts a new weekly budget row.
    ///
    /// Must return [`StoreError::Conflict`] when a row for the same
    /// `(user, category, week_start)` already exists.
    async fn insert_week(&self, new: NewWeeklyBudget) -> Result<WeeklyBudget, StoreError>;

    /// Overwrites the derived `spent` amount on an existing row and bumps
    /// its update timestamp.
    async fn update_spent(&self, id: Uuid, spent: Decimal) -> Result<WeeklyBudget, StoreError>;
}
