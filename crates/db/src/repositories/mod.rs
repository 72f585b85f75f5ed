//! Repository implementations for data access.
//!
//! Repositories provide a clean interface for database operations, hiding
//! the `SeaORM` implementation details from the rest of the application.
//! Each repository also implements the corresponding store trait from
//! `helm-core`, which is how the budget engine reaches the database.

pub mod category;
pub mod transaction;
pub mod weekly_budget;

pub use category::{
    CategoryError, CategoryRepository, CreateCategoryInput, UpdateCategoryInput,
};
pub use transaction::{
    CreateTransactionInput, TransactionError, TransactionFilter, TransactionRepository,
    UpdateTransactionInput,
};
pub use weekly_budget::WeeklyBudgetRepository;

use helm_core::budget::StoreError;
use sea_orm::DbErr;

/// Maps a database error onto the engine's store error type.
pub(crate) fn store_error(err: DbErr) -> StoreError {
    StoreError::Backend(err.to_string())
}
