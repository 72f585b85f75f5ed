//! Budget engine error types.

use thiserror::Error;
use uuid::Uuid;

use super::store::StoreError;

/// Errors surfaced by the budget engine.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// Category does not exist for this user.
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    /// A store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
