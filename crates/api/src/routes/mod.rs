//! API route definitions.

use axum::{Json, Router, http::StatusCode, response::IntoResponse};
use helm_core::budget::{BudgetError, StoreError};
use helm_db::repositories::category::CategoryError;
use helm_db::repositories::transaction::TransactionError;
use helm_shared::AppError;
use serde_json::json;

use crate::AppState;

pub mod budgets;
pub mod categories;
pub mod health;
pub mod transactions;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(budgets::routes())
        .merge(categories::routes())
        .merge(transactions::routes())
}

/// Renders an [`AppError`] as a JSON error response.
pub(crate) fn error_response(err: &AppError) -> axum::response::Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string(),
        })),
    )
        .into_response()
}

/// Maps engine errors to API errors.
pub(crate) fn map_budget_error(err: &BudgetError) -> AppError {
    match err {
        BudgetError::CategoryNotFound(id) => AppError::NotFound(format!("Category {id} not found")),
        BudgetError::Store(e @ StoreError::Conflict(_)) => AppError::Conflict(e.to_string()),
        BudgetError::Store(e) => AppError::Database(e.to_string()),
    }
}

/// Maps category repository errors to API errors.
pub(crate) fn map_category_error(err: &CategoryError) -> AppError {
    match err {
        CategoryError::NotFound(id) => AppError::NotFound(format!("Category {id} not found")),
        CategoryError::DuplicateName(name) => {
            AppError::Conflict(format!("A category named '{name}' already exists"))
        }
        CategoryError::Database(e) => AppError::Database(e.to_string()),
    }
}

/// Maps transaction repository errors to API errors.
pub(crate) fn map_transaction_error(err: &TransactionError) -> AppError {
    match err {
        TransactionError::NotFound(id) => {
            AppError::NotFound(format!("Transaction {id} not found"))
        }
        TransactionError::Database(e) => AppError::Database(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_map_budget_error() {
        let not_found = map_budget_error(&BudgetError::CategoryNotFound(Uuid::new_v4()));
        assert_eq!(not_found.status_code(), 404);

        let conflict =
            map_budget_error(&BudgetError::Store(StoreError::Conflict("dup".to_string())));
        assert_eq!(conflict.status_code(), 409);

        let backend =
            map_budget_error(&BudgetError::Store(StoreError::Backend("down".to_string())));
        assert_eq!(backend.status_code(), 500);
    }
}
