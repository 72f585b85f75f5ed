//! Transaction routes.
//!
//! Mutations re-synchronize the affected weekly budget rows so `spent`
//! always reflects the transaction table.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use chrono::NaiveDate;
use helm_core::budget::{TransactionKind, start_of_week};
use helm_db::TransactionRepository;
use helm_db::entities::transactions;
use helm_db::repositories::transaction::{
    CreateTransactionInput, TransactionFilter, UpdateTransactionInput,
};
use helm_shared::AppError;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::AppState;

use super::{error_response, map_transaction_error};

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/{user_id}/transactions", get(list_transactions))
        .route("/users/{user_id}/transactions", post(create_transaction))
        .route(
            "/users/{user_id}/transactions/{transaction_id}",
            patch(update_transaction),
        )
        .route(
            "/users/{user_id}/transactions/{transaction_id}",
            delete(delete_transaction),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing transactions.
#[derive(Debug, Deserialize, Default)]
pub struct ListTransactionsQuery {
    /// Only this category.
    pub category_id: Option<Uuid>,
    /// Only on or after this date.
    pub from: Option<NaiveDate>,
    /// Only on or before this date.
    pub to: Option<NaiveDate>,
    /// Only this kind ("income" or "expense").
    pub kind: Option<TransactionKind>,
}

/// Request body for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Linked category, if any.
    pub category_id: Option<Uuid>,
    /// Transaction date.
    pub date: NaiveDate,
    /// Description.
    pub description: String,
    /// Non-negative magnitude.
    pub amount: Decimal,
    /// "income" or "expense".
    pub kind: TransactionKind,
    /// Optional notes.
    pub notes: Option<String>,
    /// Record origin; defaults to "manual".
    pub source: Option<String>,
}

/// Request body for updating a transaction.
///
/// `category_id` and `notes` distinguish "absent" (leave unchanged) from an
/// explicit `null` (detach / clear).
#[derive(Debug, Deserialize, Default)]
pub struct UpdateTransactionRequest {
    /// New category link (`null` detaches).
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<Uuid>>,
    /// New date.
    pub date: Option<NaiveDate>,
    /// New description.
    pub description: Option<String>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New kind.
    pub kind: Option<TransactionKind>,
    /// New notes (`null` clears them).
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

/// Response for a transaction.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: Uuid,
    /// Linked category, if any.
    pub category_id: Option<Uuid>,
    /// Transaction date.
    pub date: NaiveDate,
    /// Description.
    pub description: String,
    /// Amount.
    pub amount: String,
    /// Kind.
    pub kind: TransactionKind,
    /// Notes.
    pub notes: Option<String>,
    /// Record origin.
    pub source: String,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<transactions::Model> for TransactionResponse {
    fn from(model: transactions::Model) -> Self {
        Self {
            id: model.id,
            category_id: model.category_id,
            date: model.date,
            description: model.description,
            amount: model.amount.to_string(),
            kind: model.kind.into(),
            notes: model.notes,
            source: model.source,
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Deserializes a present-but-possibly-null field into `Some(Option<T>)`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Validates transaction fields shared by create and update.
fn validate_transaction(description: Option<&str>, amount: Option<Decimal>) -> Result<(), AppError> {
    if let Some(description) = description
        && description.trim().is_empty()
    {
        return Err(AppError::Validation(
            "Description must not be empty".to_string(),
        ));
    }
    if let Some(amount) = amount
        && amount < Decimal::ZERO
    {
        return Err(AppError::Validation(
            "Amount must not be negative".to_string(),
        ));
    }
    Ok(())
}

/// Re-synchronizes the weekly budget row touched by a categorized expense.
///
/// A failed sync is logged and does not fail the request; the next sync or
/// lazy status read repairs the row.
async fn resync_week(
    state: &AppState,
    user_id: Uuid,
    category_id: Option<Uuid>,
    kind: TransactionKind,
    date: NaiveDate,
) {
    if kind != TransactionKind::Expense {
        return;
    }
    let Some(category_id) = category_id else {
        return;
    };
    if let Err(e) = state.engine.sync_weekly_spend(user_id, category_id, date).await {
        warn!(error = %e, %user_id, %category_id, %date, "Weekly spend sync failed");
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/users/{user_id}/transactions` - List transactions, newest first.
async fn list_transactions(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<ListTransactionsQuery>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());
    let filter = TransactionFilter {
        category_id: query.category_id,
        from: query.from,
        to: query.to,
        kind: query.kind,
    };

    match repo.list(user_id, filter).await {
        Ok(models) => {
            let transactions: Vec<TransactionResponse> =
                models.into_iter().map(TransactionResponse::from).collect();
            (StatusCode::OK, Json(json!({ "transactions": transactions }))).into_response()
        }
        Err(e) => {
            error!(error = %e, %user_id, "Failed to list transactions");
            error_response(&map_transaction_error(&e))
        }
    }
}

/// POST `/users/{user_id}/transactions` - Record a transaction.
async fn create_transaction(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    if let Err(e) = validate_transaction(Some(&payload.description), Some(payload.amount)) {
        return error_response(&e);
    }

    let repo = TransactionRepository::new((*state.db).clone());
    let input = CreateTransactionInput {
        user_id,
        category_id: payload.category_id,
        date: payload.date,
        description: payload.description.trim().to_string(),
        amount: payload.amount,
        kind: payload.kind,
        notes: payload.notes,
        source: payload.source.unwrap_or_else(|| "manual".to_string()),
    };

    match repo.create(input).await {
        Ok(model) => {
            info!(%user_id, transaction_id = %model.id, "Created transaction");
            resync_week(&state, user_id, model.category_id, model.kind.into(), model.date).await;

            (
                StatusCode::CREATED,
                Json(json!({ "transaction": TransactionResponse::from(model) })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, %user_id, "Failed to create transaction");
            error_response(&map_transaction_error(&e))
        }
    }
}

/// PATCH `/users/{user_id}/transactions/{transaction_id}` - Update a
/// transaction and resync the weeks it moved between.
async fn update_transaction(
    State(state): State<AppState>,
    Path((user_id, transaction_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateTransactionRequest>,
) -> impl IntoResponse {
    if let Err(e) =
        validate_transaction(payload.description.as_deref(), payload.amount)
    {
        return error_response(&e);
    }

    let repo = TransactionRepository::new((*state.db).clone());

    let old = match repo.get(user_id, transaction_id).await {
        Ok(model) => model,
        Err(e) => {
            error!(error = %e, %user_id, %transaction_id, "Failed to load transaction");
            return error_response(&map_transaction_error(&e));
        }
    };

    let input = UpdateTransactionInput {
        category_id: payload.category_id,
        date: payload.date,
        description: payload.description.map(|d| d.trim().to_string()),
        amount: payload.amount,
        kind: payload.kind,
        notes: payload.notes,
    };

    match repo.update(user_id, transaction_id, input).await {
        Ok(updated) => {
            let old_kind: TransactionKind = old.kind.into();
            let new_kind: TransactionKind = updated.kind.into();
            let changed = old.category_id != updated.category_id
                || old.date != updated.date
                || old.amount != updated.amount
                || old_kind != new_kind;

            if changed {
                resync_week(&state, user_id, old.category_id, old_kind, old.date).await;
                let same_week = old.category_id == updated.category_id
                    && start_of_week(old.date) == start_of_week(updated.date);
                if !same_week || old_kind != new_kind {
                    resync_week(&state, user_id, updated.category_id, new_kind, updated.date)
                        .await;
                }
            }

            (
                StatusCode::OK,
                Json(json!({ "transaction": TransactionResponse::from(updated) })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, %user_id, %transaction_id, "Failed to update transaction");
            error_response(&map_transaction_error(&e))
        }
    }
}

/// DELETE `/users/{user_id}/transactions/{transaction_id}` - Delete a
/// transaction and resync its week.
async fn delete_transaction(
    State(state): State<AppState>,
    Path((user_id, transaction_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());

    match repo.delete(user_id, transaction_id).await {
        Ok(deleted) => {
            info!(%user_id, %transaction_id, "Deleted transaction");
            resync_week(
                &state,
                user_id,
                deleted.category_id,
                deleted.kind.into(),
                deleted.date,
            )
            .await;
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!(error = %e, %user_id, %transaction_id, "Failed to delete transaction");
            error_response(&map_transaction_error(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_transaction() {
        assert!(validate_transaction(Some("Lunch"), Some(Decimal::from(12))).is_ok());
        assert!(validate_transaction(None, None).is_ok());
        assert!(validate_transaction(Some(""), None).is_err());
        assert!(validate_transaction(None, Some(Decimal::from(-5))).is_err());
    }

    #[test]
    fn test_update_request_distinguishes_null_from_absent() {
        let absent: UpdateTransactionRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.category_id, None);
        assert_eq!(absent.notes, None);

        let cleared: UpdateTransactionRequest =
            serde_json::from_str(r#"{"category_id": null, "notes": null}"#).unwrap();
        assert_eq!(cleared.category_id, Some(None));
        assert_eq!(cleared.notes, Some(None));
    }
}
