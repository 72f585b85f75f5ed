//! Category management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use helm_core::budget::DEFAULT_LOOKBACK_MONTHS;
use helm_db::CategoryRepository;
use helm_db::repositories::category::{CreateCategoryInput, UpdateCategoryInput};
use helm_shared::AppError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::AppState;

use super::{error_response, map_budget_error, map_category_error};

use helm_db::entities::categories;

/// Creates the category routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/{user_id}/categories", get(list_categories))
        .route("/users/{user_id}/categories", post(create_category))
        .route(
            "/users/{user_id}/categories/{category_id}",
            patch(update_category),
        )
        .route(
            "/users/{user_id}/categories/{category_id}",
            delete(delete_category),
        )
        .route(
            "/users/{user_id}/categories/{category_id}/recalibrate-ceiling",
            post(recalibrate_ceiling),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a category.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    /// Display name.
    pub name: String,
    /// Emoji or icon.
    pub icon: Option<String>,
    /// Monthly spending ceiling; defaults to zero.
    pub monthly_ceiling: Option<Decimal>,
}

/// Request body for updating a category.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    /// New name.
    pub name: Option<String>,
    /// New icon.
    pub icon: Option<String>,
    /// New monthly ceiling.
    pub monthly_ceiling: Option<Decimal>,
    /// New active flag (false = archive).
    pub is_active: Option<bool>,
}

/// Request body for recalibrating a category's ceiling.
#[derive(Debug, Deserialize, Default)]
pub struct RecalibrateCeilingRequest {
    /// Trailing window in months; defaults to three.
    pub lookback_months: Option<u32>,
}

/// Response for a category.
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    /// Category ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Emoji or icon.
    pub icon: Option<String>,
    /// Monthly spending ceiling.
    pub monthly_ceiling: String,
    /// Whether the category is active.
    pub is_active: bool,
    /// Whether the user created this category.
    pub is_custom: bool,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<categories::Model> for CategoryResponse {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            icon: model.icon,
            monthly_ceiling: model.monthly_ceiling.to_string(),
            is_active: model.is_active,
            is_custom: model.is_custom,
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Validates a category name and ceiling, returning the first problem found.
fn validate_category(name: Option<&str>, ceiling: Option<Decimal>) -> Result<(), AppError> {
    if let Some(name) = name
        && name.trim().is_empty()
    {
        return Err(AppError::Validation(
            "Category name must not be empty".to_string(),
        ));
    }
    if let Some(ceiling) = ceiling
        && ceiling < Decimal::ZERO
    {
        return Err(AppError::Validation(
            "Monthly ceiling must not be negative".to_string(),
        ));
    }
    Ok(())
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/users/{user_id}/categories` - List a user's categories.
async fn list_categories(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = CategoryRepository::new((*state.db).clone());

    match repo.list(user_id).await {
        Ok(models) => {
            let categories: Vec<CategoryResponse> =
                models.into_iter().map(CategoryResponse::from).collect();
            (StatusCode::OK, Json(json!({ "categories": categories }))).into_response()
        }
        Err(e) => {
            error!(error = %e, %user_id, "Failed to list categories");
            error_response(&map_category_error(&e))
        }
    }
}

/// POST `/users/{user_id}/categories` - Create a category.
///
/// Also seeds a weekly budget row for the current week so the new category
/// shows up in the status report immediately.
async fn create_category(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<CreateCategoryRequest>,
) -> impl IntoResponse {
    if let Err(e) = validate_category(Some(&payload.name), payload.monthly_ceiling) {
        return error_response(&e);
    }

    let repo = CategoryRepository::new((*state.db).clone());
    let input = CreateCategoryInput {
        user_id,
        name: payload.name.trim().to_string(),
        icon: payload.icon,
        monthly_ceiling: payload.monthly_ceiling.unwrap_or(Decimal::ZERO),
        is_custom: true,
    };

    match repo.create(input).await {
        Ok(model) => {
            info!(%user_id, category_id = %model.id, "Created category");

            if let Err(e) = state.engine.initialize_week(user_id, None).await {
                warn!(error = %e, %user_id, "Failed to seed weekly budget for new category");
            }

            (
                StatusCode::CREATED,
                Json(json!({ "category": CategoryResponse::from(model) })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, %user_id, "Failed to create category");
            error_response(&map_category_error(&e))
        }
    }
}

/// PATCH `/users/{user_id}/categories/{category_id}` - Update a category.
async fn update_category(
    State(state): State<AppState>,
    Path((user_id, category_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> impl IntoResponse {
    if let Err(e) = validate_category(payload.name.as_deref(), payload.monthly_ceiling) {
        return error_response(&e);
    }

    let repo = CategoryRepository::new((*state.db).clone());
    let input = UpdateCategoryInput {
        name: payload.name.map(|n| n.trim().to_string()),
        icon: payload.icon.map(Some),
        monthly_ceiling: payload.monthly_ceiling,
        is_active: payload.is_active,
    };

    match repo.update(user_id, category_id, input).await {
        Ok(model) => (
            StatusCode::OK,
            Json(json!({ "category": CategoryResponse::from(model) })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, %user_id, %category_id, "Failed to update category");
            error_response(&map_category_error(&e))
        }
    }
}

/// DELETE `/users/{user_id}/categories/{category_id}` - Delete a category.
///
/// Its weekly budget rows go with it; its transactions are kept but
/// detached.
async fn delete_category(
    State(state): State<AppState>,
    Path((user_id, category_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let repo = CategoryRepository::new((*state.db).clone());

    match repo.delete(user_id, category_id).await {
        Ok(()) => {
            info!(%user_id, %category_id, "Deleted category");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!(error = %e, %user_id, %category_id, "Failed to delete category");
            error_response(&map_category_error(&e))
        }
    }
}

/// POST `/users/{user_id}/categories/{category_id}/recalibrate-ceiling` -
/// Re-estimate the monthly ceiling from recent spending and store it.
async fn recalibrate_ceiling(
    State(state): State<AppState>,
    Path((user_id, category_id)): Path<(Uuid, Uuid)>,
    payload: Option<Json<RecalibrateCeilingRequest>>,
) -> impl IntoResponse {
    let lookback_months = payload
        .and_then(|Json(p)| p.lookback_months)
        .unwrap_or(DEFAULT_LOOKBACK_MONTHS);

    let estimate = match state
        .engine
        .estimate_monthly_ceiling(user_id, category_id, lookback_months)
        .await
    {
        Ok(estimate) => estimate,
        Err(e) => {
            error!(error = %e, %user_id, %category_id, "Failed to estimate monthly ceiling");
            return error_response(&map_budget_error(&e));
        }
    };

    let repo = CategoryRepository::new((*state.db).clone());
    let input = UpdateCategoryInput {
        monthly_ceiling: Some(estimate),
        ..UpdateCategoryInput::default()
    };

    match repo.update(user_id, category_id, input).await {
        Ok(model) => {
            info!(%user_id, %category_id, ceiling = %estimate, "Recalibrated monthly ceiling");
            (
                StatusCode::OK,
                Json(json!({ "category": CategoryResponse::from(model) })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, %user_id, %category_id, "Failed to store recalibrated ceiling");
            error_response(&map_category_error(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_category() {
        assert!(validate_category(Some("Groceries"), Some(Decimal::from(500))).is_ok());
        assert!(validate_category(None, None).is_ok());
        assert!(validate_category(Some("   "), None).is_err());
        assert!(validate_category(None, Some(Decimal::from(-1))).is_err());
    }
}
