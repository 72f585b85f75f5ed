//! Weekly budget routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;

use super::{error_response, map_budget_error};

/// Creates the weekly budget routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/{user_id}/budgets/weekly", get(weekly_status))
        .route(
            "/users/{user_id}/budgets/check-thresholds",
            post(check_thresholds),
        )
        .route("/users/{user_id}/budgets/initialize", post(initialize_week))
}

// ============================================================================
// Request Types
// ============================================================================

/// Query parameters for the weekly status report.
#[derive(Debug, Deserialize)]
pub struct WeeklyStatusQuery {
    /// Any date inside the week to report on; defaults to the current week.
    pub week_start: Option<NaiveDate>,
}

/// Request body for a threshold check.
#[derive(Debug, Deserialize)]
pub struct CheckThresholdsRequest {
    /// Category to evaluate.
    pub category_id: Uuid,
}

/// Request body for initializing a week.
#[derive(Debug, Deserialize, Default)]
pub struct InitializeWeekRequest {
    /// Any date inside the week to initialize; defaults to the current week.
    pub week_start: Option<NaiveDate>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/users/{user_id}/budgets/weekly` - Full weekly status report.
async fn weekly_status(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<WeeklyStatusQuery>,
) -> impl IntoResponse {
    match state.engine.weekly_status(user_id, query.week_start).await {
        Ok(report) => (StatusCode::OK, Json(json!({ "report": report }))).into_response(),
        Err(e) => {
            error!(error = %e, %user_id, "Failed to build weekly status report");
            error_response(&map_budget_error(&e))
        }
    }
}

/// POST `/users/{user_id}/budgets/check-thresholds` - Evaluate alert
/// thresholds for one category this week.
async fn check_thresholds(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<CheckThresholdsRequest>,
) -> impl IntoResponse {
    match state
        .engine
        .check_thresholds(user_id, payload.category_id)
        .await
    {
        Ok(alert) => (StatusCode::OK, Json(json!({ "alert": alert }))).into_response(),
        Err(e) => {
            error!(error = %e, %user_id, category_id = %payload.category_id, "Threshold check failed");
            error_response(&map_budget_error(&e))
        }
    }
}

/// POST `/users/{user_id}/budgets/initialize` - Create missing weekly rows
/// for all active categories.
async fn initialize_week(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    payload: Option<Json<InitializeWeekRequest>>,
) -> impl IntoResponse {
    let week_start = payload.and_then(|Json(p)| p.week_start);

    match state.engine.initialize_week(user_id, week_start).await {
        Ok(created) => {
            info!(%user_id, created, "Initialized weekly budgets");
            (StatusCode::OK, Json(json!({ "created": created }))).into_response()
        }
        Err(e) => {
            error!(error = %e, %user_id, "Failed to initialize weekly budgets");
            error_response(&map_budget_error(&e))
        }
    }
}
