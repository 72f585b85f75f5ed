//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for categories, transactions, and weekly budgets
//! - Shared application state wiring the budget engine to its stores

pub mod routes;

use axum::Router;
use helm_core::budget::BudgetEngine;
use helm_db::{CategoryRepository, TransactionRepository, WeeklyBudgetRepository};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Budget engine wired to the database-backed stores.
    pub engine: Arc<BudgetEngine>,
}

impl AppState {
    /// Builds the state from a database connection, wiring the engine to
    /// repository-backed stores.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        let engine = BudgetEngine::new(
            Arc::new(CategoryRepository::new(db.clone())),
            Arc::new(TransactionRepository::new(db.clone())),
            Arc::new(WeeklyBudgetRepository::new(db.clone())),
        );
        Self {
            db: Arc::new(db),
            engine: Arc::new(engine),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
