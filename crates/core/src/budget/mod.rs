//! Weekly budget tracking: limits, carryover, spending status, and alerts.

pub mod engine;
pub mod error;
pub mod message;
pub mod store;
pub mod types;
pub mod week;


pub use engine::{BudgetEngine, DEFAULT_LOOKBACK_MONTHS};
pub use error::BudgetError;
pub use store::{CategoryStore, StoreError, TransactionStore, WeeklyBudgetStore};
pub use types::{
    AlertSeverity, Category, CategoryWeekStatus, CrossedThreshold, NewWeeklyBudget, SpendStatus,
    ThresholdAlert, Transaction, TransactionKind, WeeklyBudget, WeeklyStatusReport, WeeklyTotals,
};
pub use week::{days_remaining, end_of_week, start_of_week, week_end_instant};
