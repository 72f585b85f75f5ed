//! The weekly budget calculation and carryover engine.
//!
//! Derives a rolling weekly spending limit per category from its monthly
//! ceiling, rolls unspent/overspent amounts forward week to week, keeps the
//! cached weekly spend in sync with the transaction store, classifies
//! spending into status bands, and evaluates threshold alerts.
//!
//! The engine is an explicitly constructed service: it owns no global state
//! and talks to persistence only through the store traits handed to
//! [`BudgetEngine::new`]. All monetary rounding is `round_dp(2)` (banker's
//! rounding).

use std::sync::Arc;

use chrono::{Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::warn;
use uuid::Uuid;

use super::error::BudgetError;
use super::message::{alert_message, coaching_message};
use super::store::{CategoryStore, StoreError, TransactionStore, WeeklyBudgetStore};
use super::types::{
    Category, CategoryWeekStatus, CrossedThreshold, NewWeeklyBudget, SpendStatus, ThresholdAlert,
    WeeklyBudget, WeeklyStatusReport, WeeklyTotals,
};
use super::week::{days_remaining, end_of_week, start_of_week, week_end_instant};

/// Lifecycle tag stamped on rows the engine creates.
const ACTIVE_STATUS: &str = "active";

/// Default lookback window for the ceiling estimator, in months.
pub const DEFAULT_LOOKBACK_MONTHS: u32 = 3;

/// Average weeks per month. A fixed approximation, deliberately not derived
/// from the actual calendar month, so weekly limits stay stable across
/// month boundaries.
fn weeks_per_month() -> Decimal {
    Decimal::new(433, 2)
}

/// Fallback monthly ceiling when neither history nor a category record
/// exists to estimate from.
fn default_monthly_ceiling() -> Decimal {
    Decimal::from(500)
}

/// Spent as a percentage of the limit, rounded to 2 decimals; 0 when the
/// limit is not positive.
fn percentage_used(spent: Decimal, weekly_limit: Decimal) -> Decimal {
    if weekly_limit > Decimal::ZERO {
        (spent / weekly_limit * Decimal::ONE_HUNDRED).round_dp(2)
    } else {
        Decimal::ZERO
    }
}

/// The weekly budget engine.
///
/// Construct one per process (or per request context) and share it; there is
/// no implicit singleton. The engine is the only writer of weekly budget
/// rows. It issues its store calls sequentially and relies on the store's
/// uniqueness constraint, surfaced as [`StoreError::Conflict`], to resolve
/// concurrent creates of the same `(user, category, week)` row.
pub struct BudgetEngine {
    categories: Arc<dyn CategoryStore>,
    transactions: Arc<dyn TransactionStore>,
    weekly_budgets: Arc<dyn WeeklyBudgetStore>,
}

impl BudgetEngine {
    /// Creates an engine over the given stores.
    #[must_use]
    pub fn new(
        categories: Arc<dyn CategoryStore>,
        transactions: Arc<dyn TransactionStore>,
        weekly_budgets: Arc<dyn WeeklyBudgetStore>,
    ) -> Self {
        Self {
            categories,
            transactions,
            weekly_budgets,
        }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    // ========================================================================
    // Ceiling estimation
    // ========================================================================

    /// Estimates a monthly ceiling from trailing spending history.
    ///
    /// Sums the category's expense transactions over the trailing
    /// `lookback_months` (minimum 1) and returns the monthly average with a
    /// 10% buffer, rounded up to a whole currency unit. With no matching
    /// transactions the category's stored ceiling is returned, or a fixed
    /// default when the category record itself is absent. Read-only.
    pub async fn estimate_monthly_ceiling(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        lookback_months: u32,
    ) -> Result<Decimal, BudgetError> {
        self.estimate_monthly_ceiling_as_of(user_id, category_id, lookback_months, Self::today())
            .await
    }

    /// [`Self::estimate_monthly_ceiling`] with an explicit `today`.
    pub async fn estimate_monthly_ceiling_as_of(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        lookback_months: u32,
        today: NaiveDate,
    ) -> Result<Decimal, BudgetError> {
        let months = lookback_months.max(1);
        let from = today
            .checked_sub_months(Months::new(months))
            .unwrap_or(NaiveDate::MIN);

        let (total, count) = self
            .transactions
            .expense_total(user_id, category_id, from, today)
            .await?;

        if count == 0 {
            let stored = self
                .categories
                .find_category(user_id, category_id)
                .await?
                .map(|c| c.monthly_ceiling);
            return Ok(stored.unwrap_or_else(default_monthly_ceiling));
        }

        let average = total / Decimal::from(months);
        Ok((average * Decimal::new(11, 1)).ceil())
    }

    // ========================================================================
    // Limit and carryover calculation
    // ========================================================================

    /// Computes the carryover rolling into the week starting at `week_start`.
    ///
    /// Looks up the direct predecessor week's row; a missing row yields zero
    /// (carryover is never chained past a skipped week). Positive means the
    /// previous week underspent, negative overspent. Read-only.
    pub async fn carryover(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        week_start: NaiveDate,
    ) -> Result<Decimal, BudgetError> {
        let previous_week_start = week_start - chrono::Duration::days(7);
        let previous = self
            .weekly_budgets
            .find_week(user_id, category_id, previous_week_start)
            .await?;

        Ok(previous
            .map(|p| (p.weekly_limit - p.spent).round_dp(2))
            .unwrap_or(Decimal::ZERO))
    }

    /// Computes the spending limit for a `(category, week)` pair:
    /// `monthly_ceiling / 4.33 + carryover`, rounded to 2 decimals and
    /// clamped at zero. A large negative carryover can never push the limit
    /// below zero.
    ///
    /// # Errors
    ///
    /// [`BudgetError::CategoryNotFound`] if the category does not resolve
    /// for this user.
    pub async fn weekly_limit(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        week_start: NaiveDate,
    ) -> Result<Decimal, BudgetError> {
        let category = self.require_category(user_id, category_id).await?;
        let carryover = self.carryover(user_id, category_id, week_start).await?;
        Ok(Self::limit_from(category.monthly_ceiling, carryover))
    }

    /// `ceiling / 4.33 + carryover`, rounded then clamped at zero.
    pub(crate) fn limit_from(monthly_ceiling: Decimal, carryover: Decimal) -> Decimal {
        let limit = (monthly_ceiling / weeks_per_month() + carryover).round_dp(2);
        limit.max(Decimal::ZERO)
    }

    // ========================================================================
    // Row materialization and spend synchronization
    // ========================================================================

    /// Loads the row for `(user, category, week_start)`, creating it if
    /// absent. A conflicting concurrent create is absorbed by re-reading the
    /// row the other caller won with.
    async fn materialize(
        &self,
        category: &Category,
        week_start: NaiveDate,
    ) -> Result<WeeklyBudget, BudgetError> {
        if let Some(existing) = self
            .weekly_budgets
            .find_week(category.user_id, category.id, week_start)
            .await?
        {
            return Ok(existing);
        }

        let carryover = self
            .carryover(category.user_id, category.id, week_start)
            .await?;
        let new = NewWeeklyBudget {
            user_id: category.user_id,
            category_id: category.id,
            week_start,
            week_end: week_end_instant(week_start),
            weekly_limit: Self::limit_from(category.monthly_ceiling, carryover),
            spent: Decimal::ZERO,
            carryover,
            status: ACTIVE_STATUS.to_string(),
        };

        match self.weekly_budgets.insert_week(new).await {
            Ok(row) => Ok(row),
            Err(StoreError::Conflict(_)) => self
                .weekly_budgets
                .find_week(category.user_id, category.id, week_start)
                .await?
                .ok_or_else(|| {
                    StoreError::Backend("weekly budget row vanished after insert conflict".into())
                        .into()
                }),
            Err(e) => Err(e.into()),
        }
    }

    /// Re-synchronizes a week's cached `spent` with the transaction store.
    ///
    /// `date` only resolves which week to touch. The row is materialized if
    /// needed, then `spent` is fully re-summed from the source expense
    /// transactions inside the week window; edits and deletes are reflected
    /// without delta tracking. Must run after every transaction create,
    /// delete, or update that changes category, amount, kind, or date of an
    /// expense.
    ///
    /// # Errors
    ///
    /// [`BudgetError::CategoryNotFound`] if the category does not resolve
    /// for this user.
    pub async fn sync_weekly_spend(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        date: NaiveDate,
    ) -> Result<WeeklyBudget, BudgetError> {
        let category = self.require_category(user_id, category_id).await?;
        let week_start = start_of_week(date);
        let row = self.materialize(&category, week_start).await?;

        let (spent, _) = self
            .transactions
            .expense_total(user_id, category_id, week_start, end_of_week(date))
            .await?;

        Ok(self.weekly_budgets.update_spent(row.id, spent).await?)
    }

    // ========================================================================
    // Status aggregation
    // ========================================================================

    /// Produces the full weekly budget picture for a user.
    ///
    /// Defaults to the current week. Every active category's row is lazily
    /// materialized (without re-summing transactions; a brand-new row simply
    /// reports zero spent until a sync runs), then classified into its
    /// status band with a coaching message and a daily safe-to-spend figure.
    pub async fn weekly_status(
        &self,
        user_id: Uuid,
        week_start: Option<NaiveDate>,
    ) -> Result<WeeklyStatusReport, BudgetError> {
        self.weekly_status_as_of(user_id, week_start, Self::today())
            .await
    }

    /// [`Self::weekly_status`] with an explicit `today`.
    pub async fn weekly_status_as_of(
        &self,
        user_id: Uuid,
        week_start: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<WeeklyStatusReport, BudgetError> {
        let week_start = start_of_week(week_start.unwrap_or(today));
        let days_left = days_remaining(week_start, today);

        let mut categories = Vec::new();
        let mut totals = WeeklyTotals {
            total_limit: Decimal::ZERO,
            total_spent: Decimal::ZERO,
            total_remaining: Decimal::ZERO,
            overall_percentage: Decimal::ZERO,
            categories_over: 0,
            categories_at_risk: 0,
        };

        for category in self.categories.list_active_categories(user_id).await? {
            let row = self.materialize(&category, week_start).await?;
            let remaining = row.weekly_limit - row.spent;
            let percentage = percentage_used(row.spent, row.weekly_limit);
            let status = SpendStatus::from_percentage(percentage);

            let daily_safe_to_spend = if remaining <= Decimal::ZERO {
                Decimal::ZERO
            } else {
                (remaining / Decimal::from(days_left)).round_dp(2)
            };

            totals.total_limit += row.weekly_limit;
            totals.total_spent += row.spent;
            totals.total_remaining += remaining;
            match status {
                SpendStatus::Over => totals.categories_over += 1,
                SpendStatus::Critical | SpendStatus::Warning => totals.categories_at_risk += 1,
                SpendStatus::Good => {}
            }

            categories.push(CategoryWeekStatus {
                category_id: category.id,
                category_name: category.name,
                icon: category.icon,
                week_start,
                weekly_limit: row.weekly_limit,
                spent: row.spent,
                remaining,
                carryover: row.carryover,
                percentage_used: percentage,
                status,
                days_remaining: days_left,
                daily_safe_to_spend,
                message: coaching_message(status, percentage, remaining),
            });
        }

        totals.overall_percentage = percentage_used(totals.total_spent, totals.total_limit);

        Ok(WeeklyStatusReport {
            week_start,
            week_end: end_of_week(week_start),
            categories,
            totals,
        })
    }

    // ========================================================================
    // Threshold alerts
    // ========================================================================

    /// Answers whether the category has crossed a notable spending threshold
    /// in the current week.
    ///
    /// A read-only snapshot check: no row is lazily created, and the engine
    /// keeps no "already notified" state - debouncing is the caller's job.
    /// Returns the single highest threshold crossed (100, else 90, else 80)
    /// or `None` below 80%, and `None` when no row exists for the week.
    ///
    /// # Errors
    ///
    /// [`BudgetError::CategoryNotFound`] if the category does not resolve
    /// for this user.
    pub async fn check_thresholds(
        &self,
        user_id: Uuid,
        category_id: Uuid,
    ) -> Result<Option<ThresholdAlert>, BudgetError> {
        self.check_thresholds_as_of(user_id, category_id, Self::today())
            .await
    }

    /// [`Self::check_thresholds`] with an explicit `today`.
    pub async fn check_thresholds_as_of(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        today: NaiveDate,
    ) -> Result<Option<ThresholdAlert>, BudgetError> {
        let category = self.require_category(user_id, category_id).await?;
        let week_start = start_of_week(today);

        let Some(row) = self
            .weekly_budgets
            .find_week(user_id, category_id, week_start)
            .await?
        else {
            return Ok(None);
        };

        let percentage = percentage_used(row.spent, row.weekly_limit);
        Ok(CrossedThreshold::from_percentage(percentage).map(|threshold| ThresholdAlert {
            category_id: category.id,
            category_name: category.name.clone(),
            threshold: threshold.percent(),
            severity: threshold.severity(),
            message: alert_message(&category.name, threshold, percentage),
            percentage_used: percentage,
            remaining: row.weekly_limit - row.spent,
        }))
    }

    // ========================================================================
    // Bulk initialization
    // ========================================================================

    /// Bulk-creates weekly budget rows for all of a user's active categories
    /// for the target week (defaulting to the current one).
    ///
    /// Idempotent: categories that already have a row are skipped, as are
    /// rows lost to a concurrent-create race. A failure on one category is
    /// logged and does not block the rest of the batch. Returns the number
    /// of rows actually created.
    pub async fn initialize_week(
        &self,
        user_id: Uuid,
        week_start: Option<NaiveDate>,
    ) -> Result<usize, BudgetError> {
        self.initialize_week_as_of(user_id, week_start, Self::today())
            .await
    }

    /// [`Self::initialize_week`] with an explicit `today`.
    pub async fn initialize_week_as_of(
        &self,
        user_id: Uuid,
        week_start: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<usize, BudgetError> {
        let week_start = start_of_week(week_start.unwrap_or(today));
        let mut created = 0;

        for category in self.categories.list_active_categories(user_id).await? {
            let existing = match self
                .weekly_budgets
                .find_week(user_id, category.id, week_start)
                .await
            {
                Ok(existing) => existing,
                Err(e) => {
                    warn!(category_id = %category.id, error = %e, "Skipping category during week initialization");
                    continue;
                }
            };
            if existing.is_some() {
                continue;
            }

            let carryover = match self.carryover(user_id, category.id, week_start).await {
                Ok(c) => c,
                Err(e) => {
                    warn!(category_id = %category.id, error = %e, "Skipping category during week initialization");
                    continue;
                }
            };

            let new = NewWeeklyBudget {
                user_id,
                category_id: category.id,
                week_start,
                week_end: week_end_instant(week_start),
                weekly_limit: Self::limit_from(category.monthly_ceiling, carryover),
                spent: Decimal::ZERO,
                carryover,
                status: ACTIVE_STATUS.to_string(),
            };

            match self.weekly_budgets.insert_week(new).await {
                Ok(_) => created += 1,
                // Someone else created it between our check and the insert.
                Err(StoreError::Conflict(_)) => {}
                Err(e) => {
                    warn!(category_id = %category.id, error = %e, "Failed to initialize weekly budget");
                }
            }
        }

        Ok(created)
    }

    async fn require_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
    ) -> Result<Category, BudgetError> {
        self.categories
            .find_category(user_id, category_id)
            .await?
            .ok_or(BudgetError::CategoryNotFound(category_id))
    }
}
