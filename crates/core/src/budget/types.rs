//! Budget domain types.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A spending category with a monthly ceiling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: Uuid,
    /// Owning user ID.
    pub user_id: Uuid,
    /// Display name, unique per user.
    pub name: String,
    /// Emoji or icon shown next to the name.
    pub icon: Option<String>,
    /// Monthly spending ceiling, never negative.
    pub monthly_ceiling: Decimal,
    /// False once the category has been archived.
    pub is_active: bool,
    /// Whether the user created this category (vs. the signup seed).
    pub is_custom: bool,
}

/// Direction of a transaction. The stored amount is always a non-negative
/// magnitude; sign is carried here, never by the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money in.
    Income,
    /// Money out.
    Expense,
}

/// A dated income or expense record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction ID.
    pub id: Uuid,
    /// Owning user ID.
    pub user_id: Uuid,
    /// Linked category, `None` when uncategorized.
    pub category_id: Option<Uuid>,
    /// Transaction date.
    pub date: NaiveDate,
    /// Description (merchant, payee, ...).
    pub description: String,
    /// Non-negative magnitude.
    pub amount: Decimal,
    /// Income or expense.
    pub kind: TransactionKind,
    /// Optional free-form notes.
    pub notes: Option<String>,
    /// Where the record came from (e.g. "manual", "csv").
    pub source: String,
}

/// One weekly budget row per `(user, category, week_start)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyBudget {
    /// Row ID.
    pub id: Uuid,
    /// Owning user ID.
    pub user_id: Uuid,
    /// Category this row tracks.
    pub category_id: Uuid,
    /// Monday of the ISO week.
    pub week_start: NaiveDate,
    /// Sunday 23:59:59.999 of the same week.
    pub week_end: NaiveDateTime,
    /// Spendable amount for the week (ceiling share plus carryover).
    pub weekly_limit: Decimal,
    /// Sum of the week's expense transactions. Derived cache, re-summed
    /// from the transaction store on every sync, never authoritative.
    pub spent: Decimal,
    /// Signed roll-forward from the previous week: positive = underspent,
    /// negative = overspent.
    pub carryover: Decimal,
    /// Lifecycle tag, e.g. "active".
    pub status: String,
    /// Last write timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a weekly budget row.
#[derive(Debug, Clone)]
pub struct NewWeeklyBudget {
    /// Owning user ID.
    pub user_id: Uuid,
    /// Category the row tracks.
    pub category_id: Uuid,
    /// Monday of the ISO week.
    pub week_start: NaiveDate,
    /// Sunday 23:59:59.999 of the same week.
    pub week_end: NaiveDateTime,
    /// Computed weekly limit.
    pub weekly_limit: Decimal,
    /// Initial spent amount.
    pub spent: Decimal,
    /// Carryover baked into the limit.
    pub carryover: Decimal,
    /// Lifecycle tag.
    pub status: String,
}

/// Spending status band for a category week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpendStatus {
    /// 100% of the limit or more.
    Over,
    /// 90% or more.
    Critical,
    /// 80% or more.
    Warning,
    /// Below 80%.
    Good,
}

impl SpendStatus {
    /// Classifies a percentage-used value into its band.
    ///
    /// Bands are evaluated highest-first so boundary values land in the
    /// higher band: exactly 80 is `Warning`, exactly 90 is `Critical`,
    /// exactly 100 is `Over`.
    #[must_use]
    pub fn from_percentage(percentage_used: Decimal) -> Self {
        if percentage_used >= Decimal::ONE_HUNDRED {
            Self::Over
        } else if percentage_used >= Decimal::from(90) {
            Self::Critical
        } else if percentage_used >= Decimal::from(80) {
            Self::Warning
        } else {
            Self::Good
        }
    }
}

/// Severity attached to a threshold alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Crossed the 80% threshold.
    Info,
    /// Crossed the 90% threshold.
    Warning,
    /// Crossed the 100% threshold.
    Critical,
}

/// The single highest spending threshold a week has crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossedThreshold {
    /// At or past 80% of the weekly limit.
    Eighty,
    /// At or past 90%.
    Ninety,
    /// At or past 100%.
    Hundred,
}

impl CrossedThreshold {
    /// Picks the highest threshold crossed, or `None` below 80%.
    #[must_use]
    pub fn from_percentage(percentage_used: Decimal) -> Option<Self> {
        if percentage_used >= Decimal::ONE_HUNDRED {
            Some(Self::Hundred)
        } else if percentage_used >= Decimal::from(90) {
            Some(Self::Ninety)
        } else if percentage_used >= Decimal::from(80) {
            Some(Self::Eighty)
        } else {
            None
        }
    }

    /// The threshold value as a percentage.
    #[must_use]
    pub const fn percent(self) -> u32 {
        match self {
            Self::Eighty => 80,
            Self::Ninety => 90,
            Self::Hundred => 100,
        }
    }

    /// Severity associated with this threshold.
    #[must_use]
    pub const fn severity(self) -> AlertSeverity {
        match self {
            Self::Eighty => AlertSeverity::Info,
            Self::Ninety => AlertSeverity::Warning,
            Self::Hundred => AlertSeverity::Critical,
        }
    }
}

/// Per-category view of one week, as served to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryWeekStatus {
    /// Category ID.
    pub category_id: Uuid,
    /// Category display name.
    pub category_name: String,
    /// Category icon.
    pub icon: Option<String>,
    /// Monday of the reported week.
    pub week_start: NaiveDate,
    /// Weekly spending limit.
    pub weekly_limit: Decimal,
    /// Amount spent so far.
    pub spent: Decimal,
    /// Limit minus spent (may be negative).
    pub remaining: Decimal,
    /// Carryover baked into the limit.
    pub carryover: Decimal,
    /// Spent as a percentage of the limit, 0 when the limit is 0.
    pub percentage_used: Decimal,
    /// Status band.
    pub status: SpendStatus,
    /// Days left in the week, today through Sunday inclusive.
    pub days_remaining: i64,
    /// Even split of the remaining amount over the remaining days,
    /// floored at zero.
    pub daily_safe_to_spend: Decimal,
    /// Coaching message for this band.
    pub message: String,
}

/// Aggregate totals across all of a user's active categories for one week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyTotals {
    /// Sum of weekly limits.
    pub total_limit: Decimal,
    /// Sum of spent amounts.
    pub total_spent: Decimal,
    /// Sum of remaining amounts.
    pub total_remaining: Decimal,
    /// Total spent as a percentage of the total limit, 0 when the total
    /// limit is 0.
    pub overall_percentage: Decimal,
    /// Number of categories at or past their limit.
    pub categories_over: usize,
    /// Number of categories in the warning or critical band.
    pub categories_at_risk: usize,
}

/// Full weekly budget picture for a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyStatusReport {
    /// Monday of the reported week.
    pub week_start: NaiveDate,
    /// Sunday of the reported week.
    pub week_end: NaiveDate,
    /// One record per active category.
    pub categories: Vec<CategoryWeekStatus>,
    /// Aggregate totals.
    pub totals: WeeklyTotals,
}

/// Alert produced when a category crosses a spending threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdAlert {
    /// Category ID.
    pub category_id: Uuid,
    /// Category display name.
    pub category_name: String,
    /// The single highest threshold crossed.
    pub threshold: u32,
    /// Alert severity.
    pub severity: AlertSeverity,
    /// Human-readable alert text.
    pub message: String,
    /// Spent as a percentage of the limit.
    pub percentage_used: Decimal,
    /// Limit minus spent (may be negative).
    pub remaining: Decimal,
}
