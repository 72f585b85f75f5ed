//! Weekly budget repository.
//!
//! Weekly budget rows are owned by the budget engine; this repository only
//! exposes the engine's store trait plus the conflict semantics the engine
//! relies on: an insert that trips the `(user_id, category_id, week_start)`
//! uniqueness constraint surfaces as `StoreError::Conflict`.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    SqlErr,
};
use uuid::Uuid;

use helm_core::budget::{NewWeeklyBudget, StoreError, WeeklyBudget, WeeklyBudgetStore};

use crate::entities::weekly_budgets;

use super::store_error;

/// Weekly budget repository.
#[derive(Debug, Clone)]
pub struct WeeklyBudgetRepository {
    db: DatabaseConnection,
}

impl WeeklyBudgetRepository {
    /// Creates a new weekly budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<weekly_budgets::Model> for WeeklyBudget {
    fn from(model: weekly_budgets::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            category_id: model.category_id,
            week_start: model.week_start,
            week_end: model.week_end.naive_utc(),
            weekly_limit: model.weekly_limit,
            spent: model.spent,
            carryover: model.carryover,
            status: model.status,
            updated_at: model.updated_at.to_utc(),
        }
    }
}

/// Distinguishes a uniqueness violation from other database failures.
fn insert_error(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => StoreError::Conflict(msg),
        _ => store_error(err),
    }
}

#[async_trait]
impl WeeklyBudgetStore for WeeklyBudgetRepository {
    async fn find_week(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        week_start: NaiveDate,
    ) -> Result<Option<WeeklyBudget>, StoreError> {
        let model = weekly_budgets::Entity::find()
            .filter(weekly_budgets::Column::UserId.eq(user_id))
            .filter(weekly_budgets::Column::CategoryId.eq(category_id))
            .filter(weekly_budgets::Column::WeekStart.eq(week_start))
            .one(&self.db)
            .await
            .map_err(store_error)?;
        Ok(model.map(WeeklyBudget::from))
    }

    async fn insert_week(&self, new: NewWeeklyBudget) -> Result<WeeklyBudget, StoreError> {
        let now = Utc::now().into();
        let row = weekly_budgets::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(new.user_id),
            category_id: Set(new.category_id),
            week_start: Set(new.week_start),
            week_end: Set(new.week_end.and_utc().fixed_offset()),
            weekly_limit: Set(new.weekly_limit),
            spent: Set(new.spent),
            carryover: Set(new.carryover),
            status: Set(new.status),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = row.insert(&self.db).await.map_err(insert_error)?;
        Ok(model.into())
    }

    async fn update_spent(&self, id: Uuid, spent: Decimal) -> Result<WeeklyBudget, StoreError> {
        let model = weekly_budgets::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(store_error)?
            .ok_or_else(|| StoreError::Backend(format!("no weekly budget row {id}")))?;

        let mut active: weekly_budgets::ActiveModel = model.into();
        active.spent = Set(spent);
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&self.db).await.map_err(store_error)?;
        Ok(updated.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helm_core::budget::week_end_instant;
    use rust_decimal_macros::dec;

    #[test]
    fn model_converts_to_domain_weekly_budget() {
        let week_start = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let now = Utc::now();
        let model = weekly_budgets::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            week_start,
            week_end: week_end_instant(week_start).and_utc().fixed_offset(),
            weekly_limit: dec!(184.76),
            spent: dec!(150),
            carryover: dec!(0),
            status: "active".to_string(),
            created_at: now.into(),
            updated_at: now.into(),
        };

        let domain = WeeklyBudget::from(model);
        assert_eq!(domain.week_start, week_start);
        assert_eq!(domain.week_end, week_end_instant(week_start));
        assert_eq!(domain.weekly_limit, dec!(184.76));
        assert_eq!(domain.status, "active");
    }
}
