//! `SeaORM` Entity for the weekly_budgets table.
//!
//! Exactly one row per `(user_id, category_id, week_start)`; the database
//! enforces this with a uniqueness constraint that backs the engine's
//! concurrent-create contract.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One week of budget tracking for a category.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "weekly_budgets")]
pub struct Model {
    /// Row ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owning user ID.
    pub user_id: Uuid,
    /// Category this row tracks.
    pub category_id: Uuid,
    /// Monday of the ISO week.
    pub week_start: Date,
    /// Sunday 23:59:59.999 of the same week.
    pub week_end: DateTimeWithTimeZone,
    /// Spendable amount for the week.
    pub weekly_limit: Decimal,
    /// Derived sum of the week's expense transactions.
    pub spent: Decimal,
    /// Signed roll-forward from the previous week.
    pub carryover: Decimal,
    /// Lifecycle tag, e.g. "active".
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Tracked category.
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Categories,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
