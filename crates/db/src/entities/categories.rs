//! `SeaORM` Entity for the categories table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A spending category row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Category ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owning user ID.
    pub user_id: Uuid,
    /// Display name, unique per user.
    pub name: String,
    /// Emoji or icon.
    pub icon: Option<String>,
    /// Monthly spending ceiling.
    pub monthly_ceiling: Decimal,
    /// False once archived.
    pub is_active: bool,
    /// Whether the user created this category.
    pub is_custom: bool,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Transactions linked to this category.
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
    /// Weekly budget rows tracking this category.
    #[sea_orm(has_many = "super::weekly_budgets::Entity")]
    WeeklyBudgets,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::weekly_budgets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WeeklyBudgets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
