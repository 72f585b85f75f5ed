//! `SeaORM` Entity for the transactions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::TransactionKind;

/// A dated income or expense row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Transaction ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owning user ID.
    pub user_id: Uuid,
    /// Linked category; NULL when uncategorized.
    pub category_id: Option<Uuid>,
    /// Transaction date.
    pub date: Date,
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
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Owning category.
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
