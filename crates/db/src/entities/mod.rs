//! `SeaORM` entity definitions.

pub mod categories;
pub mod sea_orm_active_enums;
pub mod transactions;
pub mod weekly_budgets;
