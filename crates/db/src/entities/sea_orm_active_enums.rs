//! Database enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Direction of a transaction. Amounts are stored as non-negative
/// magnitudes; this enum carries the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_kind")]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money in.
    #[sea_orm(string_value = "income")]
    Income,
    /// Money out.
    #[sea_orm(string_value = "expense")]
    Expense,
}
