//! Transaction repository for transaction database operations.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use helm_core::budget::{StoreError, Transaction, TransactionKind, TransactionStore};

use crate::entities::{sea_orm_active_enums, transactions};

use super::store_error;

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Owning user ID.
    pub user_id: Uuid,
    /// Linked category, if any.
    pub category_id: Option<Uuid>,
    /// Transaction date.
    pub date: NaiveDate,
    /// Description.
    pub description: String,
    /// Non-negative magnitude.
    pub amount: Decimal,
    /// Income or expense.
    pub kind: TransactionKind,
    /// Optional notes.
    pub notes: Option<String>,
    /// Record origin (e.g. "manual", "csv").
    pub source: String,
}

/// Input for updating a transaction.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    /// New category link (inner `None` detaches).
    pub category_id: Option<Option<Uuid>>,
    /// New date.
    pub date: Option<NaiveDate>,
    /// New description.
    pub description: Option<String>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New kind.
    pub kind: Option<TransactionKind>,
    /// New notes (inner `None` clears them).
    pub notes: Option<Option<String>>,
}

/// Filters for listing transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Only this category.
    pub category_id: Option<Uuid>,
    /// Only on or after this date.
    pub from: Option<NaiveDate>,
    /// Only on or before this date.
    pub to: Option<NaiveDate>,
    /// Only this kind.
    pub kind: Option<TransactionKind>,
}

/// Transaction repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl From<TransactionKind> for sea_orm_active_enums::TransactionKind {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Income => Self::Income,
            TransactionKind::Expense => Self::Expense,
        }
    }
}

impl From<sea_orm_active_enums::TransactionKind> for TransactionKind {
    fn from(kind: sea_orm_active_enums::TransactionKind) -> Self {
        match kind {
            sea_orm_active_enums::TransactionKind::Income => Self::Income,
            sea_orm_active_enums::TransactionKind::Expense => Self::Expense,
        }
    }
}

impl From<transactions::Model> for Transaction {
    fn from(model: transactions::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            category_id: model.category_id,
            date: model.date,
            description: model.description,
            amount: model.amount,
            kind: model.kind.into(),
            notes: model.notes,
            source: model.source,
        }
    }
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a transaction.
    pub async fn create(
        &self,
        input: CreateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        let now = Utc::now().into();
        let transaction = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            category_id: Set(input.category_id),
            date: Set(input.date),
            description: Set(input.description),
            amount: Set(input.amount),
            kind: Set(input.kind.into()),
            notes: Set(input.notes),
            source: Set(input.source),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(transaction.insert(&self.db).await?)
    }

    /// Gets a transaction by ID, scoped to a user.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` if the transaction does not exist.
    pub async fn get(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<transactions::Model, TransactionError> {
        transactions::Entity::find_by_id(transaction_id)
            .filter(transactions::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(TransactionError::NotFound(transaction_id))
    }

    /// Lists a user's transactions, newest first.
    pub async fn list(
        &self,
        user_id: Uuid,
        filter: TransactionFilter,
    ) -> Result<Vec<transactions::Model>, TransactionError> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id));

        if let Some(category_id) = filter.category_id {
            query = query.filter(transactions::Column::CategoryId.eq(category_id));
        }
        if let Some(from) = filter.from {
            query = query.filter(transactions::Column::Date.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(transactions::Column::Date.lte(to));
        }
        if let Some(kind) = filter.kind {
            let db_kind: sea_orm_active_enums::TransactionKind = kind.into();
            query = query.filter(transactions::Column::Kind.eq(db_kind));
        }

        Ok(query
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Updates a transaction and returns the new row.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` if the transaction does not exist.
    pub async fn update(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
        input: UpdateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        let transaction = self.get(user_id, transaction_id).await?;

        let mut active: transactions::ActiveModel = transaction.into();
        if let Some(category_id) = input.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(date) = input.date {
            active.date = Set(date);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(amount) = input.amount {
            active.amount = Set(amount);
        }
        if let Some(kind) = input.kind {
            active.kind = Set(kind.into());
        }
        if let Some(notes) = input.notes {
            active.notes = Set(notes);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a transaction and returns the deleted row (callers need its
    /// category and date to resynchronize the affected week).
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` if the transaction does not exist.
    pub async fn delete(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<transactions::Model, TransactionError> {
        let transaction = self.get(user_id, transaction_id).await?;
        transaction.clone().delete(&self.db).await?;
        Ok(transaction)
    }
}

#[async_trait]
impl TransactionStore for TransactionRepository {
    async fn expense_total(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<(Decimal, u64), StoreError> {
        let rows = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .filter(transactions::Column::CategoryId.eq(category_id))
            .filter(transactions::Column::Kind.eq(sea_orm_active_enums::TransactionKind::Expense))
            .filter(transactions::Column::Date.gte(from))
            .filter(transactions::Column::Date.lte(to))
            .all(&self.db)
            .await
            .map_err(store_error)?;

        let total = rows.iter().map(|t| t.amount).sum();
        Ok((total, rows.len() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn model_converts_to_domain_transaction() {
        let now = Utc::now().into();
        let model = transactions::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            category_id: None,
            date: NaiveDate::from_ymd_opt(2026, 8, 27).unwrap(),
            description: "Coffee".to_string(),
            amount: dec!(4.50),
            kind: sea_orm_active_enums::TransactionKind::Expense,
            notes: None,
            source: "manual".to_string(),
            created_at: now,
            updated_at: now,
        };

        let domain = Transaction::from(model);
        assert_eq!(domain.kind, TransactionKind::Expense);
        assert_eq!(domain.amount, dec!(4.50));
        assert!(domain.category_id.is_none());
    }

    #[test]
    fn kind_round_trips_between_db_and_domain() {
        for kind in [TransactionKind::Income, TransactionKind::Expense] {
            let db_kind: sea_orm_active_enums::TransactionKind = kind.into();
            assert_eq!(TransactionKind::from(db_kind), kind);
        }
    }
}
