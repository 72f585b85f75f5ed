//! Category repository for category database operations.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use helm_core::budget::{Category, CategoryStore, StoreError};

use crate::entities::categories;

use super::store_error;

/// Error types for category operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// Category not found.
    #[error("Category not found: {0}")]
    NotFound(Uuid),

    /// Category name already exists for this user.
    #[error("Category name already exists: {0}")]
    DuplicateName(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryInput {
    /// Owning user ID.
    pub user_id: Uuid,
    /// Display name.
    pub name: String,
    /// Emoji or icon.
    pub icon: Option<String>,
    /// Monthly spending ceiling.
    pub monthly_ceiling: Decimal,
    /// Whether the user created this category.
    pub is_custom: bool,
}

/// Input for updating a category.
#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryInput {
    /// New name.
    pub name: Option<String>,
    /// New icon (inner `None` clears it).
    pub icon: Option<Option<String>>,
    /// New monthly ceiling.
    pub monthly_ceiling: Option<Decimal>,
    /// New active flag (false = archive).
    pub is_active: Option<bool>,
}

/// Category repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new category.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::DuplicateName` if the user already has a
    /// category with this name, active or archived.
    pub async fn create(
        &self,
        input: CreateCategoryInput,
    ) -> Result<categories::Model, CategoryError> {
        let existing = categories::Entity::find()
            .filter(categories::Column::UserId.eq(input.user_id))
            .filter(categories::Column::Name.eq(&input.name))
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Err(CategoryError::DuplicateName(input.name));
        }

        let now = Utc::now().into();
        let category = categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            name: Set(input.name),
            icon: Set(input.icon),
            monthly_ceiling: Set(input.monthly_ceiling),
            is_active: Set(true),
            is_custom: Set(input.is_custom),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(category.insert(&self.db).await?)
    }

    /// Gets a category by ID, scoped to a user.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` if the category does not exist.
    pub async fn get(
        &self,
        user_id: Uuid,
        category_id: Uuid,
    ) -> Result<categories::Model, CategoryError> {
        categories::Entity::find_by_id(category_id)
            .filter(categories::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(CategoryError::NotFound(category_id))
    }

    /// Lists all of a user's categories, active and archived, by name.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<categories::Model>, CategoryError> {
        Ok(categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Updates a category. Setting `is_active = false` archives it.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` if the category does not exist, or
    /// `CategoryError::DuplicateName` if a rename collides.
    pub async fn update(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        input: UpdateCategoryInput,
    ) -> Result<categories::Model, CategoryError> {
        let category = self.get(user_id, category_id).await?;

        if let Some(ref name) = input.name
            && *name != category.name
        {
            let clash = categories::Entity::find()
                .filter(categories::Column::UserId.eq(user_id))
                .filter(categories::Column::Name.eq(name))
                .one(&self.db)
                .await?;
            if clash.is_some() {
                return Err(CategoryError::DuplicateName(name.clone()));
            }
        }

        let mut active: categories::ActiveModel = category.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(icon) = input.icon {
            active.icon = Set(icon);
        }
        if let Some(monthly_ceiling) = input.monthly_ceiling {
            active.monthly_ceiling = Set(monthly_ceiling);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Hard-deletes a category. The schema detaches its transactions by
    /// nulling their category reference.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` if the category does not exist.
    pub async fn delete(&self, user_id: Uuid, category_id: Uuid) -> Result<(), CategoryError> {
        let category = self.get(user_id, category_id).await?;
        category.delete(&self.db).await?;
        Ok(())
    }
}

impl From<categories::Model> for Category {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            icon: model.icon,
            monthly_ceiling: model.monthly_ceiling,
            is_active: model.is_active,
            is_custom: model.is_custom,
        }
    }
}

#[async_trait]
impl CategoryStore for CategoryRepository {
    async fn find_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
    ) -> Result<Option<Category>, StoreError> {
        let model = categories::Entity::find_by_id(category_id)
            .filter(categories::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(store_error)?;
        Ok(model.map(Category::from))
    }

    async fn list_active_categories(&self, user_id: Uuid) -> Result<Vec<Category>, StoreError> {
        let models = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .filter(categories::Column::IsActive.eq(true))
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await
            .map_err(store_error)?;
        Ok(models.into_iter().map(Category::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn model_converts_to_domain_category() {
        let now = Utc::now().into();
        let model = categories::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Food & Dining".to_string(),
            icon: Some("🍽️".to_string()),
            monthly_ceiling: dec!(800),
            is_active: true,
            is_custom: false,
            created_at: now,
            updated_at: now,
        };

        let domain = Category::from(model.clone());
        assert_eq!(domain.id, model.id);
        assert_eq!(domain.name, "Food & Dining");
        assert_eq!(domain.monthly_ceiling, dec!(800));
        assert!(domain.is_active);
    }
}
