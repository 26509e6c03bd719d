//! User filter repository.

use std::sync::Arc;

use crate::entities::{
    UserFilter,
    user_filter::{self, FilterType, FilterableType},
};
use fedigram_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// User filter repository for database operations.
#[derive(Clone)]
pub struct UserFilterRepository {
    db: Arc<DatabaseConnection>,
}

impl UserFilterRepository {
    /// Create a new user filter repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find one filter by its full key.
    pub async fn find(
        &self,
        user_id: i64,
        filterable_id: i64,
        filterable_type: FilterableType,
        filter_type: FilterType,
    ) -> AppResult<Option<user_filter::Model>> {
        UserFilter::find()
            .filter(user_filter::Column::UserId.eq(user_id))
            .filter(user_filter::Column::FilterableId.eq(filterable_id))
            .filter(user_filter::Column::FilterableType.eq(filterable_type))
            .filter(user_filter::Column::FilterType.eq(filter_type))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// IDs filtered by a user for one target kind and filter kind.
    pub async fn find_filterable_ids(
        &self,
        user_id: i64,
        filterable_type: FilterableType,
        filter_type: FilterType,
    ) -> AppResult<Vec<i64>> {
        UserFilter::find()
            .select_only()
            .column(user_filter::Column::FilterableId)
            .filter(user_filter::Column::UserId.eq(user_id))
            .filter(user_filter::Column::FilterableType.eq(filterable_type))
            .filter(user_filter::Column::FilterType.eq(filter_type))
            .order_by_desc(user_filter::Column::Id)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new filter.
    pub async fn create(&self, model: user_filter::ActiveModel) -> AppResult<user_filter::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a filter.
    pub async fn delete(&self, model: user_filter::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
