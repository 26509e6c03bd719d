//! Notification repository.

use std::sync::Arc;

use crate::entities::{Notification, notification};
use fedigram_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};

/// Notification repository for database operations.
#[derive(Clone)]
pub struct NotificationRepository {
    db: Arc<DatabaseConnection>,
}

impl NotificationRepository {
    /// Create a new notification repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new notification.
    pub async fn create(
        &self,
        model: notification::ActiveModel,
    ) -> AppResult<notification::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether a profile already has a notification for this item and action.
    pub async fn exists_for_item(
        &self,
        profile_id: i64,
        action: &str,
        item_type: &str,
        item_id: i64,
    ) -> AppResult<bool> {
        let count = Notification::find()
            .filter(notification::Column::ProfileId.eq(profile_id))
            .filter(notification::Column::Action.eq(action))
            .filter(notification::Column::ItemType.eq(item_type))
            .filter(notification::Column::ItemId.eq(item_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Delete every notification for an item and action.
    pub async fn delete_for_item(
        &self,
        action: &str,
        item_type: &str,
        item_id: i64,
    ) -> AppResult<u64> {
        let result = Notification::delete_many()
            .filter(notification::Column::Action.eq(action))
            .filter(notification::Column::ItemType.eq(item_type))
            .filter(notification::Column::ItemId.eq(item_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

}
