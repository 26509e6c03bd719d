//! Media repository.

use std::sync::Arc;

use crate::entities::{Media, media};
use fedigram_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Media repository for database operations.
#[derive(Clone)]
pub struct MediaRepository {
    db: Arc<DatabaseConnection>,
}

impl MediaRepository {
    /// Create a new media repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find media by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<media::Model>> {
        Media::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find media by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i64) -> AppResult<media::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::MediaNotFound(id.to_string()))
    }

    /// Media attached to a status, in display order.
    pub async fn find_by_status(&self, status_id: i64) -> AppResult<Vec<media::Model>> {
        Media::find()
            .filter(media::Column::StatusId.eq(status_id))
            .order_by_asc(media::Column::Order)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new media record.
    pub async fn create(&self, model: media::ActiveModel) -> AppResult<media::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a media record.
    pub async fn update(&self, model: media::ActiveModel) -> AppResult<media::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
