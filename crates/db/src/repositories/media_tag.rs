//! Media tag repository.

use std::sync::Arc;

use crate::entities::{MediaTag, media_tag};
use fedigram_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Media tag repository for database operations.
#[derive(Clone)]
pub struct MediaTagRepository {
    db: Arc<DatabaseConnection>,
}

impl MediaTagRepository {
    /// Create a new media tag repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Tags on a status.
    pub async fn find_by_status(&self, status_id: i64) -> AppResult<Vec<media_tag::Model>> {
        MediaTag::find()
            .filter(media_tag::Column::StatusId.eq(status_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Tag a profile in a status' media.
    pub async fn create(&self, model: media_tag::ActiveModel) -> AppResult<media_tag::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_find_by_status() {
        let tag = media_tag::Model {
            id: 1,
            status_id: 2,
            media_id: 3,
            profile_id: 4,
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[tag.clone()]])
                .into_connection(),
        );

        let repo = MediaTagRepository::new(db);
        let tags = repo.find_by_status(2).await.unwrap();

        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].profile_id, 4);
    }
}
