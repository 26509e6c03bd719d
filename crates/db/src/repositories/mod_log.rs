//! Moderation log repository.

use std::sync::Arc;

use crate::entities::{ModLog, mod_log};
use fedigram_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Moderation log repository for database operations.
#[derive(Clone)]
pub struct ModLogRepository {
    db: Arc<DatabaseConnection>,
}

impl ModLogRepository {
    /// Create a new mod log repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an entry by ID, including soft-deleted ones.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<mod_log::Model>> {
        ModLog::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Live entries, newest first (paginated).
    pub async fn find_recent(
        &self,
        limit: u64,
        until_id: Option<i64>,
    ) -> AppResult<Vec<mod_log::Model>> {
        let mut query = ModLog::find()
            .filter(mod_log::Column::DeletedAt.is_null())
            .order_by_desc(mod_log::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(mod_log::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new entry.
    pub async fn create(&self, model: mod_log::ActiveModel) -> AppResult<mod_log::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an entry.
    pub async fn update(&self, model: mod_log::ActiveModel) -> AppResult<mod_log::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Remove an entry permanently.
    pub async fn delete(&self, model: mod_log::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_entry(id: i64) -> mod_log::Model {
        mod_log::Model {
            id,
            user_id: 1,
            user_username: Some("admin".to_string()),
            object_uid: None,
            object_id: Some(99),
            object_type: Some("Profile".to_string()),
            action: "admin.user.moderate".to_string(),
            message: None,
            metadata: None,
            access_level: "admin".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_recent() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_entry(3), create_test_entry(2)]])
                .into_connection(),
        );

        let repo = ModLogRepository::new(db);
        let entries = repo.find_recent(10, None).await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, 3);
    }
}
