//! Status repository.

use std::sync::Arc;

use crate::entities::{Status, status};
use fedigram_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};

/// Status repository for database operations.
#[derive(Clone)]
pub struct StatusRepository {
    db: Arc<DatabaseConnection>,
}

impl StatusRepository {
    /// Create a new status repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a status by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<status::Model>> {
        Status::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a status by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i64) -> AppResult<status::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Status {id}")))
    }

    /// Create a new status.
    pub async fn create(&self, model: status::ActiveModel) -> AppResult<status::Model> {
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
    use crate::entities::status::Scope;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_get_by_id() {
        let status = status::Model {
            id: 5,
            profile_id: 1,
            caption: Some("sunset".to_string()),
            scope: Scope::Public,
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![status.clone()], vec![]])
                .into_connection(),
        );

        let repo = StatusRepository::new(db);
        assert_eq!(repo.get_by_id(5).await.unwrap().scope, Scope::Public);
        assert!(matches!(
            repo.get_by_id(6).await,
            Err(AppError::NotFound(_))
        ));
    }
}
