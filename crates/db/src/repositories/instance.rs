//! Instance repository.

use std::sync::Arc;

use crate::entities::{Instance, instance};
use fedigram_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Instance repository for database operations.
#[derive(Clone)]
pub struct InstanceRepository {
    db: Arc<DatabaseConnection>,
}

impl InstanceRepository {
    /// Create a new instance repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an instance by domain.
    pub async fn find_by_domain(&self, domain: &str) -> AppResult<Option<instance::Model>> {
        Instance::find()
            .filter(instance::Column::Domain.eq(domain.to_lowercase()))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find instances by IDs.
    pub async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<instance::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Instance::find()
            .filter(instance::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new instance.
    pub async fn create(&self, model: instance::ActiveModel) -> AppResult<instance::Model> {
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
    async fn test_find_by_domain() {
        let instance = instance::Model {
            id: 3,
            domain: "remote.example".to_string(),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[instance.clone()]])
                .into_connection(),
        );

        let repo = InstanceRepository::new(db);
        let found = repo.find_by_domain("Remote.Example").await.unwrap();

        assert_eq!(found.unwrap().id, 3);
    }
}
