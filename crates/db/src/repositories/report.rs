//! Report repository.

use std::sync::Arc;

use crate::entities::{Report, report};
use fedigram_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Report repository for database operations.
#[derive(Clone)]
pub struct ReportRepository {
    db: Arc<DatabaseConnection>,
}

impl ReportRepository {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Reports filed by a profile.
    pub async fn find_by_reporter(&self, profile_id: i64) -> AppResult<Vec<report::Model>> {
        Report::find()
            .filter(report::Column::ProfileId.eq(profile_id))
            .order_by_desc(report::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Reports filed against a profile.
    pub async fn find_by_reported(&self, profile_id: i64) -> AppResult<Vec<report::Model>> {
        Report::find()
            .filter(report::Column::ReportedProfileId.eq(profile_id))
            .order_by_desc(report::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// File a new report.
    pub async fn create(&self, model: report::ActiveModel) -> AppResult<report::Model> {
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
    async fn test_find_by_reported() {
        let report = report::Model {
            id: 1,
            profile_id: 2,
            reported_profile_id: 3,
            object_id: 3,
            object_type: "Profile".to_string(),
            report_type: "spam".to_string(),
            message: None,
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[report.clone()]])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let found = repo.find_by_reported(3).await.unwrap();

        assert_eq!(found[0].profile_id, 2);
    }
}
