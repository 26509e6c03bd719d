//! Follower repository.

use std::sync::Arc;

use crate::entities::{Follower, follower};
use fedigram_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// Follower repository for database operations.
#[derive(Clone)]
pub struct FollowerRepository {
    db: Arc<DatabaseConnection>,
}

impl FollowerRepository {
    /// Create a new follower repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Whether `profile_id` follows `following_id`.
    pub async fn is_following(&self, profile_id: i64, following_id: i64) -> AppResult<bool> {
        let count = Follower::find()
            .filter(follower::Column::ProfileId.eq(profile_id))
            .filter(follower::Column::FollowingId.eq(following_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Number of profiles following `profile_id`.
    pub async fn count_followers(&self, profile_id: i64) -> AppResult<u64> {
        Follower::find()
            .filter(follower::Column::FollowingId.eq(profile_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Number of profiles `profile_id` follows.
    pub async fn count_following(&self, profile_id: i64) -> AppResult<u64> {
        Follower::find()
            .filter(follower::Column::ProfileId.eq(profile_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// IDs of remote profiles following `profile_id`, oldest edge first.
    pub async fn find_remote_follower_ids(&self, profile_id: i64) -> AppResult<Vec<i64>> {
        Follower::find()
            .select_only()
            .column(follower::Column::ProfileId)
            .filter(follower::Column::FollowingId.eq(profile_id))
            .filter(follower::Column::LocalProfile.eq(false))
            .order_by_asc(follower::Column::Id)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
