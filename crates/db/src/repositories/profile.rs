//! Profile repository.

use std::sync::Arc;

use crate::entities::{Profile, profile};
use fedigram_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, sea_query::Expr,
};

/// Profile repository for database operations.
#[derive(Clone)]
pub struct ProfileRepository {
    db: Arc<DatabaseConnection>,
}

impl ProfileRepository {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a profile by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<profile::Model>> {
        Profile::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a profile by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i64) -> AppResult<profile::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ProfileNotFound(id.to_string()))
    }

    /// Find profiles by IDs.
    pub async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<profile::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Profile::find()
            .filter(profile::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the profile owned by a local account.
    pub async fn find_by_user_id(&self, user_id: i64) -> AppResult<Option<profile::Model>> {
        Profile::find()
            .filter(profile::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a live local profile by username.
    pub async fn find_local_by_username(
        &self,
        username: &str,
    ) -> AppResult<Option<profile::Model>> {
        Profile::find()
            .filter(profile::Column::Username.eq(username.to_lowercase()))
            .filter(profile::Column::Domain.is_null())
            .filter(profile::Column::DeletedAt.is_null())
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new profile.
    pub async fn create(&self, model: profile::ActiveModel) -> AppResult<profile::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Overwrite the denormalized follower counter.
    pub async fn set_followers_count(&self, id: i64, count: i32) -> AppResult<()> {
        Profile::update_many()
            .col_expr(profile::Column::FollowersCount, Expr::value(count))
            .filter(profile::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Overwrite the denormalized following counter.
    pub async fn set_following_count(&self, id: i64, count: i32) -> AppResult<()> {
        Profile::update_many()
            .col_expr(profile::Column::FollowingCount, Expr::value(count))
            .filter(profile::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
