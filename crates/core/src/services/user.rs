//! User service: bearer token authentication and account settings.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use fedigram_common::{AppError, AppResult};
use fedigram_db::{
    entities::{profile, user},
    repositories::{ProfileRepository, UserRepository},
};
use sea_orm::{IntoActiveModel, Set};
use tracing::info;

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    profile_repo: ProfileRepository,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository, profile_repo: ProfileRepository) -> Self {
        Self {
            user_repo,
            profile_repo,
        }
    }

    /// Authenticate a user by bearer token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        if token.is_empty() {
            return Err(AppError::Unauthorized);
        }
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// The local profile owned by a user.
    pub async fn profile_of(&self, user: &user::Model) -> AppResult<profile::Model> {
        self.profile_repo
            .find_by_user_id(user.id)
            .await?
            .ok_or_else(|| AppError::ProfileNotFound(user.username.clone()))
    }

    /// Change whether follower and following counts are shown publicly.
    pub async fn update_count_visibility(
        &self,
        user: user::Model,
        show_follower_count: Option<bool>,
        show_following_count: Option<bool>,
    ) -> AppResult<user::Model> {
        let user_id = user.id;
        let mut active = user.into_active_model();
        if let Some(show) = show_follower_count {
            active.show_profile_follower_count = Set(show);
        }
        if let Some(show) = show_following_count {
            active.show_profile_following_count = Set(show);
        }
        active.updated_at = Set(Some(Utc::now().fixed_offset()));

        let updated = self.user_repo.update(active).await?;
        info!(
            user_id,
            show_follower_count = updated.show_profile_follower_count,
            show_following_count = updated.show_profile_following_count,
            "Count visibility updated"
        );
        Ok(updated)
    }
}

/// Hash a password using Argon2.
pub(crate) fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_user(password_hash: &str) -> user::Model {
        user::Model {
            id: 1,
            username: "alice".to_string(),
            name: Some("Alice".to_string()),
            email: "alice@example.com".to_string(),
            password: password_hash.to_string(),
            token: Some("tok".to_string()),
            is_admin: false,
            show_profile_follower_count: true,
            show_profile_following_count: true,
            created_at: Utc::now().fixed_offset(),
            updated_at: None,
        }
    }

    fn service(user_db: MockDatabase) -> UserService {
        UserService::new(
            UserRepository::new(Arc::new(user_db.into_connection())),
            ProfileRepository::new(Arc::new(
                MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            )),
        )
    }

    #[test]
    fn test_hash_password_is_salted() {
        let first = hash_password("correct horse").unwrap();
        let second = hash_password("correct horse").unwrap();
        assert!(first.starts_with("$argon2"));
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_authenticate_by_token_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_user("x")]]);

        let user = service(db).authenticate_by_token("tok").await.unwrap();
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn test_authenticate_by_token_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()]);

        assert!(matches!(
            service(db).authenticate_by_token("nope").await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_empty_token_is_rejected_without_query() {
        let db = MockDatabase::new(DatabaseBackend::Postgres);
        assert!(matches!(
            service(db).authenticate_by_token("").await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_update_count_visibility() {
        let mut hidden = test_user("x");
        hidden.show_profile_follower_count = false;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[hidden]]);

        let updated = service(db)
            .update_count_visibility(test_user("x"), Some(false), None)
            .await
            .unwrap();
        assert!(!updated.show_profile_follower_count);
        assert!(updated.show_profile_following_count);
    }
}
