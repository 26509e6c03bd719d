//! Mute and block filters on profiles and instances.

use chrono::Utc;
use fedigram_common::{AppError, AppResult, IdGenerator};
use fedigram_db::{
    entities::{
        instance, user, user_filter,
        user_filter::{FilterType, FilterableType},
    },
    repositories::{InstanceRepository, ProfileRepository, UserFilterRepository},
};
use fedigram_federation::UrlConfig;
use sea_orm::Set;
use tracing::info;

/// User filter service for business logic.
#[derive(Clone)]
pub struct UserFilterService {
    user_filter_repo: UserFilterRepository,
    profile_repo: ProfileRepository,
    instance_repo: InstanceRepository,
    id_gen: IdGenerator,
    urls: UrlConfig,
}

const fn verb(filter_type: FilterType) -> &'static str {
    match filter_type {
        FilterType::Mute => "mute",
        FilterType::Block => "block",
    }
}

/// Lowercased host of a domain or URL.
pub fn normalize_domain(domain: &str) -> AppResult<String> {
    let domain = domain.trim().trim_end_matches('/').to_lowercase();
    let domain = domain
        .split_once("://")
        .map_or(domain.as_str(), |(_, rest)| rest)
        .to_string();
    if domain.is_empty() || domain.contains('/') || domain.contains(char::is_whitespace) {
        return Err(AppError::BadRequest(format!("Invalid domain: {domain}")));
    }
    Ok(domain)
}

impl UserFilterService {
    /// Create a new user filter service.
    #[must_use]
    pub const fn new(
        user_filter_repo: UserFilterRepository,
        profile_repo: ProfileRepository,
        instance_repo: InstanceRepository,
        id_gen: IdGenerator,
        urls: UrlConfig,
    ) -> Self {
        Self {
            user_filter_repo,
            profile_repo,
            instance_repo,
            id_gen,
            urls,
        }
    }

    /// Mute or block a profile on behalf of `user`.
    pub async fn filter_profile(
        &self,
        user: &user::Model,
        target_id: i64,
        filter_type: FilterType,
    ) -> AppResult<user_filter::Model> {
        let target = self.profile_repo.get_by_id(target_id).await?;
        if target.user_id == Some(user.id) {
            return Err(AppError::BadRequest(format!(
                "Cannot {} yourself",
                verb(filter_type)
            )));
        }

        let filter = self
            .create_filter(user, target.id, FilterableType::Profile, filter_type)
            .await?;
        info!(
            user_id = user.id,
            profile_id = target.id,
            filter = verb(filter_type),
            "Profile filtered"
        );
        Ok(filter)
    }

    /// Remove a profile mute or block.
    pub async fn unfilter_profile(
        &self,
        user: &user::Model,
        target_id: i64,
        filter_type: FilterType,
    ) -> AppResult<()> {
        self.remove_filter(user, target_id, FilterableType::Profile, filter_type)
            .await?;
        info!(
            user_id = user.id,
            profile_id = target_id,
            filter = verb(filter_type),
            "Profile filter removed"
        );
        Ok(())
    }

    /// Mute or block a whole instance by domain.
    pub async fn filter_instance(
        &self,
        user: &user::Model,
        domain: &str,
        filter_type: FilterType,
    ) -> AppResult<user_filter::Model> {
        let domain = normalize_domain(domain)?;
        if domain == self.urls.host() {
            return Err(AppError::BadRequest(format!(
                "Cannot {} your own instance",
                verb(filter_type)
            )));
        }

        let instance = self.find_or_create_instance(&domain).await?;
        let filter = self
            .create_filter(user, instance.id, FilterableType::Instance, filter_type)
            .await?;
        info!(
            user_id = user.id,
            domain = %domain,
            filter = verb(filter_type),
            "Instance filtered"
        );
        Ok(filter)
    }

    /// Remove an instance mute or block.
    pub async fn unfilter_instance(
        &self,
        user: &user::Model,
        domain: &str,
        filter_type: FilterType,
    ) -> AppResult<()> {
        let domain = normalize_domain(domain)?;
        let instance = self
            .instance_repo
            .find_by_domain(&domain)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Not filtering {domain}")))?;

        self.remove_filter(user, instance.id, FilterableType::Instance, filter_type)
            .await
    }

    /// Domains filtered by `user`, newest first.
    pub async fn filtered_instances(
        &self,
        user: &user::Model,
        filter_type: FilterType,
    ) -> AppResult<Vec<String>> {
        let ids = self
            .user_filter_repo
            .find_filterable_ids(user.id, FilterableType::Instance, filter_type)
            .await?;
        let mut instances = self.instance_repo.find_by_ids(&ids).await?;
        instances.sort_by_key(|i| ids.iter().position(|id| *id == i.id));
        Ok(instances.into_iter().map(|i| i.domain).collect())
    }

    async fn create_filter(
        &self,
        user: &user::Model,
        filterable_id: i64,
        filterable_type: FilterableType,
        filter_type: FilterType,
    ) -> AppResult<user_filter::Model> {
        if self
            .user_filter_repo
            .find(user.id, filterable_id, filterable_type, filter_type)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Already {}d",
                verb(filter_type)
            )));
        }

        let model = user_filter::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user.id),
            filterable_id: Set(filterable_id),
            filterable_type: Set(filterable_type),
            filter_type: Set(filter_type),
            created_at: Set(Utc::now().fixed_offset()),
        };
        self.user_filter_repo.create(model).await
    }

    async fn remove_filter(
        &self,
        user: &user::Model,
        filterable_id: i64,
        filterable_type: FilterableType,
        filter_type: FilterType,
    ) -> AppResult<()> {
        let filter = self
            .user_filter_repo
            .find(user.id, filterable_id, filterable_type, filter_type)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No {} to remove", verb(filter_type))))?;
        self.user_filter_repo.delete(filter).await
    }

    async fn find_or_create_instance(&self, domain: &str) -> AppResult<instance::Model> {
        if let Some(existing) = self.instance_repo.find_by_domain(domain).await? {
            return Ok(existing);
        }

        let model = instance::ActiveModel {
            id: Set(self.id_gen.generate()),
            domain: Set(domain.to_string()),
            created_at: Set(Utc::now().fixed_offset()),
        };
        self.instance_repo.create(model).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use fedigram_db::entities::profile;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn user(id: i64) -> user::Model {
        user::Model {
            id,
            username: "alice".to_string(),
            name: None,
            email: "alice@example.com".to_string(),
            password: "hash".to_string(),
            token: None,
            is_admin: false,
            show_profile_follower_count: true,
            show_profile_following_count: true,
            created_at: Utc::now().fixed_offset(),
            updated_at: None,
        }
    }

    fn profile(id: i64, user_id: Option<i64>) -> profile::Model {
        profile::Model {
            id,
            user_id,
            username: format!("p{id}"),
            name: None,
            bio: None,
            domain: None,
            is_private: false,
            following_count: 0,
            followers_count: 0,
            status_count: 0,
            remote_url: None,
            inbox_url: None,
            outbox_url: None,
            shared_inbox: None,
            public_key: None,
            private_key: None,
            avatar_url: None,
            last_fetched_at: None,
            created_at: Utc::now().fixed_offset(),
            updated_at: None,
            deleted_at: None,
        }
    }

    fn filter(id: i64, filterable_id: i64, kind: FilterableType) -> user_filter::Model {
        user_filter::Model {
            id,
            user_id: 1,
            filterable_id,
            filterable_type: kind,
            filter_type: FilterType::Mute,
            created_at: Utc::now().fixed_offset(),
        }
    }

    fn service(filter_db: MockDatabase, profile_db: MockDatabase, instance_db: MockDatabase) -> UserFilterService {
        UserFilterService::new(
            UserFilterRepository::new(Arc::new(filter_db.into_connection())),
            ProfileRepository::new(Arc::new(profile_db.into_connection())),
            InstanceRepository::new(Arc::new(instance_db.into_connection())),
            IdGenerator::new(1),
            UrlConfig::new("https://pix.example").unwrap(),
        )
    }

    fn empty() -> MockDatabase {
        MockDatabase::new(DatabaseBackend::Postgres)
    }

    #[tokio::test]
    async fn test_cannot_mute_yourself() {
        let profile_db = empty().append_query_results([[profile(10, Some(1))]]);
        let service = service(empty(), profile_db, empty());

        let result = service.filter_profile(&user(1), 10, FilterType::Mute).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_mute_profile() {
        let profile_db = empty().append_query_results([[profile(20, Some(2))]]);
        let filter_db = empty()
            .append_query_results([Vec::<user_filter::Model>::new()])
            .append_query_results([[filter(100, 20, FilterableType::Profile)]]);
        let service = service(filter_db, profile_db, empty());

        let created = service
            .filter_profile(&user(1), 20, FilterType::Mute)
            .await
            .unwrap();
        assert_eq!(created.filterable_id, 20);
    }

    #[tokio::test]
    async fn test_duplicate_mute_conflicts() {
        let profile_db = empty().append_query_results([[profile(20, Some(2))]]);
        let filter_db =
            empty().append_query_results([[filter(100, 20, FilterableType::Profile)]]);
        let service = service(filter_db, profile_db, empty());

        let result = service.filter_profile(&user(1), 20, FilterType::Mute).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_unmute_missing_is_not_found() {
        let filter_db = empty().append_query_results([Vec::<user_filter::Model>::new()]);
        let service = service(filter_db, empty(), empty());

        let result = service.unfilter_profile(&user(1), 20, FilterType::Mute).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unmute_existing() {
        let filter_db = empty()
            .append_query_results([[filter(100, 20, FilterableType::Profile)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }]);
        let service = service(filter_db, empty(), empty());

        service
            .unfilter_profile(&user(1), 20, FilterType::Mute)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_cannot_filter_own_instance() {
        let service = service(empty(), empty(), empty());

        let result = service
            .filter_instance(&user(1), "https://PIX.example/", FilterType::Block)
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_mute_instance_creates_instance_row() {
        let instance_db = empty()
            .append_query_results([Vec::<instance::Model>::new()])
            .append_query_results([[instance::Model {
                id: 50,
                domain: "spam.example".to_string(),
                created_at: Utc::now().fixed_offset(),
            }]]);
        let filter_db = empty()
            .append_query_results([Vec::<user_filter::Model>::new()])
            .append_query_results([[filter(101, 50, FilterableType::Instance)]]);
        let service = service(filter_db, empty(), instance_db);

        let created = service
            .filter_instance(&user(1), "Spam.Example", FilterType::Mute)
            .await
            .unwrap();
        assert_eq!(created.filterable_id, 50);
        assert_eq!(created.filterable_type, FilterableType::Instance);
    }

    #[test]
    fn test_normalize_domain() {
        assert_eq!(normalize_domain(" https://Far.Example/ ").unwrap(), "far.example");
        assert!(normalize_domain("far.example/path").is_err());
        assert!(normalize_domain("").is_err());
    }
}
