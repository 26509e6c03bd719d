//! Profile service: counters, follow checks, filters and audience inboxes.

use std::collections::HashMap;
use std::sync::Arc;

use fedigram_common::{AppError, AppResult, CounterCache};
use fedigram_db::{
    entities::{
        profile, report,
        user_filter::{FilterType, FilterableType},
    },
    repositories::{
        FollowerRepository, ProfileRepository, ReportRepository, UserFilterRepository,
        UserRepository,
    },
};
use fedigram_federation::{ProfileUrls, UrlConfig, fanout_inboxes};
use tracing::{debug, info, warn};

/// Counters stay cached for thirty days.
pub const COUNT_CACHE_TTL_SECS: i64 = 60 * 60 * 24 * 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CountKind {
    Followers,
    Following,
}

impl CountKind {
    fn cache_key(self, profile_id: i64) -> String {
        match self {
            Self::Followers => format!("profile:follower_count:{profile_id}"),
            Self::Following => format!("profile:following_count:{profile_id}"),
        }
    }

    const fn stored(self, profile: &profile::Model) -> i32 {
        match self {
            Self::Followers => profile.followers_count,
            Self::Following => profile.following_count,
        }
    }
}

/// Profile service for business logic.
#[derive(Clone)]
pub struct ProfileService {
    profile_repo: ProfileRepository,
    user_repo: UserRepository,
    follower_repo: FollowerRepository,
    user_filter_repo: UserFilterRepository,
    report_repo: ReportRepository,
    cache: Arc<dyn CounterCache>,
    urls: UrlConfig,
}

impl ProfileService {
    /// Create a new profile service.
    #[must_use]
    pub fn new(
        profile_repo: ProfileRepository,
        user_repo: UserRepository,
        follower_repo: FollowerRepository,
        user_filter_repo: UserFilterRepository,
        report_repo: ReportRepository,
        cache: Arc<dyn CounterCache>,
        urls: UrlConfig,
    ) -> Self {
        Self {
            profile_repo,
            user_repo,
            follower_repo,
            user_filter_repo,
            report_repo,
            cache,
            urls,
        }
    }

    /// URL configuration of this instance.
    #[must_use]
    pub const fn urls(&self) -> &UrlConfig {
        &self.urls
    }

    /// Get a profile by id.
    pub async fn get(&self, id: i64) -> AppResult<profile::Model> {
        self.profile_repo.get_by_id(id).await
    }

    /// Find a live local profile by username.
    pub async fn get_local_by_username(&self, username: &str) -> AppResult<profile::Model> {
        self.profile_repo
            .find_local_by_username(username)
            .await?
            .ok_or_else(|| AppError::ProfileNotFound(username.to_string()))
    }

    /// Number of followers, or 0 when the owner hides it.
    pub async fn follower_count(&self, profile: &profile::Model) -> AppResult<u64> {
        self.cached_count(profile, CountKind::Followers).await
    }

    /// Number of followed profiles, or 0 when the owner hides it.
    pub async fn following_count(&self, profile: &profile::Model) -> AppResult<u64> {
        self.cached_count(profile, CountKind::Following).await
    }

    /// Follower count in short form (`1.2K`).
    pub async fn follower_count_short(&self, profile: &profile::Model) -> AppResult<String> {
        Ok(format_count_short(self.follower_count(profile).await?))
    }

    /// Following count in short form (`1.2K`).
    pub async fn following_count_short(&self, profile: &profile::Model) -> AppResult<String> {
        Ok(format_count_short(self.following_count(profile).await?))
    }

    /// Drop both cached counters of a profile.
    pub async fn forget_counts(&self, profile_id: i64) -> AppResult<()> {
        self.cache
            .forget(&CountKind::Followers.cache_key(profile_id))
            .await?;
        self.cache
            .forget(&CountKind::Following.cache_key(profile_id))
            .await
    }

    async fn cached_count(&self, profile: &profile::Model, kind: CountKind) -> AppResult<u64> {
        let key = kind.cache_key(profile.id);

        match self.cache.get(&key).await {
            Ok(Some(count)) => return Ok(count),
            Ok(None) => {}
            Err(e) => warn!(error = %e, key = %key, "Counter cache read failed"),
        }

        let count = self.compute_count(profile, kind).await?;

        if let Err(e) = self.cache.set(&key, count, COUNT_CACHE_TTL_SECS).await {
            warn!(error = %e, key = %key, "Counter cache write failed");
        }

        Ok(count)
    }

    async fn compute_count(&self, profile: &profile::Model, kind: CountKind) -> AppResult<u64> {
        if profile.is_local() && !self.count_visible(profile, kind).await? {
            return Ok(0);
        }

        let count = match kind {
            CountKind::Followers => self.follower_repo.count_followers(profile.id).await?,
            CountKind::Following => self.follower_repo.count_following(profile.id).await?,
        };

        let stored = kind.stored(profile);
        if u64::try_from(stored).ok() != Some(count) {
            let repaired = i32::try_from(count).unwrap_or(i32::MAX);
            info!(
                profile_id = profile.id,
                stored,
                actual = count,
                "Repairing denormalized counter"
            );
            match kind {
                CountKind::Followers => {
                    self.profile_repo
                        .set_followers_count(profile.id, repaired)
                        .await?;
                }
                CountKind::Following => {
                    self.profile_repo
                        .set_following_count(profile.id, repaired)
                        .await?;
                }
            }
        }

        Ok(count)
    }

    async fn count_visible(&self, profile: &profile::Model, kind: CountKind) -> AppResult<bool> {
        let Some(user_id) = profile.user_id else {
            return Ok(true);
        };
        let Some(user) = self.user_repo.find_by_id(user_id).await? else {
            debug!(profile_id = profile.id, user_id, "Local profile without user");
            return Ok(true);
        };

        Ok(match kind {
            CountKind::Followers => user.show_profile_follower_count,
            CountKind::Following => user.show_profile_following_count,
        })
    }

    /// Whether `profile` follows `other`.
    pub async fn follows(&self, profile: &profile::Model, other: &profile::Model) -> AppResult<bool> {
        self.follower_repo.is_following(profile.id, other.id).await
    }

    /// Whether `profile` is followed by `other`.
    pub async fn followed_by(
        &self,
        profile: &profile::Model,
        other: &profile::Model,
    ) -> AppResult<bool> {
        self.follower_repo.is_following(other.id, profile.id).await
    }

    /// Inboxes an activity by `profile` must be delivered to: one per remote
    /// server following it, preferring shared inboxes.
    pub async fn audience_inboxes(&self, profile: &profile::Model) -> AppResult<Vec<String>> {
        let ids = self
            .follower_repo
            .find_remote_follower_ids(profile.id)
            .await?;
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let followers = self.load_in_order(&ids).await?;
        let inboxes = fanout_inboxes(&followers);
        debug!(
            profile_id = profile.id,
            followers = followers.len(),
            inboxes = inboxes.len(),
            "Resolved audience inboxes"
        );
        Ok(inboxes)
    }

    async fn load_in_order(&self, ids: &[i64]) -> AppResult<Vec<profile::Model>> {
        let mut by_id: HashMap<i64, profile::Model> = self
            .profile_repo
            .find_by_ids(ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn filtered_ids(
        &self,
        profile: &profile::Model,
        filter_type: FilterType,
    ) -> AppResult<Vec<i64>> {
        let Some(user_id) = profile.user_id else {
            return Ok(vec![]);
        };
        self.user_filter_repo
            .find_filterable_ids(user_id, FilterableType::Profile, filter_type)
            .await
    }

    /// Ids of profiles muted by the owner of `profile`.
    pub async fn muted_ids(&self, profile: &profile::Model) -> AppResult<Vec<i64>> {
        self.filtered_ids(profile, FilterType::Mute).await
    }

    /// Ids of profiles blocked by the owner of `profile`.
    pub async fn blocked_ids(&self, profile: &profile::Model) -> AppResult<Vec<i64>> {
        self.filtered_ids(profile, FilterType::Block).await
    }

    /// URLs of muted profiles.
    pub async fn muted_profile_urls(&self, profile: &profile::Model) -> AppResult<Vec<String>> {
        let ids = self.muted_ids(profile).await?;
        self.profile_urls(&ids).await
    }

    /// URLs of blocked profiles.
    pub async fn blocked_profile_urls(&self, profile: &profile::Model) -> AppResult<Vec<String>> {
        let ids = self.blocked_ids(profile).await?;
        self.profile_urls(&ids).await
    }

    async fn profile_urls(&self, ids: &[i64]) -> AppResult<Vec<String>> {
        Ok(self
            .load_in_order(ids)
            .await?
            .iter()
            .map(|p| p.url(&self.urls, ""))
            .collect())
    }

    /// Reports filed by `profile`.
    pub async fn reports(&self, profile: &profile::Model) -> AppResult<Vec<report::Model>> {
        self.report_repo.find_by_reporter(profile.id).await
    }

    /// Reports filed against `profile`.
    pub async fn reported(&self, profile: &profile::Model) -> AppResult<Vec<report::Model>> {
        self.report_repo.find_by_reported(profile.id).await
    }
}

/// Render a counter compactly: `999`, `1.2K`, `3.4M`, `1.1B`.
#[must_use]
pub fn format_count_short(count: u64) -> String {
    const SUFFIXES: [&str; 5] = ["", "K", "M", "B", "T"];

    if count < 1000 {
        return count.to_string();
    }

    let mut scaled = count as f64;
    let mut power = 0;
    while scaled >= 1000.0 && power < SUFFIXES.len() - 1 {
        scaled /= 1000.0;
        power += 1;
    }

    let mut rounded = (scaled * 10.0).round() / 10.0;
    if rounded >= 1000.0 && power < SUFFIXES.len() - 1 {
        rounded /= 1000.0;
        power += 1;
    }
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}{}", SUFFIXES[power])
    } else {
        format!("{rounded:.1}{}", SUFFIXES[power])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fedigram_common::MemoryCounterCache;
    use fedigram_db::entities::user;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    fn profile(id: i64, user_id: Option<i64>, domain: Option<&str>) -> profile::Model {
        profile::Model {
            id,
            user_id,
            username: format!("user{id}"),
            name: None,
            bio: None,
            domain: domain.map(ToString::to_string),
            is_private: false,
            following_count: 0,
            followers_count: 0,
            status_count: 0,
            remote_url: domain.map(|d| format!("https://{d}/users/user{id}")),
            inbox_url: domain.map(|d| format!("https://{d}/users/user{id}/inbox")),
            outbox_url: None,
            shared_inbox: domain.map(|d| format!("https://{d}/inbox")),
            public_key: None,
            private_key: None,
            avatar_url: None,
            last_fetched_at: None,
            created_at: Utc::now().fixed_offset(),
            updated_at: None,
            deleted_at: None,
        }
    }

    fn owner(id: i64, show_followers: bool) -> user::Model {
        user::Model {
            id,
            username: format!("user{id}"),
            name: None,
            email: format!("user{id}@example.com"),
            password: "hash".to_string(),
            token: None,
            is_admin: false,
            show_profile_follower_count: show_followers,
            show_profile_following_count: true,
            created_at: Utc::now().fixed_offset(),
            updated_at: None,
        }
    }

    fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, Value> {
        btreemap! { "num_items" => Into::<Value>::into(n) }
    }

    struct Dbs {
        profile: MockDatabase,
        user: MockDatabase,
        follower: MockDatabase,
        user_filter: MockDatabase,
        report: MockDatabase,
    }

    impl Default for Dbs {
        fn default() -> Self {
            let empty = || MockDatabase::new(DatabaseBackend::Postgres);
            Self {
                profile: empty(),
                user: empty(),
                follower: empty(),
                user_filter: empty(),
                report: empty(),
            }
        }
    }

    fn service(dbs: Dbs, cache: Arc<dyn CounterCache>) -> ProfileService {
        ProfileService::new(
            ProfileRepository::new(Arc::new(dbs.profile.into_connection())),
            UserRepository::new(Arc::new(dbs.user.into_connection())),
            FollowerRepository::new(Arc::new(dbs.follower.into_connection())),
            UserFilterRepository::new(Arc::new(dbs.user_filter.into_connection())),
            ReportRepository::new(Arc::new(dbs.report.into_connection())),
            cache,
            UrlConfig::new("https://pix.example").unwrap(),
        )
    }

    #[test]
    fn test_format_count_short() {
        assert_eq!(format_count_short(0), "0");
        assert_eq!(format_count_short(999), "999");
        assert_eq!(format_count_short(1000), "1K");
        assert_eq!(format_count_short(1234), "1.2K");
        assert_eq!(format_count_short(3_400_000), "3.4M");
        assert_eq!(format_count_short(1_100_000_000), "1.1B");
    }

    #[test]
    fn test_format_count_short_carries_to_next_unit() {
        assert_eq!(format_count_short(999_949), "999.9K");
        assert_eq!(format_count_short(999_950), "1M");
        assert_eq!(format_count_short(999_999_999), "1B");
    }

    #[tokio::test]
    async fn test_follower_count_is_cached() {
        let mut local = profile(1, Some(10), None);
        local.followers_count = 5;

        let dbs = Dbs {
            user: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[owner(10, true)]]),
            follower: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[count_row(5)]]),
            ..Dbs::default()
        };
        let cache = Arc::new(MemoryCounterCache::new());
        let service = service(dbs, cache.clone());

        assert_eq!(service.follower_count(&local).await.unwrap(), 5);
        // Second call must not touch the database.
        assert_eq!(service.follower_count(&local).await.unwrap(), 5);
        assert_eq!(
            cache.get("profile:follower_count:1").await.unwrap(),
            Some(5)
        );
    }

    #[tokio::test]
    async fn test_hidden_count_is_zero() {
        let local = profile(1, Some(10), None);
        let dbs = Dbs {
            user: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[owner(10, false)]]),
            ..Dbs::default()
        };
        let service = service(dbs, Arc::new(MemoryCounterCache::new()));

        assert_eq!(service.follower_count(&local).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_drifted_counter_is_repaired() {
        let mut remote = profile(2, None, Some("remote.example"));
        remote.following_count = 3;

        let dbs = Dbs {
            follower: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[count_row(7)]]),
            profile: MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ]),
            ..Dbs::default()
        };
        let service = service(dbs, Arc::new(fedigram_common::NoOpCounterCache));

        assert_eq!(service.following_count(&remote).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_audience_inboxes_dedup_shared() {
        let local = profile(1, Some(10), None);
        let a = profile(5, None, Some("one.example"));
        let b = profile(6, None, Some("one.example"));
        let mut c = profile(7, None, Some("two.example"));
        c.shared_inbox = None;

        let dbs = Dbs {
            follower: MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![
                btreemap! { "profile_id" => Into::<Value>::into(7i64) },
                btreemap! { "profile_id" => Into::<Value>::into(5i64) },
                btreemap! { "profile_id" => Into::<Value>::into(6i64) },
            ]]),
            profile: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![a, b, c]]),
            ..Dbs::default()
        };
        let service = service(dbs, Arc::new(MemoryCounterCache::new()));

        assert_eq!(
            service.audience_inboxes(&local).await.unwrap(),
            vec![
                "https://two.example/users/user7/inbox".to_string(),
                "https://one.example/inbox".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_muted_profile_urls() {
        let local = profile(1, Some(10), None);
        let muted = profile(9, None, Some("far.example"));

        let dbs = Dbs {
            user_filter: MockDatabase::new(DatabaseBackend::Postgres).append_query_results([
                vec![btreemap! { "filterable_id" => Into::<Value>::into(9i64) }],
            ]),
            profile: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![muted]]),
            ..Dbs::default()
        };
        let service = service(dbs, Arc::new(MemoryCounterCache::new()));

        assert_eq!(
            service.muted_profile_urls(&local).await.unwrap(),
            vec!["https://far.example/users/user9".to_string()]
        );
    }

    #[tokio::test]
    async fn test_remote_profile_has_no_filters() {
        let remote = profile(3, None, Some("far.example"));
        let service = service(Dbs::default(), Arc::new(MemoryCounterCache::new()));

        assert!(service.blocked_ids(&remote).await.unwrap().is_empty());
    }
}
