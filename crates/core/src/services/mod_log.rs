//! Moderation log and its administrator notifications.
//!
//! Every lifecycle change of a log entry goes through [`ModLogService::observe`]:
//! created, updated and restored entries are fanned out to the other
//! administrators as notifications, deleted and force-deleted entries have
//! those notifications removed. Fan-out is idempotent.

use chrono::Utc;
use fedigram_common::{AppError, AppResult, IdGenerator};
use fedigram_db::{
    entities::{mod_log, notification, user},
    repositories::{ModLogRepository, NotificationRepository, ProfileRepository, UserRepository},
};
use sea_orm::{IntoActiveModel, Set};
use serde::Deserialize;
use tracing::{debug, info, warn};
use validator::Validate;

/// Notification action used for mod log fan-out.
pub const MODLOG_NOTIFICATION_ACTION: &str = "admin.modlog";

/// Notification item type pointing at a mod log entry.
pub const MODLOG_ITEM_TYPE: &str = "ModLog";

const DEFAULT_ACCESS_LEVEL: &str = "admin";

/// Lifecycle events of a mod log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModLogEvent {
    Created,
    Updated,
    Deleted,
    Restored,
    ForceDeleted,
}

impl ModLogEvent {
    /// Whether the event publishes the entry to administrators.
    #[must_use]
    pub const fn fans_out(self) -> bool {
        matches!(self, Self::Created | Self::Updated | Self::Restored)
    }
}

/// Input for a new mod log entry.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateModLogInput {
    #[validate(length(min = 1, max = 128))]
    pub action: String,
    #[validate(length(max = 5000))]
    pub message: Option<String>,
    pub object_uid: Option<i64>,
    pub object_id: Option<i64>,
    #[validate(length(max = 64))]
    pub object_type: Option<String>,
    pub metadata: Option<serde_json::Value>,
    #[validate(length(min = 1, max = 32))]
    pub access_level: Option<String>,
}

/// Mod log service for business logic.
#[derive(Clone)]
pub struct ModLogService {
    mod_log_repo: ModLogRepository,
    notification_repo: NotificationRepository,
    user_repo: UserRepository,
    profile_repo: ProfileRepository,
    id_gen: IdGenerator,
}

fn ensure_admin(actor: &user::Model) -> AppResult<()> {
    if actor.is_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden("Administrator access required".to_string()))
    }
}

impl ModLogService {
    /// Create a new mod log service.
    #[must_use]
    pub const fn new(
        mod_log_repo: ModLogRepository,
        notification_repo: NotificationRepository,
        user_repo: UserRepository,
        profile_repo: ProfileRepository,
        id_gen: IdGenerator,
    ) -> Self {
        Self {
            mod_log_repo,
            notification_repo,
            user_repo,
            profile_repo,
            id_gen,
        }
    }

    /// Record an administrator action.
    pub async fn create(
        &self,
        actor: &user::Model,
        input: CreateModLogInput,
    ) -> AppResult<mod_log::Model> {
        ensure_admin(actor)?;
        input.validate()?;

        let now = Utc::now().fixed_offset();
        let model = mod_log::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(actor.id),
            user_username: Set(Some(actor.username.clone())),
            object_uid: Set(input.object_uid),
            object_id: Set(input.object_id),
            object_type: Set(input.object_type),
            action: Set(input.action),
            message: Set(input.message),
            metadata: Set(input.metadata),
            access_level: Set(input
                .access_level
                .unwrap_or_else(|| DEFAULT_ACCESS_LEVEL.to_string())),
            created_at: Set(now),
            updated_at: Set(None),
            deleted_at: Set(None),
        };

        let log = self.mod_log_repo.create(model).await?;
        info!(mod_log_id = log.id, user_id = actor.id, action = %log.action, "Mod log created");

        self.observe(ModLogEvent::Created, &log).await?;
        Ok(log)
    }

    /// Recent live entries, newest first.
    pub async fn list(
        &self,
        actor: &user::Model,
        limit: u64,
        until_id: Option<i64>,
    ) -> AppResult<Vec<mod_log::Model>> {
        ensure_admin(actor)?;
        self.mod_log_repo.find_recent(limit, until_id).await
    }

    async fn get(&self, id: i64) -> AppResult<mod_log::Model> {
        self.mod_log_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Mod log {id}")))
    }

    /// Replace the message of a live entry.
    pub async fn update_message(
        &self,
        actor: &user::Model,
        id: i64,
        message: Option<String>,
    ) -> AppResult<mod_log::Model> {
        ensure_admin(actor)?;
        let log = self.get(id).await?;
        if log.deleted_at.is_some() {
            return Err(AppError::NotFound(format!("Mod log {id}")));
        }

        let mut active = log.into_active_model();
        active.message = Set(message);
        active.updated_at = Set(Some(Utc::now().fixed_offset()));
        let log = self.mod_log_repo.update(active).await?;

        self.observe(ModLogEvent::Updated, &log).await?;
        Ok(log)
    }

    /// Soft-delete an entry.
    pub async fn delete(&self, actor: &user::Model, id: i64) -> AppResult<()> {
        ensure_admin(actor)?;
        let log = self.get(id).await?;
        if log.deleted_at.is_some() {
            return Err(AppError::NotFound(format!("Mod log {id}")));
        }

        let mut active = log.into_active_model();
        active.deleted_at = Set(Some(Utc::now().fixed_offset()));
        let log = self.mod_log_repo.update(active).await?;

        info!(mod_log_id = id, user_id = actor.id, "Mod log deleted");
        self.observe(ModLogEvent::Deleted, &log).await?;
        Ok(())
    }

    /// Bring back a soft-deleted entry.
    pub async fn restore(&self, actor: &user::Model, id: i64) -> AppResult<mod_log::Model> {
        ensure_admin(actor)?;
        let log = self.get(id).await?;
        if log.deleted_at.is_none() {
            return Err(AppError::Conflict(format!("Mod log {id} is not deleted")));
        }

        let mut active = log.into_active_model();
        active.deleted_at = Set(None);
        active.updated_at = Set(Some(Utc::now().fixed_offset()));
        let log = self.mod_log_repo.update(active).await?;

        self.observe(ModLogEvent::Restored, &log).await?;
        Ok(log)
    }

    /// Remove an entry for good.
    pub async fn force_delete(&self, actor: &user::Model, id: i64) -> AppResult<()> {
        ensure_admin(actor)?;
        let log = self.get(id).await?;
        self.mod_log_repo.delete(log.clone()).await?;

        info!(mod_log_id = id, user_id = actor.id, "Mod log purged");
        self.observe(ModLogEvent::ForceDeleted, &log).await?;
        Ok(())
    }

    /// React to a lifecycle event. Returns the number of notifications
    /// created or removed.
    pub async fn observe(&self, event: ModLogEvent, log: &mod_log::Model) -> AppResult<u64> {
        debug!(mod_log_id = log.id, ?event, "Mod log event");
        if event.fans_out() {
            self.fanout(log).await
        } else {
            self.unfanout(log).await
        }
    }

    /// Notify every administrator except the author, once.
    pub async fn fanout(&self, log: &mod_log::Model) -> AppResult<u64> {
        let Some(actor_profile) = self.profile_repo.find_by_user_id(log.user_id).await? else {
            warn!(mod_log_id = log.id, user_id = log.user_id, "Mod log author has no profile");
            return Ok(0);
        };

        let mut created = 0;
        for admin_id in self.user_repo.find_admin_ids().await? {
            if admin_id == log.user_id {
                continue;
            }
            let Some(admin_profile) = self.profile_repo.find_by_user_id(admin_id).await? else {
                continue;
            };
            if self
                .notification_repo
                .exists_for_item(
                    admin_profile.id,
                    MODLOG_NOTIFICATION_ACTION,
                    MODLOG_ITEM_TYPE,
                    log.id,
                )
                .await?
            {
                continue;
            }

            let model = notification::ActiveModel {
                id: Set(self.id_gen.generate()),
                profile_id: Set(admin_profile.id),
                actor_id: Set(actor_profile.id),
                action: Set(MODLOG_NOTIFICATION_ACTION.to_string()),
                item_id: Set(Some(log.id)),
                item_type: Set(Some(MODLOG_ITEM_TYPE.to_string())),
                read_at: Set(None),
                created_at: Set(Utc::now().fixed_offset()),
            };
            self.notification_repo.create(model).await?;
            created += 1;
        }

        debug!(mod_log_id = log.id, created, "Mod log fanned out");
        Ok(created)
    }

    /// Remove the notifications created by [`Self::fanout`].
    pub async fn unfanout(&self, log: &mod_log::Model) -> AppResult<u64> {
        let removed = self
            .notification_repo
            .delete_for_item(MODLOG_NOTIFICATION_ACTION, MODLOG_ITEM_TYPE, log.id)
            .await?;
        debug!(mod_log_id = log.id, removed, "Mod log notifications removed");
        Ok(removed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use fedigram_db::entities::profile;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use std::sync::Arc;

    fn admin(id: i64, is_admin: bool) -> user::Model {
        user::Model {
            id,
            username: format!("admin{id}"),
            name: None,
            email: format!("admin{id}@example.com"),
            password: "hash".to_string(),
            token: None,
            is_admin,
            show_profile_follower_count: true,
            show_profile_following_count: true,
            created_at: Utc::now().fixed_offset(),
            updated_at: None,
        }
    }

    fn profile_of(id: i64, user_id: i64) -> profile::Model {
        profile::Model {
            id,
            user_id: Some(user_id),
            username: format!("admin{user_id}"),
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

    fn log(id: i64, user_id: i64) -> mod_log::Model {
        mod_log::Model {
            id,
            user_id,
            user_username: Some(format!("admin{user_id}")),
            object_uid: Some(9),
            object_id: Some(9),
            object_type: Some("Profile".to_string()),
            action: "admin.user.suspend".to_string(),
            message: Some("spam".to_string()),
            metadata: None,
            access_level: "admin".to_string(),
            created_at: Utc::now().fixed_offset(),
            updated_at: None,
            deleted_at: None,
        }
    }

    fn notification(id: i64, profile_id: i64) -> notification::Model {
        notification::Model {
            id,
            profile_id,
            actor_id: 101,
            action: MODLOG_NOTIFICATION_ACTION.to_string(),
            item_id: Some(1),
            item_type: Some(MODLOG_ITEM_TYPE.to_string()),
            read_at: None,
            created_at: Utc::now().fixed_offset(),
        }
    }

    fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, Value> {
        btreemap! { "num_items" => Into::<Value>::into(n) }
    }

    fn id_row(id: i64) -> std::collections::BTreeMap<&'static str, Value> {
        btreemap! { "id" => Into::<Value>::into(id) }
    }

    fn service(
        mod_log_db: MockDatabase,
        notification_db: MockDatabase,
        user_db: MockDatabase,
        profile_db: MockDatabase,
    ) -> ModLogService {
        ModLogService::new(
            ModLogRepository::new(Arc::new(mod_log_db.into_connection())),
            NotificationRepository::new(Arc::new(notification_db.into_connection())),
            UserRepository::new(Arc::new(user_db.into_connection())),
            ProfileRepository::new(Arc::new(profile_db.into_connection())),
            IdGenerator::new(1),
        )
    }

    fn empty() -> MockDatabase {
        MockDatabase::new(DatabaseBackend::Postgres)
    }

    #[test]
    fn test_event_routing() {
        assert!(ModLogEvent::Created.fans_out());
        assert!(ModLogEvent::Updated.fans_out());
        assert!(ModLogEvent::Restored.fans_out());
        assert!(!ModLogEvent::Deleted.fans_out());
        assert!(!ModLogEvent::ForceDeleted.fans_out());
    }

    #[tokio::test]
    async fn test_non_admin_cannot_create() {
        let service = service(empty(), empty(), empty(), empty());
        let input = CreateModLogInput {
            action: "admin.user.suspend".to_string(),
            message: None,
            object_uid: None,
            object_id: None,
            object_type: None,
            metadata: None,
            access_level: None,
        };

        let result = service.create(&admin(1, false), input).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_fanout_skips_author_and_existing() {
        // Admins 1 (author), 2 (already notified) and 3.
        let user_db = empty().append_query_results([vec![id_row(1), id_row(2), id_row(3)]]);
        let profile_db = empty().append_query_results([
            [profile_of(101, 1)],
            [profile_of(102, 2)],
            [profile_of(103, 3)],
        ]);
        let notification_db = empty()
            .append_query_results([[count_row(1)], [count_row(0)]])
            .append_query_results([[notification(500, 103)]]);
        let service = service(empty(), notification_db, user_db, profile_db);

        assert_eq!(service.fanout(&log(1, 1)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_deleted_event_unfans() {
        let notification_db = empty().append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 2,
        }]);
        let service = service(empty(), notification_db, empty(), empty());

        let removed = service
            .observe(ModLogEvent::Deleted, &log(1, 1))
            .await
            .unwrap();
        assert_eq!(removed, 2);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let mod_log_db = empty().append_query_results([Vec::<mod_log::Model>::new()]);
        let service = service(mod_log_db, empty(), empty(), empty());

        let result = service.delete(&admin(1, true), 42).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    fn deleted_log(id: i64, user_id: i64) -> mod_log::Model {
        mod_log::Model {
            deleted_at: Some(Utc::now().fixed_offset()),
            ..log(id, user_id)
        }
    }

    #[tokio::test]
    async fn test_update_refans_to_other_admins() {
        let mut edited = log(1, 1);
        edited.message = Some("edited".to_string());
        let mod_log_db = empty().append_query_results([[log(1, 1)], [edited]]);
        let user_db = empty().append_query_results([vec![id_row(1), id_row(2)]]);
        let profile_db =
            empty().append_query_results([[profile_of(101, 1)], [profile_of(102, 2)]]);
        let notification_db = empty()
            .append_query_results([[count_row(0)]])
            .append_query_results([[notification(500, 102)]]);
        let service = service(mod_log_db, notification_db, user_db, profile_db);

        let updated = service
            .update_message(&admin(1, true), 1, Some("edited".to_string()))
            .await
            .unwrap();
        assert_eq!(updated.message.as_deref(), Some("edited"));
    }

    #[tokio::test]
    async fn test_update_soft_deleted_is_not_found() {
        let mod_log_db = empty().append_query_results([[deleted_log(1, 1)]]);
        let service = service(mod_log_db, empty(), empty(), empty());

        let result = service
            .update_message(&admin(1, true), 1, Some("edited".to_string()))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_soft_deleted_is_not_found() {
        let mod_log_db = empty().append_query_results([[deleted_log(1, 1)]]);
        let service = service(mod_log_db, empty(), empty(), empty());

        let result = service.delete(&admin(1, true), 1).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_restore_live_entry_is_conflict() {
        let mod_log_db = empty().append_query_results([[log(1, 1)]]);
        let service = service(mod_log_db, empty(), empty(), empty());

        let result = service.restore(&admin(1, true), 1).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_restore_clears_deleted_at() {
        let mod_log_db = empty().append_query_results([[deleted_log(1, 1)], [log(1, 1)]]);
        // Author without a profile: nothing to fan out.
        let profile_db = empty().append_query_results([Vec::<profile::Model>::new()]);
        let service = service(mod_log_db, empty(), empty(), profile_db);

        let restored = service.restore(&admin(1, true), 1).await.unwrap();
        assert!(restored.deleted_at.is_none());
    }

    #[tokio::test]
    async fn test_force_delete_removes_row_and_unfans() {
        let mod_log_db = empty()
            .append_query_results([[deleted_log(1, 1)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }]);
        let notification_db = empty().append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 2,
        }]);
        let service = service(mod_log_db, notification_db, empty(), empty());

        assert!(service.force_delete(&admin(1, true), 1).await.is_ok());
    }

    #[tokio::test]
    async fn test_non_admin_cannot_force_delete() {
        let service = service(empty(), empty(), empty(), empty());

        let result = service.force_delete(&admin(2, false), 1).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_fanout_without_author_profile() {
        let profile_db = empty().append_query_results([Vec::<profile::Model>::new()]);
        let service = service(empty(), empty(), empty(), profile_db);

        assert_eq!(service.fanout(&log(1, 1)).await.unwrap(), 0);
    }
}
