//! Media storage pipeline tests.
//!
//! The Redis test requires a running Redis instance.
//! Run with: `cargo test --test media_storage_integration -- --ignored`
//!
//! Set `REDIS_URL` environment variable to point to your Redis instance.
//! Default: <redis://localhost:6379>

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use chrono::Utc;
use fedigram_common::{LocalStorage, StorageBackend, config::MediaConfig};
use fedigram_core::{MediaStorageQueue, MediaStorageService, StoreOutcome};
use fedigram_db::{entities::media, repositories::MediaRepository};
use fedigram_queue::{
    MediaStorageContext, MediaStorageJob, RedisMediaStorageQueue, process_media_storage,
};
use sea_orm::{DatabaseBackend, MockDatabase};

fn get_redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
}

fn media(id: i64, remote: bool) -> media::Model {
    media::Model {
        id,
        status_id: None,
        profile_id: 1,
        media_path: Some(format!("2024/01/01/1/{id}.png")),
        remote_url: remote.then(|| format!("https://remote.example/{id}.png")),
        remote_media: remote,
        cdn_url: None,
        thumbnail_path: None,
        thumbnail_url: None,
        optimized_url: None,
        caption: None,
        license: None,
        is_nsfw: false,
        orientation: Some("square".to_string()),
        filter_name: None,
        filter_class: None,
        mime: Some("image/png".to_string()),
        size: Some(10),
        width: Some(1),
        height: Some(1),
        blurhash: None,
        version: 3,
        order: 1,
        created_at: Utc::now().fixed_offset(),
        updated_at: None,
    }
}

fn context(db: MockDatabase, dir: &tempfile::TempDir, config: &MediaConfig) -> MediaStorageContext {
    let local: Arc<dyn StorageBackend> = Arc::new(LocalStorage::new(
        dir.path().to_path_buf(),
        "/storage/media".to_string(),
    ));
    MediaStorageContext::new(MediaStorageService::new(
        MediaRepository::new(Arc::new(db.into_connection())),
        local,
        None,
        config,
    ))
}

#[tokio::test]
async fn test_remote_media_is_never_copied() {
    let dir = tempfile::tempdir().unwrap();
    let db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[media(3, true)]]);
    let ctx = context(db, &dir, &MediaConfig::default());

    let outcome = process_media_storage(&MediaStorageJob::new(3), &ctx)
        .await
        .unwrap();
    assert_eq!(outcome, StoreOutcome::SkippedRemote);
}

#[tokio::test]
async fn test_local_media_stays_local_without_cloud() {
    let dir = tempfile::tempdir().unwrap();
    let db =
        MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[media(4, false)]]);
    let ctx = context(db, &dir, &MediaConfig::default());

    let outcome = process_media_storage(&MediaStorageJob::new(4), &ctx)
        .await
        .unwrap();
    assert_eq!(outcome, StoreOutcome::SkippedCloudDisabled);
}

#[tokio::test]
async fn test_missing_media_fails_the_job() {
    let dir = tempfile::tempdir().unwrap();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<media::Model>::new()]);
    let ctx = context(db, &dir, &MediaConfig::default());

    assert!(
        process_media_storage(&MediaStorageJob::new(5), &ctx)
            .await
            .is_err()
    );
}

/// Test that a job can be pushed to Redis.
#[tokio::test]
#[ignore = "requires running Redis instance"]
async fn test_enqueue_store_pushes_job() {
    let client = redis::Client::open(get_redis_url()).expect("Failed to create Redis client");
    let conn = redis::aio::ConnectionManager::new(client)
        .await
        .expect("Failed to connect to Redis");
    let queue = RedisMediaStorageQueue::new(apalis_redis::RedisStorage::new(conn));

    let result = queue.enqueue_store(1).await;
    assert!(result.is_ok(), "Failed to queue job: {:?}", result.err());
}
