//! Redis-backed media storage queue.

use apalis::prelude::*;
use async_trait::async_trait;
use fedigram_common::{AppError, AppResult};
use fedigram_core::MediaStorageQueue;

use crate::jobs::MediaStorageJob;

/// Pushes [`MediaStorageJob`]s to Redis for the media storage worker.
#[derive(Clone)]
pub struct RedisMediaStorageQueue {
    storage: apalis_redis::RedisStorage<MediaStorageJob>,
}

impl RedisMediaStorageQueue {
    #[must_use]
    pub const fn new(storage: apalis_redis::RedisStorage<MediaStorageJob>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl MediaStorageQueue for RedisMediaStorageQueue {
    async fn enqueue_store(&self, media_id: i64) -> AppResult<()> {
        self.storage
            .clone()
            .push(MediaStorageJob::new(media_id))
            .await
            .map_err(|e| AppError::Internal(format!("Failed to queue job: {e}")))?;

        tracing::debug!(media_id, "Queued media storage job");
        Ok(())
    }
}
