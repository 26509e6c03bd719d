//! Counter cache backed by Redis.
//!
//! Follower and following counts are expensive to recompute, so the profile
//! service keeps them in Redis for a long time and refreshes on a miss.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fred::clients::Client as RedisClient;
use fred::interfaces::KeysInterface;
use fred::types::Expiration;
use tracing::debug;

use crate::{AppError, AppResult};

/// Key/value store for integer counters with expiry.
#[async_trait]
pub trait CounterCache: Send + Sync {
    /// Fetch a cached counter.
    async fn get(&self, key: &str) -> AppResult<Option<u64>>;

    /// Store a counter for `ttl_secs` seconds.
    async fn set(&self, key: &str, value: u64, ttl_secs: i64) -> AppResult<()>;

    /// Drop a cached counter.
    async fn forget(&self, key: &str) -> AppResult<()>;
}

/// Redis implementation using the shared fred client.
#[derive(Clone)]
pub struct RedisCounterCache {
    redis: Arc<RedisClient>,
    prefix: String,
}

impl RedisCounterCache {
    /// Create a cache that namespaces every key with `prefix`.
    #[must_use]
    pub fn new(redis: Arc<RedisClient>, prefix: impl Into<String>) -> Self {
        Self {
            redis,
            prefix: prefix.into(),
        }
    }

    fn full_key(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}:{key}", self.prefix)
        }
    }
}

#[async_trait]
impl CounterCache for RedisCounterCache {
    async fn get(&self, key: &str) -> AppResult<Option<u64>> {
        let value: Option<String> = self
            .redis
            .get(self.full_key(key))
            .await
            .map_err(|e| AppError::Redis(e.to_string()))?;

        let parsed = value.and_then(|v| v.parse::<u64>().ok());
        debug!(key = %key, hit = parsed.is_some(), "Counter cache lookup");
        Ok(parsed)
    }

    async fn set(&self, key: &str, value: u64, ttl_secs: i64) -> AppResult<()> {
        self.redis
            .set::<(), _, _>(
                self.full_key(key),
                value.to_string(),
                Some(Expiration::EX(ttl_secs)),
                None,
                false,
            )
            .await
            .map_err(|e| AppError::Redis(e.to_string()))
    }

    async fn forget(&self, key: &str) -> AppResult<()> {
        self.redis
            .del::<(), _>(self.full_key(key))
            .await
            .map_err(|e| AppError::Redis(e.to_string()))
    }
}

/// Cache that never stores anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCounterCache;

#[async_trait]
impl CounterCache for NoOpCounterCache {
    async fn get(&self, _key: &str) -> AppResult<Option<u64>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: u64, _ttl_secs: i64) -> AppResult<()> {
        Ok(())
    }

    async fn forget(&self, _key: &str) -> AppResult<()> {
        Ok(())
    }
}

/// Process-local cache, ignoring expiry. Used in tests and single-node setups.
#[derive(Debug, Clone, Default)]
pub struct MemoryCounterCache {
    entries: Arc<Mutex<HashMap<String, u64>>>,
}

impl MemoryCounterCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, u64>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl CounterCache for MemoryCounterCache {
    async fn get(&self, key: &str) -> AppResult<Option<u64>> {
        Ok(self.lock().get(key).copied())
    }

    async fn set(&self, key: &str, value: u64, _ttl_secs: i64) -> AppResult<()> {
        self.lock().insert(key.to_string(), value);
        Ok(())
    }

    async fn forget(&self, key: &str) -> AppResult<()> {
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_cache_never_hits() {
        let cache = NoOpCounterCache;
        cache.set("profile:follower_count:1", 5, 60).await.unwrap();
        assert_eq!(cache.get("profile:follower_count:1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_cache_set_get_forget() {
        let cache = MemoryCounterCache::new();
        cache.set("profile:following_count:9", 12, 60).await.unwrap();
        assert_eq!(cache.get("profile:following_count:9").await.unwrap(), Some(12));

        cache.forget("profile:following_count:9").await.unwrap();
        assert_eq!(cache.get("profile:following_count:9").await.unwrap(), None);
    }
}
