//! Snowflake ID generation.
//!
//! Ids are 63-bit positive integers laid out as
//! `[41 bits ms since EPOCH][10 bits worker][12 bits sequence]`,
//! so they sort by creation time across workers.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

/// Custom epoch (2018-06-01T00:00:00Z) in milliseconds.
pub const EPOCH_MS: i64 = 1_527_811_200_000;

const WORKER_BITS: u32 = 10;
const SEQUENCE_BITS: u32 = 12;
const MAX_WORKER_ID: u16 = (1 << WORKER_BITS) - 1;
const MAX_SEQUENCE: u16 = (1 << SEQUENCE_BITS) - 1;

#[derive(Debug, Default)]
struct SnowflakeState {
    last_ms: i64,
    sequence: u16,
}

/// ID generator for entities.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    worker_id: u16,
    state: Arc<Mutex<SnowflakeState>>,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}

impl IdGenerator {
    /// Create a new ID generator for the given worker. Worker ids wrap at 1024.
    #[must_use]
    pub fn new(worker_id: u16) -> Self {
        Self {
            worker_id: worker_id & MAX_WORKER_ID,
            state: Arc::new(Mutex::new(SnowflakeState::default())),
        }
    }

    /// Generate a new snowflake id.
    #[must_use]
    pub fn generate(&self) -> i64 {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        // A clock that steps backwards keeps issuing from the last timestamp.
        let mut now = (Utc::now().timestamp_millis() - EPOCH_MS).max(state.last_ms);

        if now == state.last_ms {
            if state.sequence == MAX_SEQUENCE {
                while now <= state.last_ms {
                    std::hint::spin_loop();
                    now = Utc::now().timestamp_millis() - EPOCH_MS;
                }
                state.sequence = 0;
            } else {
                state.sequence += 1;
            }
        } else {
            state.sequence = 0;
        }
        state.last_ms = now;

        compose(now, self.worker_id, state.sequence)
    }

    /// Generate a cryptographically secure random token.
    #[must_use]
    pub fn generate_token(&self) -> String {
        // No time component for tokens
        Uuid::new_v4().simple().to_string()
    }

    /// Worker id embedded in generated ids.
    #[must_use]
    pub const fn worker_id(&self) -> u16 {
        self.worker_id
    }
}

const fn compose(ms: i64, worker_id: u16, sequence: u16) -> i64 {
    (ms << (WORKER_BITS + SEQUENCE_BITS))
        | ((worker_id as i64) << SEQUENCE_BITS)
        | sequence as i64
}

/// Split a snowflake into `(ms since EPOCH, worker, sequence)`.
#[must_use]
pub const fn decompose(id: i64) -> (i64, u16, u16) {
    let ms = id >> (WORKER_BITS + SEQUENCE_BITS);
    let worker = ((id >> SEQUENCE_BITS) & MAX_WORKER_ID as i64) as u16;
    let sequence = (id & MAX_SEQUENCE as i64) as u16;
    (ms, worker, sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_is_positive_and_unique() {
        let id_gen = IdGenerator::new(1);
        let ids: HashSet<i64> = (0..10_000).map(|_| id_gen.generate()).collect();

        assert_eq!(ids.len(), 10_000);
        assert!(ids.iter().all(|id| *id > 0));
    }

    #[test]
    fn test_generate_is_monotonic() {
        let id_gen = IdGenerator::new(3);
        let mut previous = id_gen.generate();
        for _ in 0..5_000 {
            let next = id_gen.generate();
            assert!(next > previous);
            previous = next;
        }
    }

    #[test]
    fn test_worker_id_is_embedded() {
        let id_gen = IdGenerator::new(42);
        let (ms, worker, _) = decompose(id_gen.generate());

        assert_eq!(worker, 42);
        assert!(ms > 0);
    }

    #[test]
    fn test_worker_id_wraps() {
        assert_eq!(IdGenerator::new(1024 + 5).worker_id(), 5);
    }

    #[test]
    fn test_clones_share_sequence() {
        let a = IdGenerator::new(7);
        let b = a.clone();
        assert_ne!(a.generate(), b.generate());
    }

    #[test]
    fn test_generate_token() {
        let id_gen = IdGenerator::default();
        let token = id_gen.generate_token();

        assert_eq!(token.len(), 32); // Simple UUID without hyphens
    }
}
