//! Common utilities and shared types for fedigram.
//!
//! This crate provides foundational components used across all fedigram crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Cryptography**: RSA key generation for `ActivityPub` actors
//! - **ID Generation**: Snowflake identifiers via [`IdGenerator`]
//! - **Storage**: File storage backends (local, S3-compatible)
//! - **Counter cache**: Redis-backed caching for profile counters
//!
//! # Example
//!
//! ```no_run
//! use fedigram_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new(config.server.worker_id);
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod crypto;
pub mod error;
pub mod id;
pub mod storage;

pub use cache::{CounterCache, MemoryCounterCache, NoOpCounterCache, RedisCounterCache};
pub use config::Config;
pub use crypto::{RsaKeypair, generate_rsa_keypair};
pub use error::{AppError, AppResult, FieldErrors};
pub use id::IdGenerator;
pub use storage::{
    LocalStorage, StorageBackend, StorageConfig, UploadedFile, generate_storage_key, open_backend,
};
