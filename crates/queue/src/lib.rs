//! Background job queue for fedigram.
//!
//! Media uploads are copied to cloud storage by an apalis worker reading
//! from Redis. [`RedisMediaStorageQueue`] is the producer side handed to
//! the core `MediaService`.

pub mod jobs;
pub mod storage_queue;
pub mod workers;

pub use jobs::*;
pub use storage_queue::RedisMediaStorageQueue;
pub use workers::*;
