//! Job workers.

mod media_storage;

pub use media_storage::{MediaStorageContext, media_storage_worker, process_media_storage};
