//! Job definitions.

#![allow(missing_docs)]

mod media_storage;

pub use media_storage::{MEDIA_STORAGE_QUEUE, MediaStorageJob};
