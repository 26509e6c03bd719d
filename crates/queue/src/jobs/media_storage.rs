//! Cloud media storage job.

use serde::{Deserialize, Serialize};

/// Worker name of the media storage pipeline.
pub const MEDIA_STORAGE_QUEUE: &str = "media-storage";

/// Copy one uploaded media file to cloud storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaStorageJob {
    pub media_id: i64,
}

impl MediaStorageJob {
    #[must_use]
    pub const fn new(media_id: i64) -> Self {
        Self { media_id }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_job_payload_shape() {
        let job = MediaStorageJob::new(42);
        assert_eq!(
            serde_json::to_value(job).unwrap(),
            serde_json::json!({ "media_id": 42 })
        );
    }
}
