//! Media storage worker.

use apalis::prelude::*;
use fedigram_common::AppResult;
use fedigram_core::{MediaStorageService, StoreOutcome};
use tracing::{error, info};

use crate::jobs::MediaStorageJob;

/// Context for the media storage worker.
#[derive(Clone)]
pub struct MediaStorageContext {
    pub service: MediaStorageService,
}

impl MediaStorageContext {
    #[must_use]
    pub const fn new(service: MediaStorageService) -> Self {
        Self { service }
    }
}

/// Worker function for the media storage pipeline.
///
/// # Errors
/// Returns an error if the copy fails, so apalis can retry the job.
pub async fn media_storage_worker(
    job: MediaStorageJob,
    ctx: Data<MediaStorageContext>,
) -> Result<(), Error> {
    match process_media_storage(&job, &ctx).await {
        Ok(_) => Ok(()),
        Err(e) => {
            error!(media_id = job.media_id, error = %e, "Failed to store media");
            let e: Box<dyn std::error::Error + Send + Sync> = Box::new(e);
            Err(Error::Failed(e.into()))
        }
    }
}

/// Run one job outside of apalis.
pub async fn process_media_storage(
    job: &MediaStorageJob,
    ctx: &MediaStorageContext,
) -> AppResult<StoreOutcome> {
    let outcome = ctx.service.store(job.media_id).await?;
    match &outcome {
        StoreOutcome::Stored { cdn_url } => {
            info!(media_id = job.media_id, cdn_url = %cdn_url, "Media stored");
        }
        other => info!(media_id = job.media_id, outcome = ?other, "Media storage skipped"),
    }
    Ok(outcome)
}
