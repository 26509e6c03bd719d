//! Status lookups needed by the media and context endpoints.

use fedigram_common::AppResult;
use fedigram_db::{
    entities::{media_tag, status},
    repositories::{MediaTagRepository, StatusRepository},
};
use serde::Serialize;

/// Thread context of a status. Threads are not modelled, so both sides are
/// always empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusContext {
    pub ancestors: Vec<serde_json::Value>,
    pub descendants: Vec<serde_json::Value>,
}

/// Status service.
#[derive(Clone)]
pub struct StatusService {
    status_repo: StatusRepository,
    media_tag_repo: MediaTagRepository,
}

impl StatusService {
    #[must_use]
    pub const fn new(status_repo: StatusRepository, media_tag_repo: MediaTagRepository) -> Self {
        Self {
            status_repo,
            media_tag_repo,
        }
    }

    pub async fn get(&self, id: i64) -> AppResult<status::Model> {
        self.status_repo.get_by_id(id).await
    }

    /// Context of an existing status.
    pub async fn context(&self, id: i64) -> AppResult<StatusContext> {
        self.status_repo.get_by_id(id).await?;
        Ok(StatusContext::default())
    }

    /// Profiles tagged in the media of a status.
    pub async fn media_tags(&self, id: i64) -> AppResult<Vec<media_tag::Model>> {
        self.media_tag_repo.find_by_status(id).await
    }
}
