//! Status endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use fedigram_common::AppResult;
use fedigram_core::{MediaRepresentation, StatusContext};
use serde::Serialize;

use crate::middleware::AppState;

/// A profile tagged in one of the status' media.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaTagResponse {
    pub media_id: String,
    pub profile_id: String,
}

/// GET /api/statuses/{id}/context
async fn context(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<StatusContext>> {
    Ok(Json(state.status_service.context(id).await?))
}

/// GET /api/statuses/{id}/media
async fn media(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<MediaRepresentation>>> {
    state.status_service.get(id).await?;
    let media = state.media_service.find_by_status(id).await?;
    Ok(Json(
        media
            .iter()
            .map(|m| state.media_service.represent(m))
            .collect(),
    ))
}

/// GET /api/statuses/{id}/media-tags
async fn media_tags(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<MediaTagResponse>>> {
    let tags = state.status_service.media_tags(id).await?;
    Ok(Json(
        tags.into_iter()
            .map(|t| MediaTagResponse {
                media_id: t.media_id.to_string(),
                profile_id: t.profile_id.to_string(),
            })
            .collect(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/context", get(context))
        .route("/{id}/media", get(media))
        .route("/{id}/media-tags", get(media_tags))
}
