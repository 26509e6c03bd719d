//! Media endpoints.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    routing::{get, post},
};
use fedigram_common::{AppError, AppResult};
use fedigram_core::{MediaRepresentation, UploadMediaInput};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::info;

use crate::{extractors::AuthUser, middleware::AppState};

// Room for the multipart framing around the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart field: {e}")))
}

/// POST /api/media
async fn upload(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<MediaRepresentation>> {
    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut description = None;
    let mut license = None;
    let mut is_nsfw = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart data: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {e}")))?;
                file = Some((filename, content_type, data.to_vec()));
            }
            "description" => {
                description = Some(read_text(field).await?).filter(|d| !d.trim().is_empty());
            }
            "license" => {
                license = Some(read_text(field).await?).filter(|l| !l.trim().is_empty());
            }
            "is_nsfw" | "sensitive" => is_nsfw = truthy(&read_text(field).await?),
            _ => {}
        }
    }

    let (filename, content_type, data) =
        file.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;
    let owner = state.user_service.profile_of(&user).await?;

    let media = state
        .media_service
        .upload(
            &owner,
            UploadMediaInput {
                filename,
                content_type,
                data,
                description,
                license,
                is_nsfw,
            },
        )
        .await?;
    info!(media_id = media.id, profile_id = owner.id, "Media uploaded");

    Ok(Json(state.media_service.represent(&media)))
}

/// GET /api/media/{id}
async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MediaRepresentation>> {
    let media = state.media_service.get(id).await?;
    Ok(Json(state.media_service.represent(&media)))
}

pub fn router(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(upload)
                .layer::<_, std::convert::Infallible>(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(
                    max_upload_size.saturating_add(MULTIPART_OVERHEAD),
                )),
        )
        .route("/{id}", get(show))
}
