//! Admin endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, patch, post},
};
use fedigram_common::AppResult;
use fedigram_core::CreateModLogInput;
use fedigram_db::entities::mod_log;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, parse_id},
    middleware::AppState,
    response::{ApiResponse, no_content},
};

/// Mod log listing query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListModLogsQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
}

const fn default_limit() -> u64 {
    30
}

/// Mod log deletion query.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteModLogQuery {
    /// Remove the entry for good instead of soft-deleting it.
    #[serde(default)]
    pub force: bool,
}

/// Mod log message update.
#[derive(Debug, Deserialize)]
pub struct UpdateModLogRequest {
    pub message: Option<String>,
}

/// Mod log response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModLogResponse {
    pub id: String,
    pub user_id: String,
    pub user_username: Option<String>,
    pub action: String,
    pub message: Option<String>,
    pub object_uid: Option<String>,
    pub object_id: Option<String>,
    pub object_type: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub access_level: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<mod_log::Model> for ModLogResponse {
    fn from(m: mod_log::Model) -> Self {
        Self {
            id: m.id.to_string(),
            user_id: m.user_id.to_string(),
            user_username: m.user_username,
            action: m.action,
            message: m.message,
            object_uid: m.object_uid.map(|id| id.to_string()),
            object_id: m.object_id.map(|id| id.to_string()),
            object_type: m.object_type,
            metadata: m.metadata,
            access_level: m.access_level,
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// GET /api/admin/modlogs
async fn list_modlogs(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListModLogsQuery>,
) -> AppResult<ApiResponse<Vec<ModLogResponse>>> {
    let until_id = query
        .until_id
        .as_deref()
        .map(|id| parse_id("untilId", id))
        .transpose()?;
    let logs = state
        .mod_log_service
        .list(&user, query.limit.clamp(1, 100), until_id)
        .await?;
    Ok(ApiResponse::ok(logs.into_iter().map(Into::into).collect()))
}

/// POST /api/admin/modlogs
async fn create_modlog(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateModLogInput>,
) -> AppResult<ApiResponse<ModLogResponse>> {
    let log = state.mod_log_service.create(&user, input).await?;
    Ok(ApiResponse::created(log.into()))
}

/// PATCH /api/admin/modlogs/{id}
async fn update_modlog(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateModLogRequest>,
) -> AppResult<ApiResponse<ModLogResponse>> {
    let id = parse_id("id", &id)?;
    let log = state
        .mod_log_service
        .update_message(&user, id, req.message)
        .await?;
    Ok(ApiResponse::ok(log.into()))
}

/// DELETE /api/admin/modlogs/{id}
async fn delete_modlog(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DeleteModLogQuery>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id("id", &id)?;
    if query.force {
        state.mod_log_service.force_delete(&user, id).await?;
    } else {
        state.mod_log_service.delete(&user, id).await?;
    }
    Ok(no_content())
}

/// POST /api/admin/modlogs/{id}/restore
async fn restore_modlog(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ModLogResponse>> {
    let id = parse_id("id", &id)?;
    let log = state.mod_log_service.restore(&user, id).await?;
    Ok(ApiResponse::ok(log.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/modlogs", get(list_modlogs).post(create_modlog))
        .route(
            "/modlogs/{id}",
            patch(update_modlog).delete(delete_modlog),
        )
        .route("/modlogs/{id}/restore", post(restore_modlog))
}
