//! Mute and block endpoints.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use fedigram_common::AppResult;
use fedigram_core::normalize_domain;
use fedigram_db::entities::{user, user_filter::FilterType};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, parse_id},
    middleware::AppState,
    response::ApiResponse,
};

/// Profile filter request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFilterRequest {
    pub profile_id: String,
}

/// Instance filter request.
#[derive(Debug, Deserialize)]
pub struct InstanceFilterRequest {
    pub domain: String,
}

/// Profiles and instances filtered by the current user.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredResponse {
    pub ids: Vec<String>,
    pub urls: Vec<String>,
    pub instances: Vec<String>,
}

/// Outcome of a filter change.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterChangeResponse {
    pub filterable: String,
    pub filter_type: FilterType,
    pub active: bool,
}

async fn set_profile_filter(
    state: &AppState,
    user: &user::Model,
    req: &ProfileFilterRequest,
    filter_type: FilterType,
    active: bool,
) -> AppResult<ApiResponse<FilterChangeResponse>> {
    let target_id = parse_id("profileId", &req.profile_id)?;
    if active {
        state
            .user_filter_service
            .filter_profile(user, target_id, filter_type)
            .await?;
    } else {
        state
            .user_filter_service
            .unfilter_profile(user, target_id, filter_type)
            .await?;
    }
    Ok(ApiResponse::ok(FilterChangeResponse {
        filterable: target_id.to_string(),
        filter_type,
        active,
    }))
}

async fn set_instance_filter(
    state: &AppState,
    user: &user::Model,
    req: &InstanceFilterRequest,
    filter_type: FilterType,
    active: bool,
) -> AppResult<ApiResponse<FilterChangeResponse>> {
    let domain = normalize_domain(&req.domain)?;
    if active {
        state
            .user_filter_service
            .filter_instance(user, &domain, filter_type)
            .await?;
    } else {
        state
            .user_filter_service
            .unfilter_instance(user, &domain, filter_type)
            .await?;
    }
    Ok(ApiResponse::ok(FilterChangeResponse {
        filterable: domain,
        filter_type,
        active,
    }))
}

async fn mute(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ProfileFilterRequest>,
) -> AppResult<ApiResponse<FilterChangeResponse>> {
    set_profile_filter(&state, &user, &req, FilterType::Mute, true).await
}

async fn unmute(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ProfileFilterRequest>,
) -> AppResult<ApiResponse<FilterChangeResponse>> {
    set_profile_filter(&state, &user, &req, FilterType::Mute, false).await
}

async fn block(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ProfileFilterRequest>,
) -> AppResult<ApiResponse<FilterChangeResponse>> {
    set_profile_filter(&state, &user, &req, FilterType::Block, true).await
}

async fn unblock(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ProfileFilterRequest>,
) -> AppResult<ApiResponse<FilterChangeResponse>> {
    set_profile_filter(&state, &user, &req, FilterType::Block, false).await
}

async fn mute_instance(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<InstanceFilterRequest>,
) -> AppResult<ApiResponse<FilterChangeResponse>> {
    set_instance_filter(&state, &user, &req, FilterType::Mute, true).await
}

async fn unmute_instance(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<InstanceFilterRequest>,
) -> AppResult<ApiResponse<FilterChangeResponse>> {
    set_instance_filter(&state, &user, &req, FilterType::Mute, false).await
}

async fn block_instance(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<InstanceFilterRequest>,
) -> AppResult<ApiResponse<FilterChangeResponse>> {
    set_instance_filter(&state, &user, &req, FilterType::Block, true).await
}

async fn unblock_instance(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<InstanceFilterRequest>,
) -> AppResult<ApiResponse<FilterChangeResponse>> {
    set_instance_filter(&state, &user, &req, FilterType::Block, false).await
}

async fn filtered(
    state: &AppState,
    user: &user::Model,
    filter_type: FilterType,
) -> AppResult<ApiResponse<FilteredResponse>> {
    let profile = state.user_service.profile_of(user).await?;
    let profiles = &state.profile_service;
    let (ids, urls) = match filter_type {
        FilterType::Mute => (
            profiles.muted_ids(&profile).await?,
            profiles.muted_profile_urls(&profile).await?,
        ),
        FilterType::Block => (
            profiles.blocked_ids(&profile).await?,
            profiles.blocked_profile_urls(&profile).await?,
        ),
    };
    let instances = state
        .user_filter_service
        .filtered_instances(user, filter_type)
        .await?;

    Ok(ApiResponse::ok(FilteredResponse {
        ids: ids.iter().map(ToString::to_string).collect(),
        urls,
        instances,
    }))
}

/// GET /api/filters/muted
async fn muted(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<FilteredResponse>> {
    filtered(&state, &user, FilterType::Mute).await
}

/// GET /api/filters/blocked
async fn blocked(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<FilteredResponse>> {
    filtered(&state, &user, FilterType::Block).await
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/mute", post(mute))
        .route("/unmute", post(unmute))
        .route("/block", post(block))
        .route("/unblock", post(unblock))
        .route("/muted", get(muted))
        .route("/blocked", get(blocked))
        .route("/instances/mute", post(mute_instance))
        .route("/instances/unmute", post(unmute_instance))
        .route("/instances/block", post(block_instance))
        .route("/instances/unblock", post(unblock_instance))
}
