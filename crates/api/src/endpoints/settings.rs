//! Account settings endpoints.

use axum::{Json, Router, extract::State, routing::patch};
use fedigram_common::AppResult;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Count visibility update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountVisibilityRequest {
    pub show_follower_count: Option<bool>,
    pub show_following_count: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountVisibilityResponse {
    pub show_follower_count: bool,
    pub show_following_count: bool,
}

/// PATCH /api/settings/counts
async fn update_counts(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CountVisibilityRequest>,
) -> AppResult<ApiResponse<CountVisibilityResponse>> {
    let profile = state.user_service.profile_of(&user).await?;
    let user = state
        .user_service
        .update_count_visibility(user, req.show_follower_count, req.show_following_count)
        .await?;
    // Cached counters were computed under the old visibility.
    state.profile_service.forget_counts(profile.id).await?;

    Ok(ApiResponse::ok(CountVisibilityResponse {
        show_follower_count: user.show_profile_follower_count,
        show_following_count: user.show_profile_following_count,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/counts", patch(update_counts))
}
