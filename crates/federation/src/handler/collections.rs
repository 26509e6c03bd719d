//! `ActivityPub` collection summaries.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Serialize;
use tracing::{error, info};

use super::{ACTIVITY_JSON, FederationState};
use crate::urls::ProfileUrls;

/// `ActivityPub` `OrderedCollection` without items.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderedCollection {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub total_items: u64,
}

/// Handle GET /users/{username}/followers.
pub async fn followers_handler(
    State(state): State<FederationState>,
    Path(username): Path<String>,
) -> impl IntoResponse {
    info!(username = %username, "ActivityPub followers lookup");

    let profile = match state.profile_repo.find_local_by_username(&username).await {
        Ok(Some(p)) => p,
        Ok(None) => return (StatusCode::NOT_FOUND, "Profile not found").into_response(),
        Err(e) => {
            error!(error = %e, "Failed to fetch profile");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response();
        }
    };

    let total_items = match state.follower_repo.count_followers(profile.id).await {
        Ok(count) => count,
        Err(e) => {
            error!(error = %e, profile_id = profile.id, "Failed to count followers");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response();
        }
    };

    let collection = OrderedCollection {
        context: "https://www.w3.org/ns/activitystreams".to_string(),
        kind: "OrderedCollection".to_string(),
        id: profile.permalink(&state.url_config, "/followers"),
        total_items,
    };

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, ACTIVITY_JSON)],
        Json(collection),
    )
        .into_response()
}
