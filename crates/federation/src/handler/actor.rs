//! `GET /users/{username}`.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use tracing::{error, info};

use super::{ACTIVITY_JSON, FederationState};
use crate::actor::to_ap_person;

/// Serve the Person document of a local profile.
pub async fn actor_handler(
    State(state): State<FederationState>,
    Path(username): Path<String>,
) -> impl IntoResponse {
    info!(username = %username, "ActivityPub actor lookup");

    let profile = match state.profile_repo.find_local_by_username(&username).await {
        Ok(Some(p)) => p,
        Ok(None) => {
            info!(username = %username, "Profile not found");
            return (StatusCode::NOT_FOUND, "Profile not found").into_response();
        }
        Err(e) => {
            error!(error = %e, "Failed to fetch profile");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response();
        }
    };

    let person = to_ap_person(&profile, &state.url_config);

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, ACTIVITY_JSON)],
        Json(person),
    )
        .into_response()
}
