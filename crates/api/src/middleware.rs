//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use fedigram_core::{
    MediaService, ModLogService, ProfileService, RegistrationService, StatusService,
    UserFilterService, UserService,
};
use tracing::debug;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub registration_service: RegistrationService,
    pub profile_service: ProfileService,
    pub user_filter_service: UserFilterService,
    pub media_service: MediaService,
    pub status_service: StatusService,
    pub mod_log_service: ModLogService,
    pub instance_name: String,
}

fn bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

/// Authentication middleware.
///
/// Attaches the user owning a valid bearer token to the request; handlers
/// decide whether a user is required.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(&req).map(ToOwned::to_owned) {
        match state.user_service.authenticate_by_token(&token).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) => debug!(error = %e, "Bearer token rejected"),
        }
    }

    next.run(req).await
}
