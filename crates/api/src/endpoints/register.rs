//! Sign-up endpoints.

use axum::{
    Form, Router,
    extract::State,
    response::Html,
    routing::get,
};
use fedigram_common::AppResult;
use fedigram_core::RegistrationForm;
use serde::Serialize;
use tracing::info;

use crate::{middleware::AppState, response::ApiResponse, views};

/// Registration response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredResponse {
    pub id: String,
    pub profile_id: String,
    pub username: String,
    /// Bearer token; the new account is signed in with it.
    pub token: String,
}

/// GET /register
async fn show_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    state.registration_service.ensure_form_available().await?;
    Ok(views::register_form(
        &state.instance_name,
        state.registration_service.policy(),
    ))
}

/// POST /register
async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegistrationForm>,
) -> AppResult<ApiResponse<RegisteredResponse>> {
    info!(username = %form.username, "Registration attempt");
    let registered = state.registration_service.register(form).await?;

    Ok(ApiResponse::created(RegisteredResponse {
        id: registered.user.id.to_string(),
        profile_id: registered.profile.id.to_string(),
        username: registered.user.username,
        token: registered.token,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/register", get(show_form).post(register))
}
