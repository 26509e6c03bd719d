//! API endpoints.

mod admin;
mod deck;
mod filters;
mod media;
mod profiles;
mod register;
mod settings;
mod statuses;

use axum::Router;

use crate::middleware::AppState;

/// JSON API, mounted under `/api`.
pub fn api_router(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .nest("/media", media::router(max_upload_size))
        .nest("/statuses", statuses::router())
        .nest("/profiles", profiles::router())
        .nest("/filters", filters::router())
        .nest("/settings", settings::router())
        .nest("/admin", admin::router())
}

/// Browser-facing pages served at the instance root.
pub fn web_router() -> Router<AppState> {
    Router::new()
        .merge(register::router())
        .merge(deck::router())
}
