//! `ActivityPub` request handlers.

#![allow(missing_docs)]

mod actor;
mod collections;
mod webfinger;

use axum::{Router, routing::get};
use fedigram_db::repositories::{FollowerRepository, ProfileRepository};

use crate::urls::UrlConfig;

pub use actor::actor_handler;
pub use collections::{OrderedCollection, followers_handler};
pub use webfinger::{WebfingerLink, WebfingerResponse, webfinger_handler};

/// Content type of `ActivityPub` documents.
pub const ACTIVITY_JSON: &str = "application/activity+json; charset=utf-8";

/// State shared by the federation handlers.
#[derive(Clone)]
pub struct FederationState {
    pub profile_repo: ProfileRepository,
    pub follower_repo: FollowerRepository,
    pub url_config: UrlConfig,
}

impl FederationState {
    /// Create a new federation state.
    #[must_use]
    pub const fn new(
        profile_repo: ProfileRepository,
        follower_repo: FollowerRepository,
        url_config: UrlConfig,
    ) -> Self {
        Self {
            profile_repo,
            follower_repo,
            url_config,
        }
    }
}

/// Routes served at the instance root.
pub fn router(state: FederationState) -> Router {
    Router::new()
        .route("/users/{username}", get(actor_handler))
        .route("/users/{username}/followers", get(followers_handler))
        .route("/.well-known/webfinger", get(webfinger_handler))
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::sync::Arc;

    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

    use super::*;
    use crate::urls::tests::config;

    pub fn state_with(db: MockDatabase) -> FederationState {
        let db: Arc<DatabaseConnection> = Arc::new(db.into_connection());
        FederationState::new(
            ProfileRepository::new(Arc::clone(&db)),
            FollowerRepository::new(db),
            config(),
        )
    }

    pub fn empty_db() -> MockDatabase {
        MockDatabase::new(DatabaseBackend::Postgres)
    }
}
