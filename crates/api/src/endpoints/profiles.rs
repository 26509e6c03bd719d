//! Profile endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use fedigram_common::AppResult;
use fedigram_db::entities::profile;
use fedigram_federation::{ProfileUrls, UrlConfig};
use serde::Serialize;

use crate::{extractors::MaybeAuthUser, middleware::AppState, response::ApiResponse};

/// Relationship between the viewer and a profile.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipResponse {
    pub following: bool,
    pub followed_by: bool,
}

/// Profile response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub username: String,
    pub acct: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub url: String,
    pub avatar: String,
    pub is_private: bool,
    pub followers_count: u64,
    pub following_count: u64,
    pub followers_count_short: String,
    pub following_count_short: String,
    pub statuses_count: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<RelationshipResponse>,
}

impl ProfileResponse {
    fn new(profile: &profile::Model, urls: &UrlConfig, followers: u64, following: u64) -> Self {
        Self {
            id: profile.id.to_string(),
            username: profile.username.clone(),
            acct: profile.acct(urls),
            name: profile.name.clone(),
            bio: profile.bio.clone(),
            url: profile.url(urls, ""),
            avatar: profile.avatar(urls),
            is_private: profile.is_private,
            followers_count: followers,
            following_count: following,
            followers_count_short: fedigram_core::format_count_short(followers),
            following_count_short: fedigram_core::format_count_short(following),
            statuses_count: profile.status_count,
            relationship: None,
        }
    }
}

/// GET /api/profiles/{username}
async fn show(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let profiles = &state.profile_service;
    let profile = profiles.get_local_by_username(&username.to_lowercase()).await?;

    let followers = profiles.follower_count(&profile).await?;
    let following = profiles.following_count(&profile).await?;
    let mut response = ProfileResponse::new(&profile, profiles.urls(), followers, following);

    if let Some(viewer) = viewer {
        let own = state.user_service.profile_of(&viewer).await?;
        if own.id != profile.id {
            response.relationship = Some(RelationshipResponse {
                following: profiles.follows(&own, &profile).await?,
                followed_by: profiles.followed_by(&own, &profile).await?,
            });
        }
    }

    Ok(ApiResponse::ok(response))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/{username}", get(show))
}
