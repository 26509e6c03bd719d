//! Deck pages for signed-in users.

use axum::{Router, extract::State, response::Html, routing::get};
use fedigram_common::AppResult;
use fedigram_federation::ProfileUrls;

use crate::{extractors::AuthUser, middleware::AppState, views};

/// GET /deck
async fn deck(AuthUser(user): AuthUser, State(state): State<AppState>) -> AppResult<Html<String>> {
    let profile = state.user_service.profile_of(&user).await?;
    let muted = state.profile_service.muted_ids(&profile).await?;
    let blocked = state.profile_service.blocked_ids(&profile).await?;
    let urls = state.profile_service.urls();

    let body = format!(
        "<h1>Deck</h1>\n<p><a href=\"{url}\">@{acct}</a></p>\n{stats}\n\
         <p><a href=\"/deck/insights\">Insights</a></p>",
        url = views::escape(&profile.url(urls, "")),
        acct = views::escape(&profile.acct(urls)),
        stats = views::stat_list(&[
            ("Muted accounts", muted.len().to_string()),
            ("Blocked accounts", blocked.len().to_string()),
        ]),
    );
    Ok(views::page(&state.instance_name, "Deck", &body))
}

/// GET /deck/insights
async fn insights(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Html<String>> {
    let profile = state.user_service.profile_of(&user).await?;
    let followers = state.profile_service.follower_count_short(&profile).await?;
    let following = state.profile_service.following_count_short(&profile).await?;
    let filed = state.profile_service.reports(&profile).await?;
    let received = state.profile_service.reported(&profile).await?;

    let body = format!(
        "<h1>Insights</h1>\n{}",
        views::stat_list(&[
            ("Followers", followers),
            ("Following", following),
            ("Reports filed", filed.len().to_string()),
            ("Reports received", received.len().to_string()),
        ])
    );
    Ok(views::page(&state.instance_name, "Insights", &body))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/deck", get(deck))
        .route("/deck/insights", get(insights))
}
