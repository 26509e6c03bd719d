//! `WebFinger` handler for actor discovery.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::FederationState;
use crate::urls::ProfileUrls;

/// `WebFinger` query parameters.
#[derive(Debug, Deserialize)]
pub struct WebfingerQuery {
    pub resource: String,
}

/// `WebFinger` response.
#[derive(Debug, Serialize)]
pub struct WebfingerResponse {
    pub subject: String,
    pub aliases: Vec<String>,
    pub links: Vec<WebfingerLink>,
}

/// `WebFinger` link.
#[derive(Debug, Serialize)]
pub struct WebfingerLink {
    pub rel: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
    pub href: String,
}

/// Split `acct:user@host` into its parts.
fn parse_acct(resource: &str) -> Option<(&str, &str)> {
    let acct = resource.strip_prefix("acct:").unwrap_or(resource);
    let (username, host) = acct.split_once('@')?;
    if username.is_empty() || host.is_empty() || host.contains('@') {
        return None;
    }
    Some((username, host))
}

/// Handle `GET /.well-known/webfinger?resource=acct:user@host`.
pub async fn webfinger_handler(
    State(state): State<FederationState>,
    Query(query): Query<WebfingerQuery>,
) -> impl IntoResponse {
    info!(resource = %query.resource, "WebFinger lookup");

    let Some((username, host)) = parse_acct(&query.resource) else {
        return (StatusCode::BAD_REQUEST, "Invalid resource format").into_response();
    };

    if !host.eq_ignore_ascii_case(state.url_config.host()) {
        return (StatusCode::NOT_FOUND, "Unknown domain").into_response();
    }

    let profile = match state.profile_repo.find_local_by_username(username).await {
        Ok(Some(p)) => p,
        Ok(None) => return (StatusCode::NOT_FOUND, "Profile not found").into_response(),
        Err(e) => {
            warn!(error = %e, "Database error during WebFinger lookup");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response();
        }
    };

    let config = &state.url_config;
    let response = WebfingerResponse {
        subject: format!("acct:{}", profile.acct(config)),
        aliases: vec![profile.url(config, ""), profile.permalink(config, "")],
        links: vec![
            WebfingerLink {
                rel: "http://webfinger.net/rel/profile-page".to_string(),
                link_type: Some("text/html".to_string()),
                href: profile.url(config, ""),
            },
            WebfingerLink {
                rel: "self".to_string(),
                link_type: Some("application/activity+json".to_string()),
                href: profile.permalink(config, ""),
            },
        ],
    };

    (
        StatusCode::OK,
        [("Content-Type", "application/jrd+json; charset=utf-8")],
        Json(response),
    )
        .into_response()
}
