//! Audience resolution and shared-inbox fan-out.

use std::collections::HashSet;

use fedigram_db::entities::profile;
use serde::Serialize;

use crate::urls::{ProfileUrls, UrlConfig};

pub use fedigram_db::entities::status::Scope;

/// The `ActivityStreams` public collection.
pub const PUBLIC_COLLECTION: &str = "https://www.w3.org/ns/activitystreams#Public";

/// `to`/`cc` recipients of an activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Audience {
    /// Primary recipients.
    pub to: Vec<String>,
    /// Secondary recipients.
    pub cc: Vec<String>,
}

impl Audience {
    /// Whether nobody is addressed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to.is_empty() && self.cc.is_empty()
    }
}

/// Scope used when the caller does not pick one.
#[must_use]
pub const fn default_scope(profile: &profile::Model) -> Scope {
    if profile.is_private {
        Scope::Private
    } else {
        Scope::Public
    }
}

/// Recipients of an activity authored by `profile`.
///
/// Remote profiles never author activities here, so they get nobody.
/// Only the public scope addresses anyone.
#[must_use]
pub fn audience(profile: &profile::Model, scope: Option<Scope>, config: &UrlConfig) -> Audience {
    if !profile.is_local() {
        return Audience::default();
    }

    match scope.unwrap_or_else(|| default_scope(profile)) {
        Scope::Public => Audience {
            to: vec![PUBLIC_COLLECTION.to_string()],
            cc: vec![profile.permalink(config, "/followers")],
        },
        Scope::Unlisted | Scope::Private | Scope::Direct => Audience::default(),
    }
}

/// Distinct delivery targets for a set of remote followers.
///
/// Each follower contributes its shared inbox, or its personal inbox when it
/// has none. Order follows first appearance; followers with neither are skipped.
#[must_use]
pub fn fanout_inboxes(followers: &[profile::Model]) -> Vec<String> {
    let mut seen = HashSet::new();
    followers
        .iter()
        .filter_map(|f| f.shared_inbox.as_ref().or(f.inbox_url.as_ref()))
        .filter(|inbox| seen.insert(inbox.as_str()))
        .cloned()
        .collect()
}
