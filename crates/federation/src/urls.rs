//! Federation URL derivation for profiles.
//!
//! Remote profiles keep the URLs their origin server published; local
//! profiles derive everything from the instance base URL.

use fedigram_common::{AppError, AppResult};
use fedigram_db::entities::profile;
use url::Url;

/// Path of the avatar served when a profile has none.
pub const DEFAULT_AVATAR_PATH: &str = "/storage/avatars/default.jpg";

/// Instance URL settings used to build local URLs.
#[derive(Debug, Clone)]
pub struct UrlConfig {
    base_url: String,
    host: String,
}

impl UrlConfig {
    /// Build from the public base URL of this instance.
    pub fn new(base_url: &str) -> AppResult<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("Invalid server url {base_url}: {e}")))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| AppError::Config(format!("Server url {base_url} has no host")))?
            .to_string();

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            host,
        })
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Host name of this instance.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Absolute URL for a path on this instance.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// URL accessors over a profile.
pub trait ProfileUrls {
    /// Human-facing profile URL.
    fn url(&self, config: &UrlConfig, suffix: &str) -> String;

    /// Profile URL on this instance, even for remote profiles.
    fn local_url(&self, config: &UrlConfig, suffix: &str) -> String;

    /// Actor URI.
    fn permalink(&self, config: &UrlConfig, suffix: &str) -> String;

    /// `user@host` handle for local profiles, the stored handle for remote ones.
    fn acct(&self, config: &UrlConfig) -> String;

    /// Signing key id; remote profiles do not sign on our behalf.
    fn key_id(&self, config: &UrlConfig) -> Option<String>;

    /// Personal inbox.
    fn inbox_url(&self, config: &UrlConfig) -> String;

    /// Outbox.
    fn outbox_url(&self, config: &UrlConfig) -> String;

    /// Shared inbox, falling back to the personal inbox.
    fn shared_inbox_url(&self, config: &UrlConfig) -> String;

    /// Avatar URL, falling back to the instance default.
    fn avatar(&self, config: &UrlConfig) -> String;
}

impl ProfileUrls for profile::Model {
    fn url(&self, config: &UrlConfig, suffix: &str) -> String {
        self.remote_url
            .clone()
            .unwrap_or_else(|| self.local_url(config, suffix))
    }

    fn local_url(&self, config: &UrlConfig, suffix: &str) -> String {
        format!("{}/{}{suffix}", config.base_url(), self.username)
    }

    fn permalink(&self, config: &UrlConfig, suffix: &str) -> String {
        self.remote_url
            .clone()
            .unwrap_or_else(|| format!("{}/users/{}{suffix}", config.base_url(), self.username))
    }

    fn acct(&self, config: &UrlConfig) -> String {
        if self.is_local() {
            format!("{}@{}", self.username, config.host())
        } else {
            self.username.clone()
        }
    }

    fn key_id(&self, config: &UrlConfig) -> Option<String> {
        if self.is_local() {
            Some(self.permalink(config, "#main-key"))
        } else {
            None
        }
    }

    fn inbox_url(&self, config: &UrlConfig) -> String {
        self.inbox_url
            .clone()
            .unwrap_or_else(|| self.permalink(config, "/inbox"))
    }

    fn outbox_url(&self, config: &UrlConfig) -> String {
        self.outbox_url
            .clone()
            .unwrap_or_else(|| self.permalink(config, "/outbox"))
    }

    fn shared_inbox_url(&self, config: &UrlConfig) -> String {
        self.shared_inbox
            .clone()
            .unwrap_or_else(|| ProfileUrls::inbox_url(self, config))
    }

    fn avatar(&self, config: &UrlConfig) -> String {
        self.avatar_url
            .clone()
            .unwrap_or_else(|| config.url(DEFAULT_AVATAR_PATH))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;

    pub fn config() -> UrlConfig {
        UrlConfig::new("https://pix.example/").unwrap()
    }

    pub fn local_profile(id: i64, username: &str) -> profile::Model {
        profile::Model {
            id,
            user_id: Some(id),
            username: username.to_string(),
            name: None,
            bio: None,
            domain: None,
            is_private: false,
            following_count: 0,
            followers_count: 0,
            status_count: 0,
            remote_url: None,
            inbox_url: None,
            outbox_url: None,
            shared_inbox: None,
            public_key: Some("-----BEGIN PUBLIC KEY-----".to_string()),
            private_key: None,
            avatar_url: None,
            last_fetched_at: None,
            created_at: Utc::now().into(),
            updated_at: None,
            deleted_at: None,
        }
    }

    pub fn remote_profile(id: i64, handle: &str, domain: &str) -> profile::Model {
        profile::Model {
            user_id: None,
            domain: Some(domain.to_string()),
            remote_url: Some(format!("https://{domain}/users/{id}")),
            inbox_url: Some(format!("https://{domain}/users/{id}/inbox")),
            public_key: None,
            ..local_profile(id, handle)
        }
    }

    #[test]
    fn test_local_profile_urls() {
        let config = config();
        let alice = local_profile(1, "alice");

        assert_eq!(alice.url(&config, ""), "https://pix.example/alice");
        assert_eq!(alice.permalink(&config, ""), "https://pix.example/users/alice");
        assert_eq!(alice.acct(&config), "alice@pix.example");
        assert_eq!(
            alice.key_id(&config).as_deref(),
            Some("https://pix.example/users/alice#main-key")
        );
        assert_eq!(
            ProfileUrls::inbox_url(&alice, &config),
            "https://pix.example/users/alice/inbox"
        );
        assert_eq!(
            ProfileUrls::outbox_url(&alice, &config),
            "https://pix.example/users/alice/outbox"
        );
        assert_eq!(
            alice.shared_inbox_url(&config),
            "https://pix.example/users/alice/inbox"
        );
        assert_eq!(
            alice.avatar(&config),
            "https://pix.example/storage/avatars/default.jpg"
        );
    }

    #[test]
    fn test_remote_profile_urls() {
        let config = config();
        let bob = remote_profile(2, "bob@remote.example", "remote.example");

        assert_eq!(bob.url(&config, "/followers"), "https://remote.example/users/2");
        assert_eq!(bob.permalink(&config, ""), "https://remote.example/users/2");
        assert_eq!(
            bob.local_url(&config, ""),
            "https://pix.example/bob@remote.example"
        );
        assert_eq!(bob.acct(&config), "bob@remote.example");
        assert_eq!(bob.key_id(&config), None);
        assert_eq!(
            ProfileUrls::inbox_url(&bob, &config),
            "https://remote.example/users/2/inbox"
        );
    }

    #[test]
    fn test_shared_inbox_preferred() {
        let config = config();
        let mut bob = remote_profile(2, "bob@remote.example", "remote.example");
        bob.shared_inbox = Some("https://remote.example/inbox".to_string());

        assert_eq!(bob.shared_inbox_url(&config), "https://remote.example/inbox");
    }

    #[test]
    fn test_url_config_rejects_garbage() {
        assert!(UrlConfig::new("not a url").is_err());
    }
}
