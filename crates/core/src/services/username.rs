//! Username acceptability rule.
//!
//! Pure predicate shared by registration and any other place that needs to
//! decide whether a handle may be claimed. Storage (uniqueness) is checked
//! separately.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use thiserror::Error;

/// Punctuation allowed once inside a username.
const SEPARATORS: [char; 3] = ['-', '_', '.'];

/// Suffixes that would make a profile URL look like a script or asset.
const FILE_EXTENSIONS: [&str; 3] = [".php", ".js", ".css"];

static RESERVED_USERNAMES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "about", "account", "accounts", "activity", "admin", "administrator", "api", "app",
        "apps", "assets", "auth", "avatar", "avatars", "blog", "bookmarks", "c", "collections",
        "contact", "css", "dashboard", "deck", "developer", "developers", "discover", "docs",
        "explore", "f", "faq", "federation", "feed", "followers", "following", "help", "home",
        "i", "images", "img", "inbox", "js", "legal", "login", "logout", "media", "moderator",
        "nodeinfo", "notifications", "oauth", "outbox", "p", "password", "pixelfed", "privacy",
        "query", "register", "report", "reports", "root", "search", "security", "settings",
        "site", "static", "status", "statuses", "storage", "support", "system", "terms", "u",
        "users", "webfinger", "well-known", "www",
    ]
    .into_iter()
    .collect()
});

/// Why a username was rejected. `Display` is the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UsernameError {
    #[error("Username is invalid.")]
    Empty,

    #[error("Username is invalid.")]
    FileExtension,

    #[error("Username is invalid. Can only contain one dash (-), period (.) or underscore (_).")]
    TooManySeparators,

    #[error("Username is invalid. Must start with a letter.")]
    InvalidFirstCharacter,

    #[error("Username is invalid. Must end with a letter or number.")]
    InvalidLastCharacter,

    #[error(
        "Username is invalid. Username must be alpha-numeric and may contain dashes (-), periods (.) and underscores (_)."
    )]
    InvalidCharacters,

    #[error("Username cannot be used.")]
    Reserved,
}

/// Username rule with operator-configured extra reserved names.
#[derive(Debug, Clone, Default)]
pub struct UsernameValidator {
    extra_reserved: HashSet<String>,
}

impl UsernameValidator {
    /// Create a validator that also rejects `extra_reserved` (case-insensitive).
    #[must_use]
    pub fn new<I, S>(extra_reserved: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extra_reserved: extra_reserved
                .into_iter()
                .map(|name| name.as_ref().trim().to_lowercase())
                .filter(|name| !name.is_empty())
                .collect(),
        }
    }

    /// Check a candidate username. Rules are evaluated in a fixed order and
    /// the first failure is reported.
    pub fn validate(&self, candidate: &str) -> Result<(), UsernameError> {
        let (Some(first), Some(last)) = (candidate.chars().next(), candidate.chars().last()) else {
            return Err(UsernameError::Empty);
        };

        let lowered = candidate.to_lowercase();

        if FILE_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext)) {
            return Err(UsernameError::FileExtension);
        }

        if candidate.chars().filter(|c| SEPARATORS.contains(c)).count() > 1 {
            return Err(UsernameError::TooManySeparators);
        }

        if !first.is_ascii_alphabetic() {
            return Err(UsernameError::InvalidFirstCharacter);
        }

        if !last.is_ascii_alphanumeric() {
            return Err(UsernameError::InvalidLastCharacter);
        }

        if !candidate
            .chars()
            .filter(|c| !SEPARATORS.contains(c))
            .all(|c| c.is_ascii_alphanumeric())
        {
            return Err(UsernameError::InvalidCharacters);
        }

        if self.is_reserved(&lowered) {
            return Err(UsernameError::Reserved);
        }

        Ok(())
    }

    fn is_reserved(&self, lowered: &str) -> bool {
        RESERVED_USERNAMES.contains(lowered) || self.extra_reserved.contains(lowered)
    }
}

/// Check a username against the built-in rules only.
pub fn validate_username(candidate: &str) -> Result<(), UsernameError> {
    UsernameValidator::default().validate(candidate)
}
