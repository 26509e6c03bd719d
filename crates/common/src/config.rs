//! Application configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::storage::StorageConfig;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Redis configuration.
    pub redis: RedisConfig,
    /// Federation configuration.
    pub federation: FederationConfig,
    /// Registration configuration.
    #[serde(default)]
    pub registration: RegistrationConfig,
    /// Media configuration.
    #[serde(default)]
    pub media: MediaConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this instance.
    pub url: String,
    /// Snowflake worker id of this process (0..=1023).
    #[serde(default)]
    pub worker_id: u16,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Redis configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL.
    pub url: String,
    /// Key prefix for all Redis keys.
    #[serde(default = "default_redis_prefix")]
    pub prefix: String,
}

/// Federation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FederationConfig {
    /// Whether federation is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Instance name.
    pub instance_name: String,
    /// Instance description.
    #[serde(default)]
    pub instance_description: Option<String>,
}

/// Account registration configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationConfig {
    /// Whether new accounts may sign up.
    #[serde(default = "default_true")]
    pub open_registration: bool,
    /// Ceiling on the number of local users (`None` = unlimited).
    #[serde(default)]
    pub max_users: Option<u64>,
    /// Minimum password length.
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
    /// Maximum display name length.
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
    /// Whether the captcha field is required.
    #[serde(default)]
    pub captcha_enabled: bool,
    /// Email domains that may not register.
    #[serde(default)]
    pub banned_email_domains: Vec<String>,
    /// Extra reserved usernames on top of the built-in list.
    #[serde(default)]
    pub restricted_usernames: Vec<String>,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            open_registration: true,
            max_users: None,
            min_password_length: default_min_password_length(),
            max_name_length: default_max_name_length(),
            captcha_enabled: false,
            banned_email_domains: Vec::new(),
            restricted_usernames: Vec::new(),
        }
    }
}

/// Media storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    /// Directory holding locally stored media.
    #[serde(default = "default_media_path")]
    pub local_path: PathBuf,
    /// URL path under which local media is served.
    #[serde(default = "default_media_url_path")]
    pub local_url_path: String,
    /// Whether processed media is pushed to cloud storage.
    #[serde(default)]
    pub cloud_storage: bool,
    /// Remove the local copy once the cloud upload succeeded.
    #[serde(default)]
    pub delete_local_after_cloud: bool,
    /// Maximum upload size in bytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: usize,
    /// Backend the storage pipeline copies media to.
    #[serde(default)]
    pub cloud: Option<StorageConfig>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            local_path: default_media_path(),
            local_url_path: default_media_url_path(),
            cloud_storage: false,
            delete_local_after_cloud: false,
            max_upload_size: default_max_upload_size(),
            cloud: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

fn default_redis_prefix() -> String {
    "fedigram".to_string()
}

const fn default_true() -> bool {
    true
}

const fn default_min_password_length() -> usize {
    8
}

const fn default_max_name_length() -> usize {
    30
}

fn default_media_path() -> PathBuf {
    PathBuf::from("./storage/media")
}

fn default_media_url_path() -> String {
    "/storage/media".to_string()
}

const fn default_max_upload_size() -> usize {
    15 * 1024 * 1024
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `FEDIGRAM_ENV`)
    /// 3. Environment variables with `FEDIGRAM_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("FEDIGRAM_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("FEDIGRAM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("FEDIGRAM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Host name of this instance, taken from the public URL.
    #[must_use]
    pub fn host(&self) -> &str {
        let url = self.server.url.as_str();
        let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
        without_scheme
            .split(['/', ':'])
            .next()
            .unwrap_or(without_scheme)
    }
}
