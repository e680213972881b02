use serde::Deserialize;

use crate::auth::manager::MIN_REFRESH_INTERVAL_SECONDS;

/// ================================
/// Client-wide settings
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    /// Per-call timeout applied to every outbound request.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub proxy: Option<ProxyConfig>,
    /// OAuth2 token endpoint (client-credentials grant).
    #[serde(default = "default_token_url")]
    pub token_url: String,
    /// Catalog API base; request paths are appended to it.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Maximum age of a cached game details entry.
    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: u64,
    /// Lower bound on the refresh loop's sleep between renewal attempts.
    #[serde(default = "default_min_refresh_interval_seconds")]
    pub min_refresh_interval_seconds: u64,
    pub logging: Option<LoggingConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            proxy: None,
            token_url: default_token_url(),
            api_base_url: default_api_base_url(),
            cache_ttl_seconds: default_cache_ttl_seconds(),
            min_refresh_interval_seconds: default_min_refresh_interval_seconds(),
            logging: None,
        }
    }
}

/// Outbound proxy for all client traffic, with optional basic auth.
#[derive(Debug, Deserialize, Clone)]
pub struct ProxyConfig {
    pub url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_token_url() -> String {
    "https://id.twitch.tv/oauth2/token".to_string()
}

fn default_api_base_url() -> String {
    "https://api.igdb.com/v4".to_string()
}

fn default_cache_ttl_seconds() -> u64 {
    60 * 60 * 24
}

fn default_min_refresh_interval_seconds() -> u64 {
    MIN_REFRESH_INTERVAL_SECONDS
}
