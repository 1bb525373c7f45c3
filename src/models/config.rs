//! Configuration model.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_API_URL: &str = "http://localhost:3033/api/v1";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend API configuration.
    pub api: ApiConfig,
    /// Account whose profiles are cached.
    pub account_id: Option<String>,
    /// Directory holding the persisted cache snapshots.
    pub cache_dir: PathBuf,
    /// Window widths for recent/upcoming views.
    pub views: ViewConfig,
}

/// Backend API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://keepwatching.example/api/v1`.
    pub base_url: String,
    /// Bearer token.
    pub token: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// Derived view configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Trailing window for "recent", in days.
    pub recent_days: u32,
    /// Forward window for "upcoming", in days.
    pub upcoming_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            account_id: None,
            cache_dir: dirs_config_path().join("cache"),
            views: ViewConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("KEEPWATCHING_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            token: std::env::var("KEEPWATCHING_TOKEN").ok(),
            timeout_secs: 30,
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            recent_days: 7,
            upcoming_days: 7,
        }
    }
}

/// Get the configuration directory path.
pub fn dirs_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("keepwatching")
}

/// Load configuration from file.
pub fn load_config() -> Config {
    let config_path = dirs_config_path().join("config.toml");

    if config_path.exists() {
        match std::fs::read_to_string(&config_path) {
            Ok(content) => match parse_config(&content) {
                Ok(config) => return config,
                Err(e) => tracing::warn!("Ignoring {}: {}", config_path.display(), e),
            },
            Err(e) => tracing::warn!("Cannot read {}: {}", config_path.display(), e),
        }
    }

    Config::default()
}

/// Parse configuration from TOML text, filling unset fields with defaults.
pub fn parse_config(content: &str) -> crate::Result<Config> {
    let config: Config = toml::from_str(content)?;
    if config.api.base_url.trim().is_empty() {
        return Err(crate::Error::Config("api.base_url must not be empty".into()));
    }
    Ok(config)
}
