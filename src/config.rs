//! Configuration file parser for the optional `--config` TOML file.
//!
//! Every key is optional; a missing file yields `Config::default()`.
//! Unknown top-level keys are ignored by serde, though we log a warning
//! when the file contains potential typos.
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::feed::{FeedConfig, FeedRegistry, FetchOptions, RegistryError};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// SEC-014: Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    /// A configured feed has a URL that is not absolute http(s).
    #[error("Invalid URL for feed '{key}': {reason}")]
    InvalidFeedUrl { key: String, reason: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub fetch: FetchConfig,
    pub server: ServerConfig,
    /// Extra feeds appended to the registry after the built-ins.
    pub feeds: Vec<ExtraFeed>,
}

/// `[fetch]` table: limits for outbound feed requests.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum response body size in bytes.
    pub max_feed_size: usize,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let defaults = FetchOptions::default();
        Self {
            timeout_secs: defaults.timeout.as_secs(),
            max_feed_size: defaults.max_feed_size,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))
                .to_string(),
        }
    }
}

impl FetchConfig {
    pub fn options(&self) -> FetchOptions {
        FetchOptions {
            timeout: Duration::from_secs(self.timeout_secs),
            max_feed_size: self.max_feed_size,
        }
    }
}

/// `[server]` table: bind address for the HTTP transport.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// One `[[feeds]]` entry.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ExtraFeed {
    pub key: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
}

impl Config {
    /// SEC-014: Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted (serde default behavior), logged as warning
    /// - Feed URL that is not http(s) → `Err(ConfigError::InvalidFeedUrl)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // SEC-014: Check file size before reading
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Race condition: file deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = ["fetch", "server", "feeds"];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        config.validate_feed_urls()?;
        tracing::info!(
            path = %path.display(),
            extra_feeds = config.feeds.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    fn validate_feed_urls(&self) -> Result<(), ConfigError> {
        for feed in &self.feeds {
            let url = Url::parse(&feed.url).map_err(|e| ConfigError::InvalidFeedUrl {
                key: feed.key.clone(),
                reason: e.to_string(),
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidFeedUrl {
                    key: feed.key.clone(),
                    reason: format!("unsupported scheme: {}", url.scheme()),
                });
            }
        }
        Ok(())
    }

    /// Builds the process-wide registry: built-in feeds, then `[[feeds]]`.
    pub fn registry(&self) -> Result<FeedRegistry, ConfigError> {
        let extra = self.feeds.iter().map(|f| {
            (
                f.key.clone(),
                FeedConfig::new(f.name.clone(), f.url.clone(), f.description.clone()),
            )
        });
        Ok(FeedRegistry::with_extra_feeds(extra)?)
    }
}

// ============================================================================
// Tests
// ============================================================================
