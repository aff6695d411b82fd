use serde::Serialize;
use std::sync::LazyLock;
use thiserror::Error;

/// Registry key of the Google Blog feed.
pub const GOOGLE_BLOG: &str = "google_blog";
/// Registry key of the Google Cloud YouTube channel feed.
pub const GOOGLE_CLOUD_YOUTUBE: &str = "google_cloud_youtube";

/// Metadata describing one searchable feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedConfig {
    /// Display name (e.g., "Google Blog Search")
    pub name: String,
    /// URL of the RSS/Atom document
    pub url: String,
    /// Human-readable description shown by `list_available_feeds`
    pub description: String,
}

impl FeedConfig {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            description: description.into(),
        }
    }
}

/// Errors raised by registry lookups and registration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No feed is registered under the requested key
    #[error("unknown feed key: {0}")]
    UnknownFeedKey(String),
    /// A feed with this key is already registered
    #[error("duplicate feed key: {0}")]
    DuplicateFeedKey(String),
}

static BUILTIN: LazyLock<FeedRegistry> = LazyLock::new(|| FeedRegistry {
    feeds: vec![
        (
            GOOGLE_BLOG.to_string(),
            FeedConfig::new(
                "Google Blog Search",
                "https://blog.google/rss/",
                "RSS feed from official Google Blog Search",
            ),
        ),
        (
            GOOGLE_CLOUD_YOUTUBE.to_string(),
            FeedConfig::new(
                "Google Cloud YouTube Channel",
                "https://www.youtube.com/feeds/videos.xml?channel_id=UCJS9pqu9BzkAMNTmzNMNhvg",
                "RSS feed from Google Cloud YouTube channel",
            ),
        ),
    ],
});

/// Fixed, ordered mapping from short keys to [`FeedConfig`].
///
/// Built once at startup and shared read-only afterwards, so lookups never
/// need synchronization. Listing order is registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRegistry {
    feeds: Vec<(String, FeedConfig)>,
}

impl FeedRegistry {
    /// The registry containing only the built-in feeds.
    pub fn builtin() -> &'static FeedRegistry {
        &BUILTIN
    }

    /// Returns a copy of the built-in registry extended with `extra` feeds.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateFeedKey`] if any key is already
    /// registered (built-in keys cannot be shadowed).
    pub fn with_extra_feeds<I>(extra: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (String, FeedConfig)>,
    {
        let mut registry = Self::builtin().clone();
        for (key, config) in extra {
            registry.register(key, config)?;
        }
        Ok(registry)
    }

    /// Builds a registry from exactly `feeds`, without the built-ins.
    #[cfg(test)]
    pub(crate) fn from_feeds<I>(feeds: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (String, FeedConfig)>,
    {
        let mut registry = Self { feeds: Vec::new() };
        for (key, config) in feeds {
            registry.register(key, config)?;
        }
        Ok(registry)
    }

    fn register(&mut self, key: String, config: FeedConfig) -> Result<(), RegistryError> {
        if self.feeds.iter().any(|(k, _)| *k == key) {
            return Err(RegistryError::DuplicateFeedKey(key));
        }
        self.feeds.push((key, config));
        Ok(())
    }

    /// All registered feeds in registration order.
    pub fn list(&self) -> Vec<&FeedConfig> {
        self.feeds.iter().map(|(_, config)| config).collect()
    }

    /// Registered keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.feeds.iter().map(|(key, _)| key.as_str())
    }

    /// Looks up a feed by key.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownFeedKey`] when `key` is not registered.
    pub fn resolve(&self, key: &str) -> Result<&FeedConfig, RegistryError> {
        self.feeds
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, config)| config)
            .ok_or_else(|| RegistryError::UnknownFeedKey(key.to_string()))
    }
}
