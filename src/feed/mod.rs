//! Feed registry and search engine.
//!
//! This module provides everything needed to search an RSS/Atom feed:
//!
//! - **Registry**: Fixed mapping from short keys to feed metadata
//! - **Fetching**: Single bounded HTTP retrieval of a feed document
//! - **Parsing**: Best-effort conversion of RSS/Atom XML into entries
//! - **Searching**: Case-insensitive substring filter with a result cap
//!
//! # Architecture
//!
//! - [`registry`] - [`FeedRegistry`] and the built-in feeds
//! - [`fetcher`] - HTTP fetching with timeout and size limits
//! - [`parser`] - Strict `feed-rs` parse with a lenient `quick-xml` fallback
//! - [`search`] - Fetch, parse and filter into a [`SearchResult`]
//!
//! # Example
//!
//! ```no_run
//! use rss_feed_search::feed::{search_feed, FeedRegistry, FetchOptions, GOOGLE_BLOG};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = reqwest::Client::new();
//! let blog = FeedRegistry::builtin().resolve(GOOGLE_BLOG)?;
//! let result = search_feed(&client, &blog.url, "gemini", 5, &FetchOptions::default()).await;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! # Ok(())
//! # }
//! ```

pub mod fetcher;
pub mod parser;
pub mod registry;
pub mod search;

pub use fetcher::{fetch_feed, FetchError, FetchOptions};
pub use parser::{parse_feed, FeedEntry, ParsedFeed};
pub use registry::{FeedConfig, FeedRegistry, RegistryError, GOOGLE_BLOG, GOOGLE_CLOUD_YOUTUBE};
pub use search::{filter_entries, search_feed, SearchResult, NO_MATCHES_MESSAGE};
