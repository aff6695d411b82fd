//! MCP (Model Context Protocol) server for feed search.
//!
//! Exposes the feed registry and search engine as MCP tools.
//!
//! # Architecture
//!
//! ```text
//! MCP Client
//!   ↓ fetch_google_blog_feed(query, max_results)
//! FeedSearchServer
//!   ↓ FeedRegistry::resolve("google_blog")
//! feed::search_feed()
//!   ├── fetch_feed   (reqwest, timeout + size limit)
//!   ├── parse_feed   (feed-rs, quick-xml recovery)
//!   └── filter_entries
//!   ↓
//! SearchResult JSON → MCP Client
//! ```

pub mod params;
pub mod server;
pub mod transport;

pub use params::{FeedQueryParams, SearchFeedParams, DEFAULT_MAX_RESULTS};
pub use server::FeedSearchServer;
pub use transport::{serve_http, serve_stdio, MCP_PATH};
