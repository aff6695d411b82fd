//! MCP tool parameter types.
//!
//! Defines the input schemas for MCP tools using `schemars` for automatic
//! JSON Schema generation required by the MCP protocol.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Result cap applied when the caller omits `max_results`.
pub const DEFAULT_MAX_RESULTS: i64 = 5;

const fn default_max_results() -> i64 {
    DEFAULT_MAX_RESULTS
}

/// Parameters for the fixed-feed tools (`fetch_google_blog_feed`,
/// `fetch_youtube_feed`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FeedQueryParams {
    /// The search query, matched case-insensitively against entry title or description.
    pub query: String,

    /// Maximum number of results to return. Zero or negative returns no entries.
    #[serde(default = "default_max_results")]
    pub max_results: i64,
}

/// Parameters for the `search_feed` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchFeedParams {
    /// Registry key of the feed (see `list_available_feeds`), e.g. `google_blog`.
    pub feed: String,

    /// The search query, matched case-insensitively against entry title or description.
    pub query: String,

    /// Maximum number of results to return. Zero or negative returns no entries.
    #[serde(default = "default_max_results")]
    pub max_results: i64,
}
