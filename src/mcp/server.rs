//! MCP server exposing the feed search tools.
//!
//! Each tool is a thin binding: resolve a registry key, run
//! [`crate::feed::search_feed`] and return the result as JSON text content.
//! Search failures are data (`[{"error": ...}]`), not MCP errors; only an
//! unknown feed key is reported as an MCP error.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Serialize;

use crate::config::Config;
use crate::feed::{self, FeedRegistry, FetchOptions, GOOGLE_BLOG, GOOGLE_CLOUD_YOUTUBE};

use super::params::{FeedQueryParams, SearchFeedParams};

/// Serializes `value` as pretty JSON into a successful tool result.
fn json_content<T: Serialize + ?Sized>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {e}"), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// RSS feed search MCP server.
///
/// Cheap to clone: the registry is shared and `reqwest::Client` is
/// reference-counted internally.
#[derive(Clone)]
pub struct FeedSearchServer {
    tool_router: ToolRouter<Self>,
    registry: Arc<FeedRegistry>,
    client: reqwest::Client,
    fetch_options: FetchOptions,
}

#[tool_router]
impl FeedSearchServer {
    #[tool(
        name = "list_available_feeds",
        description = "List all available RSS feeds. Returns a JSON list of feeds with name, url, and description."
    )]
    async fn list_available_feeds(&self) -> Result<CallToolResult, McpError> {
        json_content(&self.registry.list())
    }

    #[tool(
        name = "fetch_google_blog_feed",
        description = "Fetch RSS feed entries from Google Blog Search whose title or description contains the query (case-insensitive). Returns a JSON list of {title, link, description}, or [{message}] when nothing matches, or [{error}] when the feed cannot be fetched."
    )]
    async fn fetch_google_blog_feed(
        &self,
        Parameters(params): Parameters<FeedQueryParams>,
    ) -> Result<CallToolResult, McpError> {
        self.search_registered(GOOGLE_BLOG, &params.query, params.max_results)
            .await
    }

    #[tool(
        name = "fetch_youtube_feed",
        description = "Fetch RSS feed entries from the Google Cloud YouTube channel whose title or description contains the query (case-insensitive). Returns a JSON list of {title, link, description}, or [{message}] when nothing matches, or [{error}] when the feed cannot be fetched."
    )]
    async fn fetch_youtube_feed(
        &self,
        Parameters(params): Parameters<FeedQueryParams>,
    ) -> Result<CallToolResult, McpError> {
        self.search_registered(GOOGLE_CLOUD_YOUTUBE, &params.query, params.max_results)
            .await
    }

    #[tool(
        name = "search_feed",
        description = "Search any registered feed by key (see list_available_feeds). Same matching and result shape as fetch_google_blog_feed. Unknown keys are rejected."
    )]
    async fn search_feed(
        &self,
        Parameters(params): Parameters<SearchFeedParams>,
    ) -> Result<CallToolResult, McpError> {
        self.search_registered(&params.feed, &params.query, params.max_results)
            .await
    }
}

#[tool_handler]
impl ServerHandler for FeedSearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                title: Some("RSS Feed Search".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Search the Google Blog and Google Cloud YouTube RSS feeds. Use \
                 `list_available_feeds` to see feeds, `fetch_google_blog_feed` or \
                 `fetch_youtube_feed` to search them, and `search_feed` for any \
                 registered feed key."
                    .to_string(),
            ),
        }
    }
}

impl FeedSearchServer {
    /// Creates a server over an already-built registry and HTTP client.
    pub fn new(
        registry: Arc<FeedRegistry>,
        client: reqwest::Client,
        fetch_options: FetchOptions,
    ) -> Self {
        Self {
            tool_router: Self::tool_router(),
            registry,
            client,
            fetch_options,
        }
    }

    /// Creates a server from configuration: registry with extra feeds and a
    /// client carrying the configured `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns an error if an extra feed key collides with a registered one
    /// or the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let registry = config.registry()?;
        let client = reqwest::Client::builder()
            .user_agent(config.fetch.user_agent.as_str())
            .build()?;
        Ok(Self::new(
            Arc::new(registry),
            client,
            config.fetch.options(),
        ))
    }

    /// Returns the feed registry shared by all tools.
    pub fn registry(&self) -> &FeedRegistry {
        &self.registry
    }

    async fn search_registered(
        &self,
        key: &str,
        query: &str,
        max_results: i64,
    ) -> Result<CallToolResult, McpError> {
        let config = self
            .registry
            .resolve(key)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        tracing::info!(feed = %key, query = %query, max_results, "Searching feed");
        let result = feed::search_feed(
            &self.client,
            &config.url,
            query,
            max_results,
            &self.fetch_options,
        )
        .await;

        json_content(&result)
    }
}
