use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use rss_feed_search::config::Config;
use rss_feed_search::mcp::{serve_http, serve_stdio, FeedSearchServer};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Transport {
    /// JSON-RPC over stdin/stdout
    Stdio,
    /// Streamable HTTP at /mcp
    Http,
}

#[derive(Parser, Debug)]
#[command(
    name = "rss-feed-search",
    version,
    about = "MCP server for searching the Google Blog and Google Cloud YouTube RSS feeds"
)]
struct Args {
    /// Transport used to serve MCP requests
    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,

    /// Bind host for the HTTP transport (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Bind port for the HTTP transport (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Optional TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the stdio MCP stream, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => Config::default(),
    };

    let server = FeedSearchServer::from_config(&config).context("Failed to create MCP server")?;
    tracing::info!(
        feeds = server.registry().list().len(),
        transport = ?args.transport,
        "Starting RSS feed search server"
    );

    match args.transport {
        Transport::Stdio => serve_stdio(server).await,
        Transport::Http => {
            let host = args.host.unwrap_or(config.server.host);
            let port = args.port.unwrap_or(config.server.port);
            serve_http(server, &host, port).await
        }
    }
}
