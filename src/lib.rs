//! Search RSS/Atom feeds over the Model Context Protocol.
//!
//! - [`feed`] - Feed registry, fetching, best-effort parsing and search
//! - [`mcp`] - MCP tool bindings and transports
//! - [`config`] - Optional TOML configuration

pub mod config;
pub mod feed;
pub mod mcp;
