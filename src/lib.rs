//! # ayrshare-mcp
//!
//! MCP (Model Context Protocol) server for the Ayrshare social media API.
//!
//! Exposes Ayrshare operations (publishing, scheduling, analytics, comments,
//! direct messages, reviews, webhooks, ads, media, profiles and more) as MCP
//! tools, plus read-only resources and prompt templates. Speaks JSON-RPC 2.0
//! over stdin/stdout, or over HTTP with a health endpoint.
//!
//! Every tool returns an envelope: `{"status": "success", ...}` or
//! `{"status": "error", "message": ..., "error_type": ...}`. Arguments are
//! validated before any network call, and all calls except `server_health`
//! count against a process-wide minute/hour rate limit.
//!
//! ## Usage
//!
//! The server is typically run as an executable and configured in an MCP
//! host such as Claude Desktop:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "ayrshare": {
//!       "command": "/path/to/ayrshare-mcp",
//!       "env": { "AYRSHARE_API_KEY": "your-api-key" }
//!     }
//!   }
//! }
//! ```
//!
//! ## Library Usage
//!
//! For testing or embedding, you can use the library API:
//!
//! ```no_run
//! use std::sync::Arc;
//! use ayrshare_mcp::{Config, McpServer, McpSession};
//!
//! # async fn run() -> ayrshare_mcp::Result<()> {
//! let session = McpSession::from_config(Config::with_api_key("your-api-key"))?;
//! let server = Arc::new(McpServer::new(session));
//!
//! // Reads from stdin, writes to stdout
//! server.run_stdio().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod convert;
pub mod envelope;
pub mod error;
pub mod health;
pub mod http;
pub mod limiter;
pub mod platform;
pub mod prompts;
pub mod resources;
pub mod server;
pub mod session;
pub mod tools;

pub use client::{AyrshareClient, HttpMethod, Upstream, UpstreamRequest};
pub use config::{Config, LogFormat, TransportMode};
pub use envelope::{Envelope, ErrorKind};
pub use error::{McpError, Result};
pub use health::HealthReport;
pub use limiter::{RateLimitSnapshot, RateLimiter};
pub use platform::Platform;
pub use prompts::PromptRegistry;
pub use resources::ResourceRegistry;
pub use server::{JsonRpcRequest, JsonRpcResponse, McpServer};
pub use session::McpSession;
pub use tools::{ToolDef, ToolRegistry};
