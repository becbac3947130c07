//! Model Context Protocol (MCP) server for Vasari.
//!
//! Exposes a Discord bot to LLM clients as four tools:
//!
//! - `send-message` - post to a channel, or open a forum thread
//! - `read-messages` - newest messages in a channel
//! - `list-channels` - text-capable channels with last-message previews
//! - `list-channels-with-new-messages` - channels ranked by recent activity
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use vasari_discord::MemoryDirectory;
//! use vasari_mcp::{ByteTransport, RouterService, Server, ToolRegistry, VasariRouter};
//! use tokio::io::{stdin, stdout};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let router = VasariRouter::builder()
//!         .name("vasari")
//!         .tools(ToolRegistry::discord(Arc::new(MemoryDirectory::new())))
//!         .build();
//!
//!     let server = Server::new(RouterService(router));
//!     let transport = ByteTransport::new(stdin(), stdout());
//!     server.run(transport).await?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod args;
mod config;
mod error;
mod router;
pub mod tools;

pub use config::{DiscordSection, ScanSection, ServerSection, VasariConfig};
pub use error::{McpError, McpResult};
pub use router::{VasariRouter, VasariRouterBuilder, render};
pub use tools::{
    ListChannelsTool, ListChannelsWithNewMessagesTool, McpTool, ReadMessagesTool,
    SendMessageTool, ToolRegistry,
};

// Re-export key mcp-server types for convenience
pub use mcp_server::router::RouterService;
pub use mcp_server::{ByteTransport, Router, Server};
