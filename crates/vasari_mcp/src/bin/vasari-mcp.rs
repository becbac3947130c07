//! Vasari MCP server binary.
//!
//! Connects the Discord bot, then serves MCP over stdio. Logs go to stderr
//! because stdout carries the protocol.

use anyhow::{Context, Result};
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;
use vasari_discord::{DiscordError, DiscordErrorKind, DiscordSession};
use vasari_mcp::{
    ByteTransport, McpError, Router, RouterService, Server, ToolRegistry, VasariConfig,
    VasariRouter,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    let config = VasariConfig::load()?;

    let token = match std::env::var(&config.discord.token_env) {
        Ok(token) if !token.trim().is_empty() => token,
        _ => {
            let err = DiscordError::new(DiscordErrorKind::MissingCredential(
                config.discord.token_env.clone(),
            ));
            tracing::error!(error = %err.kind(), "Cannot start without a bot token");
            return Err(McpError::InitializationFailed(err.kind().to_string()).into());
        }
    };

    tracing::info!("Starting Vasari MCP server");

    let session = DiscordSession::connect(&token, config.discord.ready_timeout())
        .await
        .map_err(|e| McpError::InitializationFailed(e.kind().to_string()))
        .context("Failed to connect to Discord")?;

    let tools = ToolRegistry::with_directory(session.directory(), config.scan.concurrency);
    let router = VasariRouter::builder()
        .name(config.server.name.clone())
        .instructions(config.server.instructions.clone())
        .tools(tools)
        .build();

    tracing::info!(tools = router.list_tools().len(), "Router initialized");

    let server = Server::new(RouterService(router));
    let transport = ByteTransport::new(stdin(), stdout());

    tracing::info!("Server ready, listening on stdio");
    let served = server.run(transport).await;

    session.shutdown().await;
    served?;

    Ok(())
}
