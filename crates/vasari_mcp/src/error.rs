//! Error types for the MCP server.

use mcp_spec::handler::ToolError;
use vasari_discord::DiscordError;

/// Errors that can occur in the MCP server.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum McpError {
    /// No tool is registered under this name
    #[display("Unknown tool: {}", _0)]
    ToolNotFound(String),

    /// Tool arguments failed validation; holds `field: reason` pairs
    #[display("Invalid arguments: {}", _0)]
    InvalidInput(String),

    /// Tool ran and failed; holds caller-facing text only
    #[display("{}", _0)]
    ToolExecutionFailed(String),

    /// Configuration could not be loaded
    #[display("Configuration error: {}", _0)]
    Configuration(String),

    /// Server startup failed
    #[display("Server initialization failed: {}", _0)]
    InitializationFailed(String),
}

impl std::error::Error for McpError {}

impl From<DiscordError> for McpError {
    fn from(err: DiscordError) -> Self {
        McpError::ToolExecutionFailed(err.kind().to_string())
    }
}

impl From<McpError> for ToolError {
    fn from(err: McpError) -> Self {
        match err {
            McpError::ToolNotFound(_) => ToolError::NotFound(err.to_string()),
            McpError::InvalidInput(_) => ToolError::InvalidParameters(err.to_string()),
            McpError::ToolExecutionFailed(_)
            | McpError::Configuration(_)
            | McpError::InitializationFailed(_) => ToolError::ExecutionError(err.to_string()),
        }
    }
}

/// Result type for MCP operations.
pub type McpResult<T> = Result<T, McpError>;
