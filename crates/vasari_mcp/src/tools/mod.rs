//! Tool implementations for the MCP server.

mod list_channels;
mod new_messages;
mod read_messages;
mod send_message;

pub use list_channels::ListChannelsTool;
pub use new_messages::ListChannelsWithNewMessagesTool;
pub use read_messages::ReadMessagesTool;
pub use send_message::SendMessageTool;

use crate::{McpError, McpResult};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument};
use vasari_discord::{DEFAULT_SCAN_CONCURRENCY, Directory};

/// Trait for MCP tools.
#[async_trait]
pub trait McpTool: Send + Sync {
    /// Returns the tool name.
    fn name(&self) -> &str;

    /// Returns the tool description for the LLM.
    fn description(&self) -> &str;

    /// Returns the input schema as JSON Schema.
    fn input_schema(&self) -> Value;

    /// Executes the tool with the given input.
    async fn execute(&self, input: Value) -> McpResult<Value>;
}

/// Schema fragment for the optional `server` argument shared by every tool.
pub(crate) fn server_property() -> Value {
    json!({
        "type": "string",
        "description": "Server name or ID (optional if bot is only in one server)"
    })
}

/// Schema fragment for the `channel` argument.
pub(crate) fn channel_property() -> Value {
    json!({
        "type": "string",
        "description": "Channel name (e.g., \"general\") or ID"
    })
}

/// Serialize a tool result.
pub(crate) fn to_json<T: Serialize>(value: &T) -> McpResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| McpError::ToolExecutionFailed(format!("Failed to serialize result: {e}")))
}

/// Registry for managing MCP tools.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn McpTool>>,
}

impl ToolRegistry {
    /// Creates an empty tool registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the four Discord tools over `directory`.
    pub fn with_directory(directory: Arc<dyn Directory>, scan_concurrency: usize) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(SendMessageTool::new(directory.clone())));
        registry.register(Arc::new(ReadMessagesTool::new(directory.clone())));
        registry.register(Arc::new(ListChannelsTool::new(directory.clone())));
        registry.register(Arc::new(
            ListChannelsWithNewMessagesTool::new(directory).with_concurrency(scan_concurrency),
        ));
        info!(tools = registry.len(), "ToolRegistry initialized");
        registry
    }

    /// Same as [`ToolRegistry::with_directory`] with the default scan concurrency.
    pub fn discord(directory: Arc<dyn Directory>) -> Self {
        Self::with_directory(directory, DEFAULT_SCAN_CONCURRENCY)
    }

    /// Registers a tool.
    pub fn register(&mut self, tool: Arc<dyn McpTool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Gets a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn McpTool>> {
        self.tools.get(name).cloned()
    }

    /// Lists all registered tools, by name.
    pub fn list(&self) -> Vec<Arc<dyn McpTool>> {
        self.tools.values().cloned().collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Executes a tool by name.
    #[instrument(skip(self, input))]
    pub async fn execute(&self, name: &str, input: Value) -> McpResult<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| McpError::ToolNotFound(name.to_string()))?;

        tool.execute(input).await
    }
}
