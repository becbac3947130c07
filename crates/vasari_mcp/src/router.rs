//! MCP router dispatching tool calls to the registry.

use crate::tools::ToolRegistry;
use mcp_server::Router;
use mcp_server::router::CapabilitiesBuilder;
use mcp_spec::content::Content;
use mcp_spec::handler::{PromptError, ResourceError, ToolError};
use mcp_spec::prompt::Prompt;
use mcp_spec::protocol::ServerCapabilities;
use mcp_spec::resource::Resource;
use mcp_spec::tool::Tool;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, warn};

/// MCP router for Vasari.
///
/// Every tool result is returned as a single text item holding the
/// pretty-printed JSON value; every failure as a tool error whose text is
/// meant for the caller.
#[derive(Clone)]
pub struct VasariRouter {
    name: String,
    instructions: String,
    tools: Arc<ToolRegistry>,
}

impl VasariRouter {
    /// Creates a new router builder.
    pub fn builder() -> VasariRouterBuilder {
        VasariRouterBuilder::default()
    }

    /// The tool registry.
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }
}

/// Builder for [`VasariRouter`].
#[derive(Default)]
pub struct VasariRouterBuilder {
    name: Option<String>,
    instructions: Option<String>,
    tools: Option<ToolRegistry>,
}

impl VasariRouterBuilder {
    /// Sets the server name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the instructions sent to clients.
    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Sets the tool registry.
    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Builds the router.
    pub fn build(self) -> VasariRouter {
        VasariRouter {
            name: self.name.unwrap_or_else(|| "vasari".to_string()),
            instructions: self.instructions.unwrap_or_default(),
            tools: Arc::new(self.tools.unwrap_or_default()),
        }
    }
}

/// Render a tool result as the single text item returned to the client.
pub fn render(value: &Value) -> Result<Vec<Content>, ToolError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| ToolError::ExecutionError(format!("Failed to render result: {e}")))?;
    Ok(vec![Content::text(text)])
}

impl Router for VasariRouter {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn instructions(&self) -> String {
        self.instructions.clone()
    }

    fn capabilities(&self) -> ServerCapabilities {
        CapabilitiesBuilder::new().with_tools(false).build()
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.tools
            .list()
            .iter()
            .map(|tool| Tool::new(tool.name(), tool.description(), tool.input_schema()))
            .collect()
    }

    fn call_tool(
        &self,
        tool_name: &str,
        arguments: Value,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Content>, ToolError>> + Send + 'static>> {
        let tools = self.tools.clone();
        let name = tool_name.to_string();
        Box::pin(async move {
            debug!(tool = %name, "Tool call");
            match tools.execute(&name, arguments).await {
                Ok(value) => render(&value),
                Err(e) => {
                    warn!(tool = %name, error = %e, "Tool call failed");
                    Err(e.into())
                }
            }
        })
    }

    fn list_resources(&self) -> Vec<Resource> {
        Vec::new()
    }

    fn read_resource(
        &self,
        uri: &str,
    ) -> Pin<Box<dyn Future<Output = Result<String, ResourceError>> + Send + 'static>> {
        let uri = uri.to_string();
        Box::pin(async move { Err(ResourceError::NotFound(uri)) })
    }

    fn list_prompts(&self) -> Vec<Prompt> {
        Vec::new()
    }

    fn get_prompt(
        &self,
        prompt_name: &str,
    ) -> Pin<Box<dyn Future<Output = Result<String, PromptError>> + Send + 'static>> {
        let name = prompt_name.to_string();
        Box::pin(async move { Err(PromptError::NotFound(name)) })
    }
}
