//! The `list-channels` tool.

use super::{McpTool, server_property, to_json};
use crate::McpResult;
use crate::args::Arguments;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::instrument;
use vasari_discord::{Directory, operations};

/// List a server's text, announcement and forum channels.
pub struct ListChannelsTool {
    directory: Arc<dyn Directory>,
}

impl ListChannelsTool {
    /// Create the tool over `directory`.
    pub fn new(directory: Arc<dyn Directory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl McpTool for ListChannelsTool {
    fn name(&self) -> &str {
        "list-channels"
    }

    fn description(&self) -> &str {
        "List all channels in a Discord server with their last message"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "server": server_property()
            },
            "required": []
        })
    }

    #[instrument(skip(self, input), fields(tool = "list-channels"))]
    async fn execute(&self, input: Value) -> McpResult<Value> {
        let mut args = Arguments::new(&input);
        let server = args.optional_str("server");
        args.finish()?;

        let listing = operations::list_channels(self.directory.as_ref(), server.as_deref()).await?;
        to_json(&listing)
    }
}
