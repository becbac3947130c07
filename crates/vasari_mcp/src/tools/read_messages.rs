//! The `read-messages` tool.

use super::{McpTool, channel_property, server_property, to_json};
use crate::McpResult;
use crate::args::Arguments;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::instrument;
use vasari_discord::{Directory, MAX_FETCH, operations};

/// Messages returned when `limit` is not given.
const DEFAULT_LIMIT: u8 = 50;

/// Read the newest messages in a channel.
pub struct ReadMessagesTool {
    directory: Arc<dyn Directory>,
}

impl ReadMessagesTool {
    /// Create the tool over `directory`.
    pub fn new(directory: Arc<dyn Directory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl McpTool for ReadMessagesTool {
    fn name(&self) -> &str {
        "read-messages"
    }

    fn description(&self) -> &str {
        "Read recent messages from a Discord channel. Reading a forum channel lists its active threads."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "server": server_property(),
                "channel": channel_property(),
                "limit": {
                    "type": "number",
                    "description": "Number of messages to fetch (max 100)",
                    "minimum": 1,
                    "maximum": MAX_FETCH,
                    "default": DEFAULT_LIMIT
                }
            },
            "required": ["channel"]
        })
    }

    #[instrument(skip(self, input), fields(tool = "read-messages"))]
    async fn execute(&self, input: Value) -> McpResult<Value> {
        let mut args = Arguments::new(&input);
        let server = args.optional_str("server");
        let channel = args.required_str("channel");
        let limit = args.bounded_int(
            "limit",
            1,
            u64::from(MAX_FETCH),
            u64::from(DEFAULT_LIMIT),
        );
        args.finish()?;
        let limit = u8::try_from(limit).unwrap_or(DEFAULT_LIMIT);

        let messages =
            operations::read_messages(self.directory.as_ref(), server.as_deref(), &channel, limit)
                .await?;
        to_json(&messages)
    }
}
