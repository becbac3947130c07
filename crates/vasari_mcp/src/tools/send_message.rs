//! The `send-message` tool.

use super::{McpTool, channel_property, server_property, to_json};
use crate::McpResult;
use crate::args::Arguments;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::instrument;
use vasari_discord::Directory;
use vasari_discord::operations::{self, MAX_MESSAGE_CHARS};

/// Post a message to a channel, or open a thread when the channel is a forum.
pub struct SendMessageTool {
    directory: Arc<dyn Directory>,
}

impl SendMessageTool {
    /// Create the tool over `directory`.
    pub fn new(directory: Arc<dyn Directory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl McpTool for SendMessageTool {
    fn name(&self) -> &str {
        "send-message"
    }

    fn description(&self) -> &str {
        "Send a message to a Discord channel. Sending to a forum channel creates a new post."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "server": server_property(),
                "channel": channel_property(),
                "message": {
                    "type": "string",
                    "description": "Message content to send",
                    "maxLength": MAX_MESSAGE_CHARS
                }
            },
            "required": ["channel", "message"]
        })
    }

    #[instrument(skip(self, input), fields(tool = "send-message"))]
    async fn execute(&self, input: Value) -> McpResult<Value> {
        let mut args = Arguments::new(&input);
        let server = args.optional_str("server");
        let channel = args.required_str("channel");
        let message = args.required_str("message");
        args.ensure(
            message.chars().count() <= MAX_MESSAGE_CHARS,
            "message",
            format!("String must contain at most {MAX_MESSAGE_CHARS} character(s)"),
        );
        args.finish()?;

        let receipt = operations::send_message(
            self.directory.as_ref(),
            server.as_deref(),
            &channel,
            &message,
        )
        .await?;
        to_json(&receipt)
    }
}
