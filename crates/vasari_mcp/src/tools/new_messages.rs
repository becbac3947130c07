//! The `list-channels-with-new-messages` tool.

use super::{McpTool, server_property, to_json};
use crate::McpResult;
use crate::args::Arguments;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::instrument;
use vasari_discord::{DEFAULT_SCAN_CONCURRENCY, Directory, operations};

/// Rank channels and forum threads by messages since a boundary.
pub struct ListChannelsWithNewMessagesTool {
    directory: Arc<dyn Directory>,
    concurrency: usize,
}

impl ListChannelsWithNewMessagesTool {
    /// Create the tool over `directory` with the default scan concurrency.
    pub fn new(directory: Arc<dyn Directory>) -> Self {
        Self {
            directory,
            concurrency: DEFAULT_SCAN_CONCURRENCY,
        }
    }

    /// Set how many channel fetches a scan keeps in flight.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }
}

#[async_trait]
impl McpTool for ListChannelsWithNewMessagesTool {
    fn name(&self) -> &str {
        "list-channels-with-new-messages"
    }

    fn description(&self) -> &str {
        "List all channels that have new messages since a specific time, including message count"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "server": server_property(),
                "since": {
                    "type": "string",
                    "description": "ISO 8601 timestamp (e.g., \"2024-01-01T00:00:00Z\") or relative time (e.g., \"1h\" for 1 hour, \"24h\" for 24 hours, \"7d\" for 7 days)"
                }
            },
            "required": ["since"]
        })
    }

    #[instrument(skip(self, input), fields(tool = "list-channels-with-new-messages"))]
    async fn execute(&self, input: Value) -> McpResult<Value> {
        let mut args = Arguments::new(&input);
        let server = args.optional_str("server");
        let since = args.required_str("since");
        args.finish()?;

        let listing = operations::channels_with_new_messages(
            self.directory.as_ref(),
            server.as_deref(),
            &since,
            self.concurrency,
        )
        .await?;
        to_json(&listing)
    }
}
