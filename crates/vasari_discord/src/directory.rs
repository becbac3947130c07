//! The platform seam.
//!
//! Resolution and scanning logic only ever talks to a [`Directory`]. The
//! snapshot methods read the client's gateway-populated cache; the async
//! methods go to the network.

use crate::{Channel, DiscordResult, Message, Server, Snowflake, Thread};
use async_trait::async_trait;

/// Maximum number of messages the platform returns per fetch.
pub const MAX_FETCH: u8 = 100;

/// Read/write access to the chat platform.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Servers the client is currently connected to.
    fn servers(&self) -> Vec<Server>;

    /// Every cached channel of any kind in `server`.
    fn channels(&self, server: &Server) -> Vec<Channel>;

    /// Cached active threads under `forum`.
    fn threads(&self, forum: &Channel) -> Vec<Thread>;

    /// Fetch a server directly by ID.
    async fn fetch_server(&self, id: Snowflake) -> DiscordResult<Server>;

    /// Fetch a channel directly by ID.
    async fn fetch_channel(&self, id: Snowflake) -> DiscordResult<Channel>;

    /// Up to `limit` messages in `channel` with an ID strictly greater than `after`.
    async fn messages_after(
        &self,
        channel: Snowflake,
        after: Snowflake,
        limit: u8,
    ) -> DiscordResult<Vec<Message>>;

    /// Up to `limit` of the newest messages in `channel`, newest first.
    async fn recent_messages(&self, channel: Snowflake, limit: u8) -> DiscordResult<Vec<Message>>;

    /// A single message by ID.
    async fn message(&self, channel: Snowflake, id: Snowflake) -> DiscordResult<Message>;

    /// Post `content` to `channel`.
    async fn send_message(&self, channel: Snowflake, content: &str) -> DiscordResult<Message>;

    /// Open a new thread in `forum` with `content` as its first message.
    async fn create_forum_post(
        &self,
        forum: Snowflake,
        title: &str,
        content: &str,
    ) -> DiscordResult<Thread>;
}
