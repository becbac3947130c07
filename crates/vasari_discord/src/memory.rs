//! In-process [`Directory`] backed by fixtures.
//!
//! Used by the test suites of this crate and the MCP server, and handy for
//! exercising the tools without a bot token.

use crate::{
    Channel, ChannelKind, Directory, DiscordError, DiscordErrorKind, DiscordResult, Message,
    Server, Snowflake, Thread,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

#[derive(Debug, Default)]
struct State {
    servers: Vec<Server>,
    channels: Vec<Channel>,
    threads: Vec<Thread>,
    messages: BTreeMap<Snowflake, Vec<Message>>,
    failing: HashSet<Snowflake>,
    sequence: u64,
}

impl State {
    fn record_message(&mut self, message: Message) {
        let id = message.id;
        if let Some(channel) = self.channels.iter_mut().find(|c| c.id == message.channel_id) {
            channel.last_message_id = channel.last_message_id.max(Some(id));
        }
        if let Some(thread) = self.threads.iter_mut().find(|t| t.id == message.channel_id) {
            thread.last_message_id = thread.last_message_id.max(Some(id));
            thread.message_count = Some(thread.message_count.unwrap_or(0) + 1);
        }
        let log = self.messages.entry(message.channel_id).or_default();
        log.push(message);
        log.sort_by_key(|m| m.id);
    }

    fn next_id(&mut self) -> Snowflake {
        self.sequence += 1;
        Snowflake::from_parts(Utc::now(), self.sequence)
    }

    fn ensure_readable(&self, channel: Snowflake) -> DiscordResult<()> {
        if self.failing.contains(&channel) {
            return Err(DiscordError::new(DiscordErrorKind::Platform(
                "Missing Access".to_string(),
            )));
        }
        let known = self.channels.iter().any(|c| c.id == channel)
            || self.threads.iter().any(|t| t.id == channel);
        if known {
            Ok(())
        } else {
            Err(unknown("Channel"))
        }
    }

    fn thread_as_channel(&self, thread: &Thread) -> Option<Channel> {
        let forum = self.channels.iter().find(|c| c.id == thread.forum_id)?;
        Some(
            Channel::new(thread.id, forum.server_id, thread.name.clone(), ChannelKind::Thread)
                .with_parent(forum.id),
        )
    }
}

fn unknown(what: &str) -> DiscordError {
    DiscordError::new(DiscordErrorKind::Platform(format!("Unknown {what}")))
}

/// Fixture-backed directory.
///
/// # Example
/// ```
/// use vasari_discord::{Channel, ChannelKind, MemoryDirectory, Server};
///
/// let directory = MemoryDirectory::new()
///     .with_server(Server::new(1u64, "Guild"))
///     .with_channel(Channel::new(10u64, 1u64, "general", ChannelKind::Text));
/// ```
#[derive(Debug)]
pub struct MemoryDirectory {
    state: Mutex<State>,
    author: String,
}

impl Default for MemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            author: "vasari".to_string(),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&mut self) -> &mut State {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    /// Author tag used for messages this directory sends.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Add a connected server.
    pub fn with_server(mut self, server: Server) -> Self {
        self.state_mut().servers.push(server);
        self
    }

    /// Add a channel.
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.state_mut().channels.push(channel);
        self
    }

    /// Add a forum thread.
    pub fn with_thread(mut self, thread: Thread) -> Self {
        self.state_mut().threads.push(thread);
        self
    }

    /// Add a message to its channel or thread.
    pub fn with_message(mut self, message: Message) -> Self {
        self.state_mut().record_message(message);
        self
    }

    /// Make every message fetch against `channel` fail, as a missing
    /// permission would.
    pub fn with_failing_channel(mut self, channel: impl Into<Snowflake>) -> Self {
        self.state_mut().failing.insert(channel.into());
        self
    }

    /// Every stored message in `channel`, oldest first.
    pub fn messages_in(&self, channel: impl Into<Snowflake>) -> Vec<Message> {
        self.state()
            .messages
            .get(&channel.into())
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl Directory for MemoryDirectory {
    fn servers(&self) -> Vec<Server> {
        let mut servers = self.state().servers.clone();
        servers.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        servers
    }

    fn channels(&self, server: &Server) -> Vec<Channel> {
        self.state()
            .channels
            .iter()
            .filter(|c| c.server_id == server.id)
            .cloned()
            .collect()
    }

    fn threads(&self, forum: &Channel) -> Vec<Thread> {
        self.state()
            .threads
            .iter()
            .filter(|t| t.forum_id == forum.id)
            .cloned()
            .collect()
    }

    async fn fetch_server(&self, id: Snowflake) -> DiscordResult<Server> {
        self.state()
            .servers
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| unknown("Guild"))
    }

    async fn fetch_channel(&self, id: Snowflake) -> DiscordResult<Channel> {
        let state = self.state();
        if let Some(channel) = state.channels.iter().find(|c| c.id == id) {
            return Ok(channel.clone());
        }
        state
            .threads
            .iter()
            .find(|t| t.id == id)
            .and_then(|t| state.thread_as_channel(t))
            .ok_or_else(|| unknown("Channel"))
    }

    async fn messages_after(
        &self,
        channel: Snowflake,
        after: Snowflake,
        limit: u8,
    ) -> DiscordResult<Vec<Message>> {
        let state = self.state();
        state.ensure_readable(channel)?;
        // The platform returns the oldest `limit` messages past the cursor.
        let mut page: Vec<Message> = state
            .messages
            .get(&channel)
            .into_iter()
            .flatten()
            .filter(|m| m.id > after)
            .take(usize::from(limit))
            .cloned()
            .collect();
        page.reverse();
        debug!(%channel, %after, returned = page.len(), "Served messages after cursor");
        Ok(page)
    }

    async fn recent_messages(&self, channel: Snowflake, limit: u8) -> DiscordResult<Vec<Message>> {
        let state = self.state();
        state.ensure_readable(channel)?;
        Ok(state
            .messages
            .get(&channel)
            .into_iter()
            .flatten()
            .rev()
            .take(usize::from(limit))
            .cloned()
            .collect())
    }

    async fn message(&self, channel: Snowflake, id: Snowflake) -> DiscordResult<Message> {
        let state = self.state();
        state.ensure_readable(channel)?;
        state
            .messages
            .get(&channel)
            .and_then(|log| log.iter().find(|m| m.id == id))
            .cloned()
            .ok_or_else(|| unknown("Message"))
    }

    async fn send_message(&self, channel: Snowflake, content: &str) -> DiscordResult<Message> {
        let mut state = self.state();
        state.ensure_readable(channel)?;
        let id = state.next_id();
        let message = Message::new(id, channel, self.author.clone(), content);
        state.record_message(message.clone());
        Ok(message)
    }

    async fn create_forum_post(
        &self,
        forum: Snowflake,
        title: &str,
        content: &str,
    ) -> DiscordResult<Thread> {
        let mut state = self.state();
        if !state
            .channels
            .iter()
            .any(|c| c.id == forum && c.kind == ChannelKind::Forum)
        {
            return Err(unknown("Channel"));
        }
        // A forum post's starter message shares the thread's ID.
        let id = state.next_id();
        state.threads.push(Thread::new(id, forum, title));
        state.record_message(Message::new(id, id, self.author.clone(), content));
        state
            .threads
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| unknown("Channel"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> MemoryDirectory {
        let directory = MemoryDirectory::new()
            .with_server(Server::new(1u64, "Guild"))
            .with_channel(Channel::new(10u64, 1u64, "general", ChannelKind::Text));
        (1..=5u64).fold(directory, |d, n| {
            d.with_message(Message::new(n << 22, 10u64, "user", format!("m{n}")))
        })
    }

    #[tokio::test]
    async fn test_messages_after_is_exclusive_and_newest_first() {
        let directory = fixture();
        let page = directory
            .messages_after(Snowflake::new(10), Snowflake::new(2 << 22), 2)
            .await
            .unwrap();
        let contents: Vec<&str> = page.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m4", "m3"]);
    }

    #[tokio::test]
    async fn test_recent_messages_are_newest_first() {
        let directory = fixture();
        let page = directory
            .recent_messages(Snowflake::new(10), 2)
            .await
            .unwrap();
        let contents: Vec<&str> = page.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m5", "m4"]);
    }

    #[tokio::test]
    async fn test_failing_channel_reports_platform_error() {
        let directory = fixture().with_failing_channel(10u64);
        let err = directory
            .recent_messages(Snowflake::new(10), 1)
            .await
            .unwrap_err();
        assert!(matches!(err.kind(), DiscordErrorKind::Platform(_)));
    }

    #[tokio::test]
    async fn test_send_updates_last_message() {
        let directory = fixture();
        let sent = directory
            .send_message(Snowflake::new(10), "hello")
            .await
            .unwrap();
        let server = Server::new(1u64, "Guild");
        let channel = &directory.channels(&server)[0];
        assert_eq!(channel.last_message_id, Some(sent.id));
        assert_eq!(directory.messages_in(10u64).len(), 6);
    }

    #[tokio::test]
    async fn test_forum_post_opens_thread() {
        let directory = MemoryDirectory::new()
            .with_server(Server::new(1u64, "Guild"))
            .with_channel(Channel::new(20u64, 1u64, "ideas", ChannelKind::Forum));
        let thread = directory
            .create_forum_post(Snowflake::new(20), "Title", "Body")
            .await
            .unwrap();
        assert_eq!(thread.name, "Title");
        assert_eq!(thread.message_count, Some(1));
        let forum = directory.fetch_channel(Snowflake::new(20)).await.unwrap();
        assert_eq!(directory.threads(&forum).len(), 1);
    }
}
