//! Read-only views over the platform's guild, channel and message objects.
//!
//! These are owned snapshots: a [`Directory`](crate::Directory) copies what it
//! needs out of the live client cache, so nothing here borrows from it.

use crate::Snowflake;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A Discord server (guild).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Server {
    /// Platform ID.
    pub id: Snowflake,
    /// Display name; not unique across a connection.
    pub name: String,
}

impl Server {
    /// Create a server view.
    pub fn new(id: impl Into<Snowflake>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Channel discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    /// Plain text channel.
    Text,
    /// Announcement (news) channel.
    Announcement,
    /// Forum channel; its conversations live in threads.
    Forum,
    /// Thread under a text or forum channel.
    Thread,
    /// Voice or stage channel.
    Voice,
    /// Category grouping other channels.
    Category,
    /// Any kind this crate does not model.
    Other,
}

impl ChannelKind {
    /// Whether the channel can be addressed by the message tools.
    pub fn is_text_capable(self) -> bool {
        match self {
            ChannelKind::Text | ChannelKind::Announcement | ChannelKind::Forum => true,
            ChannelKind::Thread
            | ChannelKind::Voice
            | ChannelKind::Category
            | ChannelKind::Other => false,
        }
    }

    /// Short label used in tool output.
    pub fn label(self) -> &'static str {
        match self {
            ChannelKind::Text => "text",
            ChannelKind::Announcement => "news",
            ChannelKind::Forum => "forum",
            ChannelKind::Thread => "thread",
            ChannelKind::Voice => "voice",
            ChannelKind::Category => "category",
            ChannelKind::Other => "other",
        }
    }
}

/// A channel within a server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Channel {
    /// Platform ID.
    pub id: Snowflake,
    /// Owning server.
    pub server_id: Snowflake,
    /// Display name, without the leading `#`.
    pub name: String,
    /// Discriminant.
    pub kind: ChannelKind,
    /// Channel topic, if set.
    pub topic: Option<String>,
    /// Age-restricted flag.
    pub nsfw: bool,
    /// Parent category (or parent channel for threads).
    pub parent_id: Option<Snowflake>,
    /// Sort position within the server.
    pub position: u16,
    /// Most recent message, when the platform reports one.
    pub last_message_id: Option<Snowflake>,
}

impl Channel {
    /// Create a channel view with no topic, parent or last message.
    pub fn new(
        id: impl Into<Snowflake>,
        server_id: impl Into<Snowflake>,
        name: impl Into<String>,
        kind: ChannelKind,
    ) -> Self {
        Self {
            id: id.into(),
            server_id: server_id.into(),
            name: name.into(),
            kind,
            topic: None,
            nsfw: false,
            parent_id: None,
            position: 0,
            last_message_id: None,
        }
    }

    /// Set the topic.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Set the parent category.
    pub fn with_parent(mut self, parent_id: impl Into<Snowflake>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Set the sort position.
    pub fn with_position(mut self, position: u16) -> Self {
        self.position = position;
        self
    }

    /// Set the NSFW flag.
    pub fn with_nsfw(mut self, nsfw: bool) -> Self {
        self.nsfw = nsfw;
        self
    }

    /// Set the last message reference.
    pub fn with_last_message(mut self, id: impl Into<Snowflake>) -> Self {
        self.last_message_id = Some(id.into());
        self
    }

    /// Whether the channel can be addressed by the message tools.
    pub fn is_text_capable(&self) -> bool {
        self.kind.is_text_capable()
    }
}

/// A thread owned by a forum channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Thread {
    /// Platform ID.
    pub id: Snowflake,
    /// Owning forum channel.
    pub forum_id: Snowflake,
    /// Thread title.
    pub name: String,
    /// Approximate message count reported by the platform.
    pub message_count: Option<u32>,
    /// Most recent message, when the platform reports one.
    pub last_message_id: Option<Snowflake>,
    /// User who opened the thread.
    pub owner_id: Option<Snowflake>,
}

impl Thread {
    /// Create a thread view.
    pub fn new(
        id: impl Into<Snowflake>,
        forum_id: impl Into<Snowflake>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            forum_id: forum_id.into(),
            name: name.into(),
            message_count: None,
            last_message_id: None,
            owner_id: None,
        }
    }

    /// Set the message count.
    pub fn with_message_count(mut self, count: u32) -> Self {
        self.message_count = Some(count);
        self
    }

    /// Set the last message reference.
    pub fn with_last_message(mut self, id: impl Into<Snowflake>) -> Self {
        self.last_message_id = Some(id.into());
        self
    }

    /// Set the owner.
    pub fn with_owner(mut self, id: impl Into<Snowflake>) -> Self {
        self.owner_id = Some(id.into());
        self
    }

    /// Creation instant, derived from the thread ID.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.id.created_at()
    }
}

/// A message in a channel or thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Message {
    /// Platform ID.
    pub id: Snowflake,
    /// Channel or thread the message belongs to.
    pub channel_id: Snowflake,
    /// Author tag (`name` or `name#discriminator`).
    pub author: String,
    /// Text content.
    pub content: String,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a message whose creation instant is decoded from its ID.
    pub fn new(
        id: impl Into<Snowflake>,
        channel_id: impl Into<Snowflake>,
        author: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            id,
            channel_id: channel_id.into(),
            author: author.into(),
            content: content.into(),
            created_at: id.created_at(),
        }
    }
}
