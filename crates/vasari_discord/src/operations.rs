//! The read, send and list operations behind each tool.
//!
//! Each operation resolves its server and channel, talks to the
//! [`Directory`], and returns a serializable view whose JSON shape is what
//! the tool caller receives.

use crate::time::{parse_boundary, serialize_iso8601};
use crate::{
    ActivityRecord, ActivityScanner, Channel, ChannelKind, Directory, DiscordResult, Server,
    Snowflake, Thread, resolve_channel, resolve_server, text_channels,
};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Longest message the platform accepts, in characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Characters of a message kept in a forum post title.
pub const FORUM_TITLE_CHARS: usize = 50;

/// Title for a forum post opened with `text`.
///
/// ```
/// use vasari_discord::operations::forum_title;
///
/// assert_eq!(forum_title("short"), "short");
/// assert_eq!(forum_title(&"x".repeat(60)), format!("{}...", "x".repeat(50)));
/// ```
pub fn forum_title(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(FORUM_TITLE_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// A message posted to a text or announcement channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageReceipt {
    /// Always `"success"`.
    pub status: &'static str,
    /// ID of the posted message.
    pub message_id: Snowflake,
    /// Channel name.
    pub channel: String,
    /// Server name.
    pub server: String,
}

/// A thread opened in a forum channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumPostReceipt {
    /// Always `"success"`.
    pub status: &'static str,
    /// ID of the new thread.
    pub thread_id: Snowflake,
    /// Title the thread was given.
    pub thread_name: String,
    /// Forum channel name.
    pub channel: String,
    /// Server name.
    pub server: String,
}

/// Outcome of [`send_message`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SendReceipt {
    /// Posted directly.
    Message(MessageReceipt),
    /// Opened as a forum thread.
    ForumPost(ForumPostReceipt),
}

/// Post `text` to a channel, or open a thread with it if the channel is a forum.
#[instrument(skip(directory, text), fields(text_len = text.len()))]
pub async fn send_message(
    directory: &dyn Directory,
    server: Option<&str>,
    channel: &str,
    text: &str,
) -> DiscordResult<SendReceipt> {
    let server = resolve_server(directory, server).await?;
    let channel = resolve_channel(directory, &server, channel).await?;

    if channel.kind == ChannelKind::Forum {
        let title = forum_title(text);
        let thread = directory.create_forum_post(channel.id, &title, text).await?;
        info!(forum = %channel.name, thread_id = %thread.id, "Forum post created");
        return Ok(SendReceipt::ForumPost(ForumPostReceipt {
            status: "success",
            thread_id: thread.id,
            thread_name: thread.name,
            channel: channel.name,
            server: server.name,
        }));
    }

    let sent = directory.send_message(channel.id, text).await?;
    info!(channel = %channel.name, message_id = %sent.id, "Message sent");
    Ok(SendReceipt::Message(MessageReceipt {
        status: "success",
        message_id: sent.id,
        channel: channel.name,
        server: server.name,
    }))
}

/// One item of [`read_messages`] output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    /// `#channel-name`.
    pub channel: String,
    /// Server name.
    pub server: String,
    /// Author tag.
    pub author: String,
    /// Message text.
    pub content: String,
    /// Creation instant.
    #[serde(serialize_with = "serialize_iso8601")]
    pub timestamp: DateTime<Utc>,
    /// Set when the item summarizes a forum thread.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<Snowflake>,
}

/// Read up to `limit` of the newest messages in a channel, newest first.
///
/// Forums have no messages of their own; reading one lists up to `limit`
/// of its active threads instead, newest first.
#[instrument(skip(directory))]
pub async fn read_messages(
    directory: &dyn Directory,
    server: Option<&str>,
    channel: &str,
    limit: u8,
) -> DiscordResult<Vec<MessageView>> {
    let server = resolve_server(directory, server).await?;
    let channel = resolve_channel(directory, &server, channel).await?;
    let label = format!("#{}", channel.name);

    if channel.kind == ChannelKind::Forum {
        let mut threads = directory.threads(&channel);
        threads.sort_by(|a, b| b.id.cmp(&a.id));
        return Ok(threads
            .into_iter()
            .take(usize::from(limit))
            .map(|thread| thread_summary(&thread, &label, &server))
            .collect());
    }

    let messages = directory.recent_messages(channel.id, limit).await?;
    info!(channel = %channel.name, returned = messages.len(), "Read messages");
    Ok(messages
        .into_iter()
        .map(|m| MessageView {
            channel: label.clone(),
            server: server.name.clone(),
            author: m.author,
            content: m.content,
            timestamp: m.created_at,
            thread_id: None,
        })
        .collect())
}

fn thread_summary(thread: &Thread, label: &str, server: &Server) -> MessageView {
    let owner = thread
        .owner_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let count = thread
        .message_count
        .map(|n| n.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    MessageView {
        channel: label.to_string(),
        server: server.name.clone(),
        author: format!("<Thread Owner ID: {owner}>"),
        content: format!("[Forum Thread] {} (Messages: {count})", thread.name),
        timestamp: thread.created_at(),
        thread_id: Some(thread.id),
    }
}

/// Last message of a channel or thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessagePreview {
    /// Message text.
    pub content: String,
    /// Author tag.
    pub author: String,
    /// Creation instant.
    #[serde(serialize_with = "serialize_iso8601")]
    pub timestamp: DateTime<Utc>,
}

/// A forum thread in [`list_channels`] output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadView {
    /// Thread ID.
    pub id: Snowflake,
    /// Thread title.
    pub name: String,
    /// Message count reported by the platform.
    pub message_count: Option<u32>,
    /// ID of the newest message.
    pub last_message_id: Option<Snowflake>,
    /// Preview of the newest message.
    pub last_message: Option<MessagePreview>,
}

/// Kind-specific part of a [`ChannelView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ChannelDetail {
    /// Text and announcement channels.
    Messages {
        /// Preview of the newest message.
        #[serde(rename = "lastMessage")]
        last_message: Option<MessagePreview>,
    },
    /// Forum channels.
    Forum {
        /// Number of cached active threads.
        #[serde(rename = "threadCount")]
        thread_count: usize,
        /// The threads themselves.
        threads: Vec<ThreadView>,
    },
}

/// One channel in [`list_channels`] output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelView {
    /// Channel ID.
    pub id: Snowflake,
    /// Channel name.
    pub name: String,
    /// `text`, `news` or `forum`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Name of the parent category.
    pub parent: Option<String>,
    /// Sort position.
    pub position: u16,
    /// Topic, empty when unset.
    pub topic: String,
    /// Age-restricted flag.
    pub nsfw: bool,
    /// Last message or forum threads.
    #[serde(flatten)]
    pub detail: ChannelDetail,
}

/// Output of [`list_channels`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelListing {
    /// Server name.
    pub server: String,
    /// Server ID.
    pub server_id: Snowflake,
    /// Text-capable channels by position.
    pub channels: Vec<ChannelView>,
    /// Number of channels listed.
    pub total_channels: usize,
}

/// List a server's text-capable channels with last-message previews.
#[instrument(skip(directory))]
pub async fn list_channels(
    directory: &dyn Directory,
    server: Option<&str>,
) -> DiscordResult<ChannelListing> {
    let server = resolve_server(directory, server).await?;
    let everything = directory.channels(&server);
    let channels = text_channels(directory, &server);

    let views = join_all(
        channels
            .iter()
            .map(|channel| channel_view(directory, channel, &everything)),
    )
    .await;

    info!(server = %server.name, channels = views.len(), "Listed channels");
    Ok(ChannelListing {
        server: server.name,
        server_id: server.id,
        total_channels: views.len(),
        channels: views,
    })
}

async fn channel_view(
    directory: &dyn Directory,
    channel: &Channel,
    everything: &[Channel],
) -> ChannelView {
    let parent = channel.parent_id.and_then(|parent| {
        everything
            .iter()
            .find(|c| c.id == parent)
            .map(|c| c.name.clone())
    });

    let detail = if channel.kind == ChannelKind::Forum {
        let mut threads = directory.threads(channel);
        threads.sort_by_key(|t| t.id);
        let views = join_all(threads.into_iter().map(|thread| async move {
            let last_message =
                preview(directory, thread.id, thread.last_message_id, &thread.name).await;
            ThreadView {
                id: thread.id,
                name: thread.name,
                message_count: thread.message_count,
                last_message_id: thread.last_message_id,
                last_message,
            }
        }))
        .await;
        ChannelDetail::Forum {
            thread_count: views.len(),
            threads: views,
        }
    } else {
        ChannelDetail::Messages {
            last_message: preview(directory, channel.id, channel.last_message_id, &channel.name)
                .await,
        }
    };

    ChannelView {
        id: channel.id,
        name: channel.name.clone(),
        kind: channel.kind.label(),
        parent,
        position: channel.position,
        topic: channel.topic.clone().unwrap_or_default(),
        nsfw: channel.nsfw,
        detail,
    }
}

async fn preview(
    directory: &dyn Directory,
    channel: Snowflake,
    last_message_id: Option<Snowflake>,
    name: &str,
) -> Option<MessagePreview> {
    let id = last_message_id?;
    match directory.message(channel, id).await {
        Ok(message) => Some(MessagePreview {
            content: message.content,
            author: message.author,
            timestamp: message.created_at,
        }),
        Err(e) => {
            warn!(channel = %name, error = %e.kind(), "Failed to fetch last message");
            None
        }
    }
}

/// Output of [`channels_with_new_messages`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityListing {
    /// Server name.
    pub server: String,
    /// Server ID.
    pub server_id: Snowflake,
    /// Resolved boundary.
    #[serde(serialize_with = "serialize_iso8601")]
    pub since: DateTime<Utc>,
    /// Active channels and threads, busiest first.
    pub channels: Vec<ActivityRecord>,
    /// Number of active channels and threads.
    pub total_channels_with_new_messages: usize,
}

/// Rank a server's channels and forum threads by messages since `since`.
///
/// `since` is a relative duration (`24h`, `7d`, `30m`) or an ISO 8601 instant.
#[instrument(skip(directory))]
pub async fn channels_with_new_messages(
    directory: &dyn Directory,
    server: Option<&str>,
    since: &str,
    concurrency: usize,
) -> DiscordResult<ActivityListing> {
    let server = resolve_server(directory, server).await?;
    let since = parse_boundary(since)?;
    let report = ActivityScanner::new(directory)
        .with_concurrency(concurrency)
        .scan(&server, since)
        .await;

    Ok(ActivityListing {
        server: server.name,
        server_id: server.id,
        since: report.since,
        total_channels_with_new_messages: report.total(),
        channels: report.records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forum_title_counts_characters_not_bytes() {
        let text = "é".repeat(51);
        let title = forum_title(&text);
        assert_eq!(title.chars().count(), 53);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn test_forum_title_at_limit_is_unchanged() {
        let text = "y".repeat(FORUM_TITLE_CHARS);
        assert_eq!(forum_title(&text), text);
    }

    #[test]
    fn test_receipt_shapes() {
        let receipt = SendReceipt::Message(MessageReceipt {
            status: "success",
            message_id: Snowflake::new(9),
            channel: "general".to_string(),
            server: "Guild".to_string(),
        });
        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["messageId"], "9");
        assert!(json.get("threadId").is_none());
    }
}
