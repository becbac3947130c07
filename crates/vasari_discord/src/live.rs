//! [`Directory`] backed by a serenity cache and HTTP client.

use crate::{
    Channel, ChannelKind, Directory, DiscordError, DiscordErrorKind, DiscordResult, Message,
    Server, Snowflake, Thread,
};
use async_trait::async_trait;
use serenity::all::{
    Cache, Channel as SerenityChannel, ChannelId, ChannelType, CreateForumPost, CreateMessage,
    GetMessages, GuildChannel, GuildId, Http, MessageId,
};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Map serenity's channel type onto the kinds the tools distinguish.
fn channel_kind(kind: ChannelType) -> ChannelKind {
    match kind {
        ChannelType::Text => ChannelKind::Text,
        ChannelType::News => ChannelKind::Announcement,
        ChannelType::Forum => ChannelKind::Forum,
        ChannelType::PublicThread | ChannelType::PrivateThread | ChannelType::NewsThread => {
            ChannelKind::Thread
        }
        ChannelType::Voice | ChannelType::Stage => ChannelKind::Voice,
        ChannelType::Category => ChannelKind::Category,
        _ => ChannelKind::Other,
    }
}

fn to_channel(gc: &GuildChannel) -> Channel {
    let mut channel = Channel::new(gc.id, gc.guild_id, gc.name.clone(), channel_kind(gc.kind))
        .with_position(gc.position)
        .with_nsfw(gc.nsfw);
    if let Some(topic) = gc.topic.as_ref().filter(|t| !t.is_empty()) {
        channel = channel.with_topic(topic.clone());
    }
    if let Some(parent) = gc.parent_id {
        channel = channel.with_parent(parent);
    }
    if let Some(last) = gc.last_message_id {
        channel = channel.with_last_message(last);
    }
    channel
}

fn to_thread(gc: &GuildChannel) -> Thread {
    let forum = gc.parent_id.map(Snowflake::from).unwrap_or_default();
    let mut thread = Thread::new(gc.id, forum, gc.name.clone());
    if let Some(count) = gc.message_count {
        thread = thread.with_message_count(count);
    }
    if let Some(last) = gc.last_message_id {
        thread = thread.with_last_message(last);
    }
    if let Some(owner) = gc.owner_id {
        thread = thread.with_owner(owner);
    }
    thread
}

fn to_message(msg: &serenity::model::channel::Message) -> Message {
    Message::new(msg.id, msg.channel_id, msg.author.tag(), msg.content.clone())
}

fn channel_id(id: Snowflake) -> DiscordResult<ChannelId> {
    id.to_id()
        .ok_or_else(|| DiscordError::new(DiscordErrorKind::Platform("Unknown Channel".to_string())))
}

/// Live directory reading guilds and channels from the gateway cache.
#[derive(Clone)]
pub struct SerenityDirectory {
    cache: Arc<Cache>,
    http: Arc<Http>,
}

impl SerenityDirectory {
    /// Wrap a client's cache and HTTP handle.
    pub fn new(cache: Arc<Cache>, http: Arc<Http>) -> Self {
        Self { cache, http }
    }
}

#[async_trait]
impl Directory for SerenityDirectory {
    fn servers(&self) -> Vec<Server> {
        let mut servers: Vec<Server> = self
            .cache
            .guilds()
            .into_iter()
            .filter_map(|id| self.cache.guild(id).map(|g| Server::new(g.id, g.name.clone())))
            .collect();
        servers.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        servers
    }

    fn channels(&self, server: &Server) -> Vec<Channel> {
        let Some(guild_id) = server.id.to_id::<GuildId>() else {
            return Vec::new();
        };
        self.cache
            .guild(guild_id)
            .map(|g| g.channels.values().map(to_channel).collect())
            .unwrap_or_default()
    }

    fn threads(&self, forum: &Channel) -> Vec<Thread> {
        let (Some(guild_id), Some(forum_id)) = (
            forum.server_id.to_id::<GuildId>(),
            forum.id.to_id::<ChannelId>(),
        ) else {
            return Vec::new();
        };
        self.cache
            .guild(guild_id)
            .map(|g| {
                g.threads
                    .iter()
                    .filter(|t| t.parent_id == Some(forum_id))
                    .map(to_thread)
                    .collect()
            })
            .unwrap_or_default()
    }

    #[instrument(skip(self))]
    async fn fetch_server(&self, id: Snowflake) -> DiscordResult<Server> {
        let guild_id: GuildId = id.to_id().ok_or_else(|| {
            DiscordError::new(DiscordErrorKind::Platform("Unknown Guild".to_string()))
        })?;
        // The cache guard must not live across the await below.
        let cached = self
            .cache
            .guild(guild_id)
            .map(|g| Server::new(g.id, g.name.clone()));
        if let Some(server) = cached {
            return Ok(server);
        }
        debug!("Guild not cached, fetching over HTTP");
        let guild = self.http.get_guild(guild_id).await?;
        Ok(Server::new(guild.id, guild.name))
    }

    #[instrument(skip(self))]
    async fn fetch_channel(&self, id: Snowflake) -> DiscordResult<Channel> {
        match self.http.get_channel(channel_id(id)?).await? {
            SerenityChannel::Guild(gc) => Ok(to_channel(&gc)),
            _ => Err(DiscordError::new(DiscordErrorKind::Platform(
                "Channel is not part of a server".to_string(),
            ))),
        }
    }

    #[instrument(skip(self))]
    async fn messages_after(
        &self,
        channel: Snowflake,
        after: Snowflake,
        limit: u8,
    ) -> DiscordResult<Vec<Message>> {
        // A zero cursor means "everything"; the lowest valid ID means the same.
        let after = after.to_id().unwrap_or(MessageId::new(1));
        let messages = channel_id(channel)?
            .messages(&self.http, GetMessages::new().after(after).limit(limit))
            .await?;
        debug!(returned = messages.len(), "Fetched messages after cursor");
        Ok(messages.iter().map(to_message).collect())
    }

    #[instrument(skip(self))]
    async fn recent_messages(&self, channel: Snowflake, limit: u8) -> DiscordResult<Vec<Message>> {
        let messages = channel_id(channel)?
            .messages(&self.http, GetMessages::new().limit(limit))
            .await?;
        Ok(messages.iter().map(to_message).collect())
    }

    #[instrument(skip(self))]
    async fn message(&self, channel: Snowflake, id: Snowflake) -> DiscordResult<Message> {
        let message_id: MessageId = id.to_id().ok_or_else(|| {
            DiscordError::new(DiscordErrorKind::Platform("Unknown Message".to_string()))
        })?;
        let message = channel_id(channel)?.message(&self.http, message_id).await?;
        Ok(to_message(&message))
    }

    #[instrument(skip(self, content), fields(content_len = content.len()))]
    async fn send_message(&self, channel: Snowflake, content: &str) -> DiscordResult<Message> {
        let message = channel_id(channel)?.say(&self.http, content).await?;
        Ok(to_message(&message))
    }

    #[instrument(skip(self, content), fields(content_len = content.len()))]
    async fn create_forum_post(
        &self,
        forum: Snowflake,
        title: &str,
        content: &str,
    ) -> DiscordResult<Thread> {
        let post = CreateForumPost::new(title, CreateMessage::new().content(content));
        let thread = channel_id(forum)?.create_forum_post(&self.http, post).await?;
        Ok(to_thread(&thread))
    }
}
