//! Channel resolution within a resolved server.

use crate::{
    Candidate, Channel, Directory, DiscordError, DiscordErrorKind, DiscordResult, Server,
    Snowflake,
};
use tracing::{debug, instrument};

/// Text-capable channels of `server`, ordered by position then ID.
pub fn text_channels(directory: &dyn Directory, server: &Server) -> Vec<Channel> {
    let mut channels: Vec<Channel> = directory
        .channels(server)
        .into_iter()
        .filter(Channel::is_text_capable)
        .collect();
    channels.sort_by_key(|c| (c.position, c.id));
    channels
}

/// Resolve `identifier` to one text-capable channel of `server`.
///
/// A direct fetch by ID is tried first and accepted only when the channel
/// belongs to `server` and is text-capable. Otherwise the cached channels are
/// matched by name, case-insensitively, with or without a leading `#`.
///
/// # Errors
///
/// `ChannelNotFound` (listing every text-capable `#name`) or
/// `AmbiguousChannel` (listing each match with its ID).
#[instrument(skip(directory, server), fields(server = %server.name))]
pub async fn resolve_channel(
    directory: &dyn Directory,
    server: &Server,
    identifier: &str,
) -> DiscordResult<Channel> {
    if let Ok(id) = identifier.parse::<Snowflake>() {
        match directory.fetch_channel(id).await {
            Ok(channel) if channel.server_id == server.id && channel.is_text_capable() => {
                debug!(channel = %channel.name, "Resolved channel by ID");
                return Ok(channel);
            }
            Ok(channel) => debug!(
                channel = %channel.name,
                kind = channel.kind.label(),
                "Fetched channel is outside the server or not text-capable"
            ),
            Err(e) => debug!(error = %e.kind(), "Channel ID lookup failed, trying name"),
        }
    }

    let wanted = identifier.to_lowercase();
    let bare = wanted.strip_prefix('#').unwrap_or(&wanted);
    let channels = text_channels(directory, server);
    let mut matches: Vec<Channel> = channels
        .iter()
        .filter(|c| c.name.to_lowercase() == bare)
        .cloned()
        .collect();

    match matches.len() {
        0 => Err(DiscordError::new(DiscordErrorKind::ChannelNotFound {
            identifier: identifier.to_string(),
            server: server.name.clone(),
            available: channels.iter().map(|c| format!("#{}", c.name)).collect(),
        })),
        1 => {
            let channel = matches.remove(0);
            debug!(channel = %channel.name, id = %channel.id, "Resolved channel by name");
            Ok(channel)
        }
        _ => Err(DiscordError::new(DiscordErrorKind::AmbiguousChannel {
            identifier: identifier.to_string(),
            server: server.name.clone(),
            candidates: matches
                .iter()
                .map(|c| Candidate::new(c.name.clone(), c.id.get()))
                .collect(),
        })),
    }
}
