//! Serenity event handler for the Vasari session.
//!
//! The handler keeps no state of its own: serenity's cache holds the guild
//! and channel snapshots. It only reports readiness so startup can wait for
//! the cache to fill before the first tool call.

use serenity::all::{GuildId, Ready};
use serenity::async_trait;
use serenity::client::{Context, EventHandler};
use serenity::model::gateway::GatewayIntents;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{debug, info};

/// Event handler that signals when the guild cache is populated.
pub struct VasariHandler {
    cache_ready: Arc<Notify>,
}

impl VasariHandler {
    /// Create a handler that notifies `cache_ready` once every guild is cached.
    pub fn new(cache_ready: Arc<Notify>) -> Self {
        Self { cache_ready }
    }

    /// Gateway intents needed to see guilds, channels and message content.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT
    }
}

#[async_trait]
impl EventHandler for VasariHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            bot_user = %ready.user.name,
            bot_id = %ready.user.id,
            guilds = ready.guilds.len(),
            "Bot connected to Discord"
        );
        for guild in &ready.guilds {
            debug!(guild_id = %guild.id, "Bot is in guild");
        }
    }

    async fn cache_ready(&self, _ctx: Context, guilds: Vec<GuildId>) {
        info!(guilds = guilds.len(), "Guild cache ready");
        // Stores a permit if nobody is waiting yet.
        self.cache_ready.notify_one();
    }
}
