//! Gateway session lifecycle.

use crate::handler::VasariHandler;
use crate::{DiscordError, DiscordErrorKind, DiscordResult, SerenityDirectory};
use serenity::Client;
use serenity::gateway::ShardManager;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

/// A running gateway connection and the directory that reads from it.
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// use vasari_discord::DiscordSession;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let token = std::env::var("DISCORD_TOKEN")?;
///     let session = DiscordSession::connect(&token, Duration::from_secs(30)).await?;
///     println!("{} servers", vasari_discord::Directory::servers(session.directory().as_ref()).len());
///     session.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct DiscordSession {
    directory: Arc<SerenityDirectory>,
    shard_manager: Arc<ShardManager>,
    gateway: JoinHandle<()>,
}

impl DiscordSession {
    /// Log in and start the gateway in the background.
    ///
    /// Waits up to `ready_timeout` for the guild cache to fill. Timing out is
    /// not an error: the session keeps running and the cache fills as guilds
    /// arrive.
    ///
    /// # Errors
    ///
    /// `ConnectionFailed` if the client cannot be built or the gateway stops
    /// before the cache is ready (an invalid token, for instance).
    #[instrument(skip(token), fields(token_len = token.len()))]
    pub async fn connect(token: &str, ready_timeout: Duration) -> DiscordResult<Self> {
        let cache_ready = Arc::new(Notify::new());
        let handler = VasariHandler::new(cache_ready.clone());
        let intents = VasariHandler::intents();
        info!(?intents, "Building Serenity client");

        let mut client = Client::builder(token, intents)
            .event_handler(handler)
            .await
            .map_err(|e| {
                DiscordError::new(DiscordErrorKind::ConnectionFailed(format!(
                    "Failed to build client: {e}"
                )))
            })?;

        let directory = Arc::new(SerenityDirectory::new(
            client.cache.clone(),
            client.http.clone(),
        ));
        let shard_manager = client.shard_manager.clone();

        let (stopped_tx, mut stopped_rx) = tokio::sync::oneshot::channel::<String>();
        let gateway = tokio::spawn(async move {
            let reason = match client.start().await {
                Ok(()) => "gateway closed".to_string(),
                Err(e) => {
                    error!(error = %e, "Discord client stopped");
                    e.to_string()
                }
            };
            let _ = stopped_tx.send(reason);
        });

        tokio::select! {
            () = cache_ready.notified() => info!("Discord session ready"),
            stopped = &mut stopped_rx => {
                let reason = stopped.unwrap_or_else(|_| "gateway task aborted".to_string());
                return Err(DiscordError::new(DiscordErrorKind::ConnectionFailed(reason)));
            }
            () = tokio::time::sleep(ready_timeout) => {
                warn!(timeout_secs = ready_timeout.as_secs(), "Guild cache not ready, continuing");
            }
        }

        Ok(Self {
            directory,
            shard_manager,
            gateway,
        })
    }

    /// The directory backed by this session.
    pub fn directory(&self) -> Arc<SerenityDirectory> {
        self.directory.clone()
    }

    /// Close every shard and wait for the gateway task to finish.
    #[instrument(skip(self))]
    pub async fn shutdown(self) {
        self.shard_manager.shutdown_all().await;
        if let Err(e) = self.gateway.await {
            warn!(error = %e, "Gateway task did not finish cleanly");
        }
        info!("Discord session closed");
    }
}
