//! Discord-specific error types.
//!
//! Resolution failures carry the candidates that were considered so the
//! caller can retry with a disambiguated identifier. The rendered text of
//! each kind is what a tool caller ultimately sees.

use derive_getters::Getters;
use serde::Serialize;

/// A server or channel that matched (or could have matched) an identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Candidate {
    /// Display name of the entity.
    pub name: String,
    /// Platform ID of the entity.
    pub id: u64,
}

impl Candidate {
    /// Create a candidate from a name and ID.
    pub fn new(name: impl Into<String>, id: u64) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }
}

/// Discord error variants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum DiscordErrorKind {
    /// The client is not connected to any server.
    #[display("Bot is not connected to any servers")]
    NoServers,

    /// More than one server could satisfy the request.
    ///
    /// Without an identifier the candidates are every connected server;
    /// with one they are the servers sharing that name.
    #[display("{}", describe_ambiguous_server(identifier.as_deref(), candidates))]
    AmbiguousServer {
        /// Identifier supplied by the caller, if any.
        identifier: Option<String>,
        /// Servers that matched.
        candidates: Vec<Candidate>,
    },

    /// No connected server matched the identifier.
    #[display("Server \"{identifier}\" not found. Available servers: {}", quoted(available))]
    ServerNotFound {
        /// Identifier supplied by the caller.
        identifier: String,
        /// Names of every connected server.
        available: Vec<String>,
    },

    /// No text-capable channel in the server matched the identifier.
    #[display(
        "Channel \"{identifier}\" not found in server \"{server}\". Available channels: {}",
        quoted(available)
    )]
    ChannelNotFound {
        /// Identifier supplied by the caller.
        identifier: String,
        /// Name of the server that was searched.
        server: String,
        /// Text-capable channel names, each prefixed with `#`.
        available: Vec<String>,
    },

    /// Several channels in the server share the requested name.
    #[display(
        "Multiple channels found with name \"{identifier}\" in server \"{server}\": {}. Please specify the channel ID.",
        describe_channels(candidates)
    )]
    AmbiguousChannel {
        /// Identifier supplied by the caller.
        identifier: String,
        /// Name of the server that was searched.
        server: String,
        /// Channels that matched.
        candidates: Vec<Candidate>,
    },

    /// A time boundary was neither relative nor ISO 8601.
    #[display(
        "Invalid time format \"{_0}\". Use ISO 8601 (e.g., \"2024-01-01T00:00:00Z\") or relative time (e.g., \"1h\", \"24h\", \"7d\")"
    )]
    InvalidTimeFormat(String),

    /// The platform rejected a fetch or write (missing entity, permissions, HTTP).
    #[display("Discord API error: {_0}")]
    Platform(String),

    /// The authentication token was not supplied.
    #[display("{_0} environment variable is not set")]
    MissingCredential(String),

    /// Connecting to the gateway failed.
    #[display("Connection failed: {_0}")]
    ConnectionFailed(String),
}

fn quoted(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("\"{name}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_ambiguous_server(identifier: Option<&str>, candidates: &[Candidate]) -> String {
    match identifier {
        None => {
            let names: Vec<String> = candidates.iter().map(|c| c.name.clone()).collect();
            format!(
                "Bot is in multiple servers. Please specify server name or ID. Available servers: {}",
                quoted(&names)
            )
        }
        Some(identifier) => {
            let list = candidates
                .iter()
                .map(|c| format!("{} (ID: {})", c.name, c.id))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "Multiple servers found with name \"{identifier}\": {list}. Please specify the server ID."
            )
        }
    }
}

fn describe_channels(candidates: &[Candidate]) -> String {
    candidates
        .iter()
        .map(|c| format!("#{} ({})", c.name, c.id))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Discord error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, Getters)]
#[display("Discord Error: {} at line {} in {}", kind, line, file)]
pub struct DiscordError {
    kind: DiscordErrorKind,
    line: u32,
    file: &'static str,
}

impl DiscordError {
    /// Create a new DiscordError with automatic location tracking.
    ///
    /// # Example
    /// ```
    /// use vasari_discord::{DiscordError, DiscordErrorKind};
    ///
    /// let err = DiscordError::new(DiscordErrorKind::NoServers);
    /// assert_eq!(err.kind(), &DiscordErrorKind::NoServers);
    /// ```
    #[track_caller]
    pub fn new(kind: DiscordErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether the caller can fix this by changing its arguments.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self.kind,
            DiscordErrorKind::MissingCredential(_) | DiscordErrorKind::ConnectionFailed(_)
        )
    }
}

impl From<DiscordErrorKind> for DiscordError {
    #[track_caller]
    fn from(kind: DiscordErrorKind) -> Self {
        DiscordError::new(kind)
    }
}

/// Result type for Discord operations.
pub type DiscordResult<T> = Result<T, DiscordError>;

#[cfg(feature = "discord")]
impl From<serenity::Error> for DiscordError {
    #[track_caller]
    fn from(err: serenity::Error) -> Self {
        DiscordError::new(DiscordErrorKind::Platform(err.to_string()))
    }
}
