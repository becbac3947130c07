//! Server resolution.
//!
//! Turns an optional, human-supplied server identifier into exactly one
//! server, or a failure that lists what the caller could have meant.

use crate::{Candidate, Directory, DiscordError, DiscordErrorKind, DiscordResult, Server, Snowflake};
use tracing::{debug, instrument};

/// Resolve `identifier` against the connected servers.
///
/// - No identifier: the single connected server, or `AmbiguousServer`
///   listing every server when there are several.
/// - Identifier: a direct fetch by ID first, then a case-insensitive exact
///   name match across the connected set.
///
/// # Errors
///
/// `NoServers`, `AmbiguousServer` or `ServerNotFound`, each carrying the
/// candidates considered.
#[instrument(skip(directory), fields(connected))]
pub async fn resolve_server(
    directory: &dyn Directory,
    identifier: Option<&str>,
) -> DiscordResult<Server> {
    let mut servers = directory.servers();
    tracing::Span::current().record("connected", servers.len());

    let Some(identifier) = identifier else {
        return match servers.len() {
            0 => Err(DiscordError::new(DiscordErrorKind::NoServers)),
            1 => Ok(servers.remove(0)),
            _ => Err(DiscordError::new(DiscordErrorKind::AmbiguousServer {
                identifier: None,
                candidates: candidates(&servers),
            })),
        };
    };

    if let Ok(id) = identifier.parse::<Snowflake>() {
        match directory.fetch_server(id).await {
            Ok(server) => {
                debug!(server = %server.name, "Resolved server by ID");
                return Ok(server);
            }
            Err(e) => debug!(error = %e.kind(), "Server ID lookup failed, trying name"),
        }
    }

    let wanted = identifier.to_lowercase();
    let mut matches: Vec<Server> = servers
        .iter()
        .filter(|server| server.name.to_lowercase() == wanted)
        .cloned()
        .collect();

    match matches.len() {
        0 => Err(DiscordError::new(DiscordErrorKind::ServerNotFound {
            identifier: identifier.to_string(),
            available: servers.iter().map(|s| s.name.clone()).collect(),
        })),
        1 => {
            let server = matches.remove(0);
            debug!(server = %server.name, id = %server.id, "Resolved server by name");
            Ok(server)
        }
        _ => Err(DiscordError::new(DiscordErrorKind::AmbiguousServer {
            identifier: Some(identifier.to_string()),
            candidates: candidates(&matches),
        })),
    }
}

fn candidates(servers: &[Server]) -> Vec<Candidate> {
    servers
        .iter()
        .map(|s| Candidate::new(s.name.clone(), s.id.get()))
        .collect()
}
