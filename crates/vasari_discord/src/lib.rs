//! Discord resolution and activity scanning for Vasari.
//!
//! This crate turns the loose identifiers an assistant supplies ("general",
//! "#General", a raw snowflake, "24h") into concrete servers, channels and
//! message cursors, and performs the reads and writes the MCP tools expose.
//!
//! # Layers
//!
//! - [`parse_boundary`] / [`since_cursor`] - time boundaries to snowflake cursors
//! - [`resolve_server`] - optional server identifier to one server
//! - [`resolve_channel`] - channel identifier to one text-capable channel
//! - [`ActivityScanner`] - per-channel message counts since a boundary
//! - [`operations`] - the read, send and list operations behind each tool
//!
//! Everything above talks to the platform through the [`Directory`] trait.
//! [`SerenityDirectory`] backs it with a live gateway session (requires the
//! `discord` feature); [`MemoryDirectory`] backs it with in-process fixtures.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod activity;
mod channel;
mod directory;
mod error;
mod guild;
mod memory;
mod model;
pub mod operations;
mod snowflake;
mod time;

#[cfg(feature = "discord")]
mod client;
#[cfg(feature = "discord")]
mod handler;
#[cfg(feature = "discord")]
mod live;

pub use activity::{ActivityRecord, ActivityReport, ActivityScanner, DEFAULT_SCAN_CONCURRENCY};
pub use channel::{resolve_channel, text_channels};
pub use directory::{Directory, MAX_FETCH};
pub use error::{Candidate, DiscordError, DiscordErrorKind, DiscordResult};
pub use guild::resolve_server;
pub use memory::MemoryDirectory;
pub use model::{Channel, ChannelKind, Message, Server, Thread};
pub use snowflake::{DISCORD_EPOCH_MS, Snowflake};
pub use time::{
    instant_to_cursor, parse_boundary, parse_boundary_at, serialize_iso8601, since_cursor,
    to_iso8601,
};

#[cfg(feature = "discord")]
pub use client::DiscordSession;
#[cfg(feature = "discord")]
pub use handler::VasariHandler;
#[cfg(feature = "discord")]
pub use live::SerenityDirectory;
