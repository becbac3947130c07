//! Test utilities for vasari_discord tests.
//!
//! Fixtures are built on [`MemoryDirectory`] with fixed instants so scans
//! never depend on the wall clock.

#![allow(dead_code)]

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use vasari_discord::{Channel, ChannelKind, MemoryDirectory, Message, Server, Snowflake, Thread};

pub const GUILD: u64 = 1;
pub const CATEGORY: u64 = 5;
pub const GENERAL: u64 = 10;
pub const RANDOM: u64 = 11;
pub const ANNOUNCEMENTS: u64 = 12;
pub const VOICE: u64 = 13;
pub const IDEAS: u64 = 20;
pub const IDEAS_THREAD: u64 = 21;

/// Boundary used by scan fixtures.
pub fn since() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Message in `channel` created `offset_secs` after [`since`] (negative for before).
pub fn message_at(channel: u64, offset_secs: i64, seq: u64, content: &str) -> Message {
    let instant = since() + TimeDelta::seconds(offset_secs);
    Message::new(
        Snowflake::from_parts(instant, seq),
        channel,
        "alice#0001",
        content,
    )
}

/// Add `count` messages to `channel`, one second apart starting at `start_secs`.
pub fn with_burst(
    directory: MemoryDirectory,
    channel: u64,
    start_secs: i64,
    count: usize,
) -> MemoryDirectory {
    (0..count).fold(directory, |d, i| {
        let offset = start_secs + i as i64;
        d.with_message(message_at(channel, offset, i as u64, &format!("msg {i}")))
    })
}

pub fn guild() -> Server {
    Server::new(GUILD, "Test Guild")
}

/// One server with a category, two text channels, an announcement channel,
/// a voice channel and a forum with one thread.
pub fn single_guild() -> MemoryDirectory {
    MemoryDirectory::new()
        .with_server(guild())
        .with_channel(Channel::new(CATEGORY, GUILD, "Chat", ChannelKind::Category))
        .with_channel(
            Channel::new(GENERAL, GUILD, "general", ChannelKind::Text)
                .with_parent(CATEGORY)
                .with_position(0)
                .with_topic("Anything goes"),
        )
        .with_channel(
            Channel::new(RANDOM, GUILD, "random", ChannelKind::Text)
                .with_parent(CATEGORY)
                .with_position(1),
        )
        .with_channel(
            Channel::new(ANNOUNCEMENTS, GUILD, "announcements", ChannelKind::Announcement)
                .with_position(2),
        )
        .with_channel(Channel::new(VOICE, GUILD, "lounge", ChannelKind::Voice).with_position(3))
        .with_channel(Channel::new(IDEAS, GUILD, "ideas", ChannelKind::Forum).with_position(4))
        .with_thread(Thread::new(IDEAS_THREAD, IDEAS, "Better search").with_owner(42u64))
}
