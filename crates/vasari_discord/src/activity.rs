//! Recent-activity scan across a server's channels and forum threads.
//!
//! Each text or announcement channel, and each cached thread under a forum,
//! gets one bounded fetch of messages after the `since` cursor. Counts are
//! capped at [`MAX_FETCH`] per channel or thread: a busier channel
//! under-reports rather than triggering further pagination.

use crate::time::{serialize_iso8601, since_cursor};
use crate::{Channel, ChannelKind, Directory, MAX_FETCH, Server, Snowflake, text_channels};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Default number of channel fetches in flight at once.
pub const DEFAULT_SCAN_CONCURRENCY: usize = 4;

/// Activity found in one channel or thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    /// Channel or thread ID.
    pub id: Snowflake,
    /// Channel name, or `[Forum: <forum>] <thread>` for threads.
    pub name: String,
    /// Channel kind; `thread` for forum threads.
    #[serde(rename = "type", serialize_with = "serialize_kind")]
    pub kind: ChannelKind,
    /// Messages at or after the boundary (at most [`MAX_FETCH`]).
    pub message_count: usize,
    /// Newest counted message.
    #[serde(serialize_with = "serialize_iso8601")]
    pub last_message_at: DateTime<Utc>,
    /// Oldest counted message.
    #[serde(serialize_with = "serialize_iso8601")]
    pub oldest_new_message_at: DateTime<Utc>,
}

fn serialize_kind<S: serde::Serializer>(kind: &ChannelKind, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(kind.label())
}

/// Ranked scan output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityReport {
    /// Boundary that was scanned from.
    pub since: DateTime<Utc>,
    /// Records ordered by message count, highest first.
    pub records: Vec<ActivityRecord>,
    /// Channels and threads whose fetch failed and were left out.
    pub skipped: usize,
}

impl ActivityReport {
    /// Number of channels and threads with activity.
    pub fn total(&self) -> usize {
        self.records.len()
    }
}

/// Result of fetching one channel or thread.
#[derive(Debug)]
enum ScanOutcome {
    Active(ActivityRecord),
    Quiet,
    Skipped,
}

/// A channel or thread to fetch.
#[derive(Debug, Clone)]
struct ScanTarget {
    id: Snowflake,
    name: String,
    kind: ChannelKind,
}

/// Scans a server for channels with messages since a boundary.
pub struct ActivityScanner<'a> {
    directory: &'a dyn Directory,
    concurrency: usize,
}

impl<'a> ActivityScanner<'a> {
    /// Create a scanner with the default concurrency.
    pub fn new(directory: &'a dyn Directory) -> Self {
        Self {
            directory,
            concurrency: DEFAULT_SCAN_CONCURRENCY,
        }
    }

    /// Set how many fetches may be in flight at once (minimum 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Scan `server` for messages created at or after `since`.
    ///
    /// A failed fetch for one channel or thread is logged and skipped; it
    /// never fails the scan.
    #[instrument(skip(self, server), fields(server = %server.name, targets, skipped))]
    pub async fn scan(&self, server: &Server, since: DateTime<Utc>) -> ActivityReport {
        let cursor = since_cursor(since);
        let targets = self.targets(server);
        tracing::Span::current().record("targets", targets.len());
        debug!(%cursor, "Scanning with cursor");

        // `buffered` yields in input order, so ranking ties stay in channel order
        let outcomes: Vec<ScanOutcome> = stream::iter(targets)
            .map(|target| self.scan_target(target, cursor, since))
            .buffered(self.concurrency)
            .collect()
            .await;

        let skipped = outcomes
            .iter()
            .filter(|o| matches!(o, ScanOutcome::Skipped))
            .count();
        let mut records: Vec<ActivityRecord> = outcomes
            .into_iter()
            .filter_map(|o| match o {
                ScanOutcome::Active(record) => Some(record),
                ScanOutcome::Quiet | ScanOutcome::Skipped => None,
            })
            .collect();
        records.sort_by(|a, b| b.message_count.cmp(&a.message_count));

        tracing::Span::current().record("skipped", skipped);
        info!(active = records.len(), skipped, "Activity scan complete");

        ActivityReport {
            since,
            records,
            skipped,
        }
    }

    fn targets(&self, server: &Server) -> Vec<ScanTarget> {
        let mut targets = Vec::new();
        for channel in text_channels(self.directory, server) {
            match channel.kind {
                ChannelKind::Forum => targets.extend(self.forum_targets(&channel)),
                _ => targets.push(ScanTarget {
                    id: channel.id,
                    name: channel.name,
                    kind: channel.kind,
                }),
            }
        }
        targets
    }

    fn forum_targets(&self, forum: &Channel) -> Vec<ScanTarget> {
        let mut threads = self.directory.threads(forum);
        threads.sort_by_key(|t| t.id);
        threads
            .into_iter()
            .map(|thread| ScanTarget {
                id: thread.id,
                name: format!("[Forum: {}] {}", forum.name, thread.name),
                kind: ChannelKind::Thread,
            })
            .collect()
    }

    async fn scan_target(
        &self,
        target: ScanTarget,
        cursor: Snowflake,
        since: DateTime<Utc>,
    ) -> ScanOutcome {
        let messages = match self
            .directory
            .messages_after(target.id, cursor, MAX_FETCH)
            .await
        {
            Ok(messages) => messages,
            Err(e) => {
                warn!(
                    channel = %target.name,
                    id = %target.id,
                    error = %e.kind(),
                    "Skipping channel in activity scan"
                );
                return ScanOutcome::Skipped;
            }
        };

        // The cursor is a lower bound; re-check the exact instant.
        let fresh: Vec<DateTime<Utc>> = messages
            .iter()
            .map(|m| m.created_at)
            .filter(|created| *created >= since)
            .collect();

        let (Some(oldest), Some(newest)) = (fresh.iter().min(), fresh.iter().max()) else {
            return ScanOutcome::Quiet;
        };

        ScanOutcome::Active(ActivityRecord {
            id: target.id,
            name: target.name,
            kind: target.kind,
            message_count: fresh.len(),
            last_message_at: *newest,
            oldest_new_message_at: *oldest,
        })
    }
}
