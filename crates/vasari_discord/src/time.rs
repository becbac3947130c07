//! Time boundaries and message cursors.
//!
//! Callers describe "since when" either relatively (`"24h"`, `"7d"`, `"30m"`)
//! or as an ISO 8601 instant. The platform cannot filter by timestamp, only
//! by "messages after this ID", so boundaries are turned into synthesized
//! snowflakes.

use crate::{DiscordError, DiscordErrorKind, DiscordResult, Snowflake};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeDelta, Utc};
use regex::Regex;
use serde::Serializer;
use std::sync::LazyLock;
use tracing::{debug, instrument};

static RELATIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)(h|d|m)$").expect("Valid relative time regex"));

/// Parse a boundary relative to the current wall-clock time.
///
/// # Errors
///
/// Returns [`DiscordErrorKind::InvalidTimeFormat`] when `input` is neither a
/// relative duration nor an ISO 8601 instant.
pub fn parse_boundary(input: &str) -> DiscordResult<DateTime<Utc>> {
    parse_boundary_at(input, Utc::now())
}

/// Parse a boundary relative to `now`.
///
/// Accepted forms:
/// - `<n>h`, `<n>d`, `<n>m`: hours, days or minutes (not months) before `now`
/// - RFC 3339 (`2024-01-01T00:00:00Z`, `2024-01-01T02:00:00+02:00`)
/// - minute precision with an offset (`2024-01-01T00:00Z`, `2024-01-01T02:00+02:00`)
/// - a date-time without offset (`2024-01-01T00:00:00`, `2024-01-01T00:00`), read as UTC
/// - a bare date (`2024-01-01`), read as midnight UTC
#[instrument(level = "debug", skip(now))]
pub fn parse_boundary_at(input: &str, now: DateTime<Utc>) -> DiscordResult<DateTime<Utc>> {
    let invalid = || DiscordError::new(DiscordErrorKind::InvalidTimeFormat(input.to_string()));

    if let Some(captures) = RELATIVE.captures(input) {
        let amount: i64 = captures[1].parse().map_err(|_| invalid())?;
        let delta = match &captures[2] {
            "h" => TimeDelta::try_hours(amount),
            "d" => TimeDelta::try_days(amount),
            _ => TimeDelta::try_minutes(amount),
        }
        .ok_or_else(invalid)?;
        debug!(amount, unit = &captures[2], "Parsed relative boundary");
        return now.checked_sub_signed(delta).ok_or_else(invalid);
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Ok(instant.with_timezone(&Utc));
    }
    if let Ok(instant) = DateTime::parse_from_str(input, "%Y-%m-%dT%H:%M%#z") {
        return Ok(instant.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc())
            .ok_or_else(invalid);
    }

    Err(invalid())
}

/// Lower-bound cursor for an instant.
///
/// Any message with a strictly greater ID was created at or after `instant`.
pub fn instant_to_cursor(instant: DateTime<Utc>) -> Snowflake {
    Snowflake::from_datetime(instant)
}

/// Cursor for "messages at or after `since`".
///
/// Synthesized cursors have zero low bits and the platform's `after` is
/// exclusive, so the cursor is taken one millisecond early to keep messages
/// created exactly at `since`.
pub fn since_cursor(since: DateTime<Utc>) -> Snowflake {
    let shifted = since
        .checked_sub_signed(TimeDelta::milliseconds(1))
        .unwrap_or(since);
    instant_to_cursor(shifted)
}

/// Render an instant as ISO 8601 with millisecond precision (`2024-01-01T00:00:00.000Z`).
pub fn to_iso8601(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serde adapter for [`to_iso8601`].
pub fn serialize_iso8601<S: Serializer>(
    instant: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_iso8601(instant))
}
