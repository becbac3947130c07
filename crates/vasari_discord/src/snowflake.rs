//! Discord snowflake arithmetic.
//!
//! A snowflake is a 64-bit ID whose high 42 bits hold milliseconds since the
//! Discord epoch. IDs are monotonic with creation time, which is what lets a
//! synthesized snowflake act as an "after" cursor for message queries.
//!
//! All arithmetic stays in integers: IDs exceed 2^53 and would be corrupted
//! by a round trip through `f64`.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Milliseconds between the Unix epoch and 2015-01-01T00:00:00Z.
pub const DISCORD_EPOCH_MS: i64 = 1_420_070_400_000;

/// Bits below the timestamp (worker, process and sequence).
const TIMESTAMP_SHIFT: u32 = 22;

/// A Discord platform ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Snowflake(u64);

impl Snowflake {
    /// Wrap a raw ID.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw 64-bit value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Milliseconds since the Unix epoch encoded in this ID.
    pub fn timestamp_ms(self) -> i64 {
        // 42 bits always fit in i64
        (self.0 >> TIMESTAMP_SHIFT) as i64 + DISCORD_EPOCH_MS
    }

    /// Creation instant encoded in this ID.
    pub fn created_at(self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.timestamp_ms())
            .single()
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Lowest snowflake for the given instant.
    ///
    /// The low 22 bits are zero, so any real ID minted in the same
    /// millisecond compares greater than or equal to it. Instants before the
    /// Discord epoch clamp to zero; instants past the 42-bit range saturate.
    pub fn from_datetime(instant: DateTime<Utc>) -> Self {
        let offset = instant.timestamp_millis().saturating_sub(DISCORD_EPOCH_MS);
        if offset <= 0 {
            return Self(0);
        }
        let shifted = (offset as u128) << TIMESTAMP_SHIFT;
        Self(u64::try_from(shifted).unwrap_or(u64::MAX))
    }

    /// Snowflake for the given instant with explicit low bits.
    ///
    /// Only the bottom 22 bits of `sequence` are used.
    pub fn from_parts(instant: DateTime<Utc>, sequence: u64) -> Self {
        let base = Self::from_datetime(instant).0;
        Self(base | (sequence & ((1 << TIMESTAMP_SHIFT) - 1)))
    }
}

impl From<u64> for Snowflake {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<Snowflake> for u64 {
    fn from(id: Snowflake) -> Self {
        id.0
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Snowflake {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Self)
    }
}

impl Serialize for Snowflake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

#[cfg(feature = "discord")]
mod serenity_ids {
    use super::Snowflake;
    use serenity::model::id::{ChannelId, GuildId, MessageId, UserId};

    macro_rules! id_conversions {
        ($($id:ty),*) => {
            $(
                impl From<$id> for Snowflake {
                    fn from(id: $id) -> Self {
                        Snowflake::new(id.get())
                    }
                }
            )*
        };
    }

    id_conversions!(ChannelId, GuildId, MessageId, UserId);

    impl Snowflake {
        /// Convert to a serenity ID, which cannot be zero.
        pub(crate) fn to_id<T: From<u64>>(self) -> Option<T> {
            (self.get() != 0).then(|| T::from(self.get()))
        }
    }
}
