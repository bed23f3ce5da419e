//! Fixed-format action timestamps.
//!
//! The feed renders timestamps as `YYYY-MM-DD HH:MM:SS`. The original data
//! relied on lexical string comparison being equivalent to chronological
//! order for this fixed-width format; here the value is parsed into a real
//! temporal type so a format drift breaks loudly at the boundary instead of
//! silently reordering records.

use chrono::{Duration, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// Render/parse format for the feed's timestamp strings.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A second-precision timestamp in the feed's local time.
///
/// Ordering is chronological. Serializes as the feed's fixed-width string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    #[must_use]
    pub const fn new(inner: NaiveDateTime) -> Self {
        Self(inner)
    }

    /// Current wall-clock time, truncated to second precision.
    #[must_use]
    pub fn now() -> Self {
        let local = chrono::Local::now().naive_local();
        Self(local.with_nanosecond_zeroed())
    }

    /// The timestamp `hours` hours before this one.
    #[must_use]
    pub fn hours_before(self, hours: i64) -> Self {
        Self(self.0 - Duration::hours(hours))
    }

    /// The timestamp `secs` seconds after this one.
    #[must_use]
    pub fn plus_seconds(self, secs: i64) -> Self {
        Self(self.0 + Duration::seconds(secs))
    }

    #[must_use]
    pub const fn inner(self) -> NaiveDateTime {
        self.0
    }
}

/// Truncation helper kept off the public surface.
trait ZeroNanos {
    fn with_nanosecond_zeroed(self) -> NaiveDateTime;
}

impl ZeroNanos for NaiveDateTime {
    fn with_nanosecond_zeroed(self) -> NaiveDateTime {
        use chrono::Timelike;
        self.with_nanosecond(0).unwrap_or(self)
    }
}

/// Error returned when a timestamp string does not match the feed format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTimestampError {
    pub got: String,
}

impl fmt::Display for ParseTimestampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid timestamp '{}' (expected {TIMESTAMP_FORMAT})",
            self.got
        )
    }
}

impl std::error::Error for ParseTimestampError {}

impl FromStr for Timestamp {
    type Err = ParseTimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT)
            .map(Self)
            .map_err(|_| ParseTimestampError { got: s.to_string() })
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
