// crates/dockyards-core/src/core/time.rs
// ============================================================================
// Module: Dockyards Time Model
// Description: Canonical timestamps stored on objects and projected to views.
// Purpose: Provide second-precision RFC 3339 timestamps with stable ordering.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Object metadata and status conditions carry wall-clock timestamps. Values
//! are truncated to whole seconds when created so that write-then-read is
//! byte-identical across stores, and they serialize as RFC 3339 strings.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::Error as _;
use time::OffsetDateTime;
use time::UtcOffset;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Timestamp
// ============================================================================

/// Second-precision UTC timestamp.
///
/// # Invariants
/// - Values produced by [`Timestamp::now`] and [`Timestamp::from_unix_seconds`]
///   carry no sub-second component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(OffsetDateTime);

impl Timestamp {
    /// Returns the current time truncated to whole seconds.
    #[must_use]
    pub fn now() -> Self {
        Self::truncate(OffsetDateTime::now_utc())
    }

    /// Builds a timestamp from unix seconds.
    ///
    /// Returns `None` when the value is outside the representable range.
    #[must_use]
    pub fn from_unix_seconds(seconds: i64) -> Option<Self> {
        OffsetDateTime::from_unix_timestamp(seconds).ok().map(Self)
    }

    /// Wraps an arbitrary date-time, normalizing to UTC and dropping
    /// sub-second precision.
    #[must_use]
    pub fn truncate(value: OffsetDateTime) -> Self {
        let utc = value.to_offset(UtcOffset::UTC);
        Self(utc.replace_nanosecond(0).unwrap_or(utc))
    }

    /// Returns unix seconds.
    #[must_use]
    pub const fn unix_seconds(&self) -> i64 {
        self.0.unix_timestamp()
    }

    /// Returns the inner date-time.
    #[must_use]
    pub const fn as_datetime(&self) -> OffsetDateTime {
        self.0
    }

    /// Returns this timestamp shifted forward by `duration`, saturating.
    #[must_use]
    pub fn saturating_add(&self, duration: Duration) -> Self {
        let seconds = i64::try_from(duration.as_secs()).unwrap_or(i64::MAX);
        let shifted = self.0.unix_timestamp().saturating_add(seconds);
        Self::from_unix_seconds(shifted).unwrap_or(*self)
    }

    /// Formats the timestamp as RFC 3339.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.format(&Rfc3339).unwrap_or_else(|_| self.0.unix_timestamp().to_string())
    }

    /// Parses an RFC 3339 timestamp, truncating to seconds.
    ///
    /// # Errors
    ///
    /// Returns a parse error when the input is not RFC 3339.
    pub fn parse(value: &str) -> Result<Self, time::error::Parse> {
        OffsetDateTime::parse(value, &Rfc3339).map(Self::truncate)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions.")]

    use super::Timestamp;

    #[test]
    fn now_has_no_subsecond_component() {
        let now = Timestamp::now();
        assert_eq!(now.as_datetime().nanosecond(), 0);
    }

    #[test]
    fn rfc3339_round_trip_is_stable() {
        let ts = Timestamp::from_unix_seconds(1_700_000_000).unwrap();
        let encoded = serde_json::to_string(&ts).unwrap();
        assert_eq!(encoded, "\"2023-11-14T22:13:20Z\"");
        let decoded: Timestamp = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, ts);
    }
}
