//! # Temporal Types — UTC Timestamps
//!
//! Defines `Timestamp`, the UTC-only instant used for a policy's
//! `creation_time` and `update_time`. Both are written by the persistence
//! layer; this crate only carries them.
//!
//! ## Wire format
//!
//! RFC 3339 with a `Z` suffix and only as many fractional digits as the
//! value needs (`2026-01-15T12:00:00Z`, `2026-01-15T12:00:00.5Z`). Inputs
//! with a non-UTC offset are accepted and converted to UTC.
//!
//! The unset value is `0001-01-01T00:00:00Z`, which is what a freshly
//! constructed policy carries until persistence stamps it.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RegsyncError;

/// Seconds between 0001-01-01T00:00:00Z and the Unix epoch.
const ZERO_EPOCH_SECS: i64 = -62_135_596_800;

/// A UTC timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current UTC time.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// The unset timestamp (`0001-01-01T00:00:00Z`).
    pub fn zero() -> Self {
        Self(DateTime::from_timestamp(ZERO_EPOCH_SECS, 0).unwrap_or(DateTime::UNIX_EPOCH))
    }

    /// Whether this is the unset timestamp.
    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    /// Wrap a `chrono::DateTime<Utc>`.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parse an RFC 3339 string, converting any offset to UTC.
    pub fn parse(s: &str) -> Result<Self, RegsyncError> {
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| RegsyncError::InvalidTimestamp {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(dt.with_timezone(&Utc)))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as RFC 3339 with `Z` suffix.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
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
        let s = String::deserialize(deserializer)?;
        Timestamp::parse(&s).map_err(serde::de::Error::custom)
    }
}
