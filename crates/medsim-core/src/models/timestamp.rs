//! Serde adapter for transcript timestamps.
//!
//! The backend writes either RFC 3339 instants or offset-less ISO date-times
//! (`2025-03-01T14:02:11.532871`). The latter are read as UTC.

use jiff::Timestamp;
use jiff::civil::DateTime;
use jiff::tz::TimeZone;
use serde::{Deserialize, Deserializer, Serializer};

use crate::error::CoreError;

pub fn parse_timestamp(raw: &str) -> Result<Timestamp, CoreError> {
    let raw = raw.trim();
    if let Ok(ts) = raw.parse::<Timestamp>() {
        return Ok(ts);
    }

    let invalid = |e: jiff::Error| CoreError::InvalidTimestamp {
        raw: raw.to_string(),
        reason: e.to_string(),
    };
    let civil: DateTime = raw.parse().map_err(invalid)?;
    let zoned = civil.to_zoned(TimeZone::UTC).map_err(invalid)?;
    Ok(zoned.timestamp())
}

pub fn serialize<S>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(ts)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}
