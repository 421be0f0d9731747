//! Entry Codec
//!
//! Converts entries to and from the persisted JSON form:
//!
//! ```text
//! { "value": <T>, "expirationTime": "<RFC 3339 UTC>" | null, "createdAt": "<RFC 3339 UTC>" }
//! ```
//!
//! Timestamps are written as strings with nanosecond precision so a decoded
//! entry re-encodes to the same text. Unknown fields are ignored on read.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::CacheEntry;

// == Decode Error ==
/// Stored text does not describe a well-formed entry.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Not JSON, or JSON of the wrong shape
    #[error("malformed entry: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A timestamp field is not a valid RFC 3339 instant
    #[error("invalid {field} timestamp '{value}'")]
    InvalidTimestamp { field: &'static str, value: String },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireEntryRef<'a, T> {
    value: &'a T,
    expiration_time: Option<String>,
    created_at: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEntry<T> {
    value: T,
    #[serde(default)]
    expiration_time: Option<String>,
    created_at: String,
}

// == Encode ==
/// Serializes an entry to its persisted text.
pub fn encode<T: Serialize>(entry: &CacheEntry<T>) -> Result<String, serde_json::Error> {
    serde_json::to_string(&WireEntryRef {
        value: &entry.value,
        expiration_time: entry.expires_at.map(format_timestamp),
        created_at: format_timestamp(entry.created_at),
    })
}

// == Decode ==
/// Parses persisted text back into an entry.
///
/// Decode with `T = serde::de::IgnoredAny` to read only the metadata.
pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<CacheEntry<T>, DecodeError> {
    let wire: WireEntry<T> = serde_json::from_str(raw)?;

    let created_at = parse_timestamp("createdAt", &wire.created_at)?;
    let expires_at = wire
        .expiration_time
        .as_deref()
        .map(|value| parse_timestamp("expirationTime", value))
        .transpose()?;

    Ok(CacheEntry::new(wire.value, created_at, expires_at))
}

/// RFC 3339, UTC `Z` suffix, nanosecond precision.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, DecodeError> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| DecodeError::InvalidTimestamp {
            field,
            value: value.to_string(),
        })
}
