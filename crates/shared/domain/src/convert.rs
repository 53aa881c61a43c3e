//! Timestamp codec for persisted records.
//!
//! The backing store has no native temporal type, so timestamp-with-offset
//! values are stored as ISO-8601 round-trip strings with seven fractional
//! digits, e.g. `2024-01-02T03:04:05.0000000+00:00`. Absent values are
//! stored as nulls, never as empty strings.

use chrono::{DateTime, FixedOffset, Timelike};

use crate::error::{DomainError, DomainResult};

/// Parse format for the round-trip form. Fraction width is checked
/// separately because `%.f` accepts any digit count.
const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";

/// Length of an encoded timestamp: 19 date-time chars, a dot, seven
/// fraction digits and a six-char offset.
const ENCODED_LEN: usize = 33;

/// Encode a timestamp in the round-trip form.
pub fn encode_timestamp(value: &DateTime<FixedOffset>) -> String {
    format!(
        "{}.{:07}{}",
        value.format("%Y-%m-%dT%H:%M:%S"),
        value.nanosecond() / 100,
        value.format("%:z"),
    )
}

/// Decode a round-trip timestamp string, preserving its UTC offset.
pub fn decode_timestamp(text: &str) -> DomainResult<DateTime<FixedOffset>> {
    let value = DateTime::parse_from_str(text, PARSE_FORMAT)
        .map_err(|e| DomainError::format(format!("bad timestamp {text:?}: {e}")))?;
    if text.len() != ENCODED_LEN || text.as_bytes()[19] != b'.' {
        return Err(DomainError::format(format!(
            "bad timestamp {text:?}: expected seven fractional digits"
        )));
    }
    Ok(value)
}

/// Serde adapter for optional timestamp fields on persisted rows.
pub mod datetime_offset {
    use chrono::{DateTime, FixedOffset};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(
        value: &Option<DateTime<FixedOffset>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_some(&super::encode_timestamp(ts)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => super::decode_timestamp(&text)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
