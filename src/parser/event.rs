//! Event record schema for pipeline callback logs.
//!
//! One record per lifecycle event (`chain_start`, `llm_end`, `tool_error`, ...)
//! as emitted by an instrumented pipeline's JSON logging callback. The `data`
//! payload is deliberately left opaque; its shape varies by event phase.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One raw telemetry entry from the instrumented pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// Event time in milliseconds since the Unix epoch
    ///
    /// Producers emit either a JSON number or an ISO 8601 string; both are
    /// accepted and normalized to epoch milliseconds on deserialization.
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<f64>,

    /// Lifecycle event name, conventionally suffixed `_start`, `_end` or `_error`
    #[serde(default)]
    pub event: String,

    /// Run identifier correlating partial records into one span
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,

    /// Run identifier of the parent unit of work, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_run_id: Option<String>,

    /// Explicit span classification, when the producer knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation_type: Option<String>,

    /// Display name hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Opaque event payload
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// Deserialize a timestamp from either a number or an ISO 8601 string
///
/// **Private** - serde hook for EventRecord
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(timestamp_from_value))
}

/// Convert a JSON timestamp value to epoch milliseconds
///
/// **Public** - also used by tests; returns None for shapes that carry no
/// usable instant (duration is simply omitted downstream)
pub fn timestamp_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_iso_timestamp(s),
        _ => None,
    }
}

/// Parse an ISO 8601 timestamp string to epoch milliseconds
///
/// **Private** - handles both offset-aware RFC 3339 strings and the naive
/// `datetime.isoformat()` form (no zone suffix, assumed UTC)
fn parse_iso_timestamp(raw: &str) -> Option<f64> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.timestamp_millis() as f64);
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc().timestamp_millis() as f64)
}
