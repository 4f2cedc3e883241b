//! Callback log decoding.
//!
//! Accepts the two formats pipelines actually produce: a single JSON array
//! of event objects (what a file-based logging callback writes), or
//! line-delimited JSON with one event per line. Individual malformed entries
//! are skipped; only a document that yields no events at all is an error.

use super::event::EventRecord;
use crate::utils::error::ParseError;
use log::{debug, warn};
use serde_json::Value;

/// Decode raw log text into an ordered list of event records
///
/// **Public** - main entry point for log decoding
///
/// # Arguments
/// * `text` - Full contents of a callback log (JSON array or JSONL)
///
/// # Returns
/// Event records in input order; records missing `run_id` are kept here and
/// dropped later by the correlator.
///
/// # Errors
/// * `ParseError::InvalidFormat` - Document is neither a JSON array nor JSONL,
///   or every entry of a non-empty document failed to decode
pub fn parse_log_text(text: &str) -> Result<Vec<EventRecord>, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        debug!("Log text is empty, no events to decode");
        return Ok(Vec::new());
    }

    // Whole-document parse first: array form and single-object form
    if let Ok(document) = serde_json::from_str::<Value>(trimmed) {
        return parse_document(document);
    }

    // Fall back to line-delimited JSON
    parse_jsonl(trimmed)
}

/// Decode a fully-parsed JSON document
///
/// **Private** - internal helper for parse_log_text
fn parse_document(document: Value) -> Result<Vec<EventRecord>, ParseError> {
    match document {
        Value::Array(entries) => {
            let total = entries.len();
            let records = decode_entries(entries);

            if records.is_empty() && total > 0 {
                return Err(ParseError::InvalidFormat(
                    "All log entries failed to decode".to_string(),
                ));
            }

            debug!("Decoded {} of {} log entries (array form)", records.len(), total);
            Ok(records)
        }

        // A bare object is treated as a one-event log
        Value::Object(_) => {
            let record: EventRecord = serde_json::from_value(document)?;
            Ok(vec![record])
        }

        _ => Err(ParseError::InvalidFormat(
            "Log must be a JSON array, object, or line-delimited JSON".to_string(),
        )),
    }
}

/// Decode line-delimited JSON, one event per non-empty line
///
/// **Private** - internal helper for parse_log_text
fn parse_jsonl(text: &str) -> Result<Vec<EventRecord>, ParseError> {
    let mut records = Vec::new();
    let mut attempted = 0usize;

    for (line_number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        attempted += 1;

        match serde_json::from_str::<EventRecord>(line) {
            Ok(record) => records.push(record),
            Err(e) => {
                // Log but don't fail - partial/truncated telemetry is expected
                warn!("Failed to decode log line {}: {}", line_number + 1, e);
            }
        }
    }

    if records.is_empty() && attempted > 0 {
        return Err(ParseError::InvalidFormat(
            "No line of the log decoded as a JSON event".to_string(),
        ));
    }

    debug!("Decoded {} of {} log lines (JSONL form)", records.len(), attempted);
    Ok(records)
}

/// Decode an array of JSON entries, skipping malformed ones
///
/// **Private** - internal helper for parse_document
fn decode_entries(entries: Vec<Value>) -> Vec<EventRecord> {
    let mut records = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<EventRecord>(entry) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("Failed to decode log entry {}: {}", index, e);
            }
        }
    }

    records
}
