//! Message normalization.
//!
//! Span input/output payloads embed conversation messages in several shapes:
//! a bare list, a `{messages: [...]}` wrapper (possibly batched one level
//! deeper), or a `{generations: [[...]]}` model result. This module sniffs
//! the shape and normalizes every candidate into one uniform message record
//! for display, keeping the original value alongside.

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A normalized conversation message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Source role, or `"unknown"` when the candidate carries none
    pub role: String,

    /// Text content, possibly empty
    pub content: String,

    /// Opaque tool call descriptors, when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<Value>>,

    /// The original message value, untouched, for lossless display
    pub raw: Value,
}

/// Normalize a span payload into a list of messages
///
/// **Public** - main entry point for message extraction
///
/// # Arguments
/// * `payload` - A span's `inputs` or `outputs` value
///
/// # Returns
/// Normalized messages in payload order; unrecognized shapes yield an empty
/// list rather than an error.
pub fn extract_messages(payload: &Value) -> Vec<Message> {
    let candidates = collect_candidates(payload);

    let messages: Vec<Message> = candidates
        .iter()
        .filter_map(|(candidate, raw)| normalize_candidate(candidate, raw))
        .collect();

    debug!("Normalized {} of {} message candidates", messages.len(), candidates.len());
    messages
}

/// Collect raw message candidates from a payload by shape sniffing
///
/// **Private** - each entry pairs the candidate to normalize with the
/// original value to retain as `raw` (they differ only for messages
/// synthesized from generation text)
fn collect_candidates(payload: &Value) -> Vec<(Value, Value)> {
    match payload {
        // Shape 1: the payload is already a message list
        Value::Array(items) => items.iter().map(|m| (m.clone(), m.clone())).collect(),

        Value::Object(object) => {
            // Shape 2: {messages: [...]} - possibly batched, where the outer
            // list indexes parallel conversations; take the first
            if let Some(messages) = object.get("messages") {
                let Value::Array(items) = messages else {
                    return Vec::new();
                };
                let items = match items.first() {
                    Some(Value::Array(inner)) => inner,
                    _ => items,
                };
                return items.iter().map(|m| (m.clone(), m.clone())).collect();
            }

            // Shape 3: {generations: [[...]]} - a model result batch
            if let Some(Value::Array(generations)) = object.get("generations") {
                let Some(Value::Array(inner)) = generations.first() else {
                    return Vec::new();
                };

                let mut candidates = Vec::new();
                for generation in inner {
                    if let Some(message) = generation.get("message") {
                        candidates.push((message.clone(), message.clone()));
                    } else if let Some(text) = generation.get("text") {
                        // Plain-text generation: synthesize an assistant
                        // message but keep the generation entry as raw
                        let synthesized = json!({"role": "assistant", "content": text});
                        candidates.push((synthesized, generation.clone()));
                    }
                }
                return candidates;
            }

            Vec::new()
        }

        // Any other shape carries no conversation
        _ => Vec::new(),
    }
}

/// Normalize one candidate message
///
/// **Private** - non-object candidates are skipped
fn normalize_candidate(candidate: &Value, raw: &Value) -> Option<Message> {
    let object = candidate.as_object()?;

    let role = object
        .get("type")
        .and_then(Value::as_str)
        .or_else(|| object.get("role").and_then(Value::as_str))
        .unwrap_or("unknown")
        .to_string();

    let content = object
        .get("content")
        .and_then(Value::as_str)
        .or_else(|| object.get("text").and_then(Value::as_str))
        .unwrap_or_default()
        .to_string();

    let tool_calls = object
        .get("tool_calls")
        .and_then(Value::as_array)
        .cloned()
        .or_else(|| {
            object
                .get("additional_kwargs")
                .and_then(|kwargs| kwargs.get("tool_calls"))
                .and_then(Value::as_array)
                .cloned()
        });

    Some(Message {
        role,
        content,
        tool_calls,
        raw: raw.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_prefers_type_over_role() {
        let messages = extract_messages(&json!([{"type": "human", "role": "user", "content": "hi"}]));
        assert_eq!(messages[0].role, "human");
    }

    #[test]
    fn test_content_falls_back_to_text() {
        let messages = extract_messages(&json!([{"role": "ai", "text": "from text"}]));
        assert_eq!(messages[0].content, "from text");
    }

    #[test]
    fn test_tool_calls_from_additional_kwargs() {
        let messages = extract_messages(&json!([{
            "role": "assistant",
            "content": "",
            "additional_kwargs": {"tool_calls": [{"name": "search"}]}
        }]));
        assert_eq!(messages[0].tool_calls, Some(vec![json!({"name": "search"})]));
    }

    #[test]
    fn test_non_object_candidates_skipped() {
        let messages = extract_messages(&json!(["just a string", {"role": "user", "content": "ok"}]));
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "ok");
    }
}
