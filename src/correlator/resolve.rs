//! Type and name resolution for spans.
//!
//! Explicit hints on the event always win; heuristics over the event name
//! only run while the span is still unclassified, so an explicit observation
//! type can never be un-adopted by a later guess.

use super::Span;
use crate::parser::EventRecord;
use crate::utils::config::{TYPE_RULES, UNKNOWN_NAME, UNKNOWN_TYPE};
use serde_json::Value;

/// Apply type and name hints from one event to its span
///
/// **Public within crate** - invoked once per event during pass 1
pub(crate) fn apply_classification(span: &mut Span, record: &EventRecord) {
    if let Some(observation_type) = record.observation_type.as_deref() {
        // "unknown" is the producer's own placeholder, not a real hint
        if observation_type != UNKNOWN_TYPE {
            span.span_type = observation_type.to_string();
        }
    }

    if let Some(name) = record.name.as_deref() {
        if name != UNKNOWN_NAME {
            span.name = name.to_string();
        }
    }

    if span.span_type == UNKNOWN_TYPE {
        for (needle, span_type) in TYPE_RULES {
            if record.event.contains(needle) {
                span.span_type = (*span_type).to_string();
                break;
            }
        }
    }
}

/// Fall back to payload hints for the span name on a start event
///
/// **Public within crate** - only applies while the name is still the default:
/// prefer the serialized component name, then the `langgraph_node` metadata
/// key accumulated so far
pub(crate) fn apply_start_name_fallback(span: &mut Span, record: &EventRecord) {
    if span.name != UNKNOWN_NAME {
        return;
    }

    if let Some(name) = record
        .data
        .get("serialized")
        .and_then(|serialized| serialized.get("name"))
        .and_then(Value::as_str)
    {
        span.name = name.to_string();
        return;
    }

    if let Some(node) = span.metadata.get("langgraph_node").and_then(Value::as_str) {
        span.name = node.to_string();
    }
}
