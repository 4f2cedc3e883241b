//! Span correlation: rebuilding a span forest from flat event records.
//!
//! Pipelines emit partial lifecycle events (`*_start`, `*_end`, `*_error`)
//! keyed by run id, in whatever order the callbacks fired. Correlation runs
//! in two passes: pass 1 folds every event into its span, pass 2 links spans
//! to their parents and sorts the resulting forest by start time.

pub mod resolve;

use crate::parser::EventRecord;
use crate::utils::config::{INPUT_FIELD_RULES, OUTPUT_FIELD_RULES, UNKNOWN_NAME, UNKNOWN_TYPE};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

/// Lifecycle status of a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanStatus {
    Running,
    Success,
    Error,
}

/// One reconstructed unit of work, aggregating all events that share a run id
///
/// Serialized field names follow the rendering surface's contract (camelCase,
/// span type under the key `type`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    /// Owning run id
    pub id: String,

    /// Parent run id captured from this span's first event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// Display name, `"Unknown"` until resolved
    pub name: String,

    /// Span classification: `generation`, `tool`, `chain`, a pass-through
    /// observation type, or `"unknown"`
    #[serde(rename = "type")]
    pub span_type: String,

    pub status: SpanStatus,

    /// Start instant in epoch milliseconds; the most recent start event wins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,

    /// `end_time - timestamp`, present only when both instants are
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Value>,

    /// Shallow merge of all contributing events' metadata
    #[serde(default)]
    pub metadata: Map<String, Value>,

    /// Union of all contributing events' tags, first-occurrence order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// All contributing events, input order
    #[serde(default)]
    pub events: Vec<EventRecord>,

    /// Child spans, sorted by start time
    #[serde(default)]
    pub children: Vec<Span>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Span {
    /// Create a span from the first event seen for its run id
    ///
    /// The parent id is captured here and never revised by later events
    /// (first-event-wins policy).
    fn from_first_event(run_id: &str, record: &EventRecord) -> Self {
        Self {
            id: run_id.to_string(),
            parent_id: record.parent_run_id.clone(),
            name: UNKNOWN_NAME.to_string(),
            span_type: UNKNOWN_TYPE.to_string(),
            status: SpanStatus::Running,
            timestamp: record.timestamp,
            end_time: None,
            duration: None,
            inputs: None,
            outputs: None,
            metadata: Map::new(),
            tags: None,
            events: Vec::new(),
            children: Vec::new(),
            error_message: None,
        }
    }
}

/// Correlate flat event records into a forest of spans
///
/// **Public** - main entry point for correlation
///
/// # Arguments
/// * `events` - Event records in arrival order (any order with respect to
///   parent/child relationships)
///
/// # Returns
/// Root spans with their children attached, siblings sorted by start time
/// recursively. Records without a run id are dropped; spans whose parent was
/// never seen become roots.
pub fn correlate(events: &[EventRecord]) -> Vec<Span> {
    debug!("Correlating {} event records", events.len());

    // Pass 1: fold events into spans, keyed by run id.
    // `order` records first-creation order so pass 2 stays deterministic.
    let mut span_map: HashMap<String, Span> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for record in events {
        let Some(run_id) = record.run_id.as_deref().filter(|id| !id.is_empty()) else {
            debug!("Dropping event without run id: {}", record.event);
            continue;
        };

        let span = match span_map.entry(run_id.to_string()) {
            Entry::Occupied(occupied) => occupied.into_mut(),
            Entry::Vacant(vacant) => {
                order.push(run_id.to_string());
                vacant.insert(Span::from_first_event(run_id, record))
            }
        };

        apply_event(span, record);
    }

    // Pass 2: derive durations, link children to parents, sort.
    for span in span_map.values_mut() {
        if let (Some(start), Some(end)) = (span.timestamp, span.end_time) {
            span.duration = Some(end - start);
        }
    }

    let edges = resolve_parent_edges(&span_map, &order);

    let mut root_ids: Vec<&str> = Vec::new();
    let mut child_ids: HashMap<&str, Vec<&str>> = HashMap::new();
    for id in &order {
        match edges.get(id.as_str()) {
            Some(parent) => child_ids.entry(parent.as_str()).or_default().push(id),
            None => root_ids.push(id),
        }
    }

    let mut roots: Vec<Span> = Vec::with_capacity(root_ids.len());
    for id in root_ids {
        if let Some(span) = take_subtree(id, &mut span_map, &child_ids) {
            roots.push(span);
        }
    }

    sort_spans(&mut roots);

    debug!("Correlated {} spans into {} roots", order.len(), roots.len());
    roots
}

/// Fold one event record into its span
///
/// **Private** - pass 1 worker
fn apply_event(span: &mut Span, record: &EventRecord) {
    span.events.push(record.clone());

    // Shallow metadata merge; later events overwrite on key conflict
    if let Some(metadata) = &record.metadata {
        for (key, value) in metadata {
            span.metadata.insert(key.clone(), value.clone());
        }
    }

    // Tag union, preserving first-occurrence order
    if let Some(tags) = &record.tags {
        let span_tags = span.tags.get_or_insert_with(Vec::new);
        for tag in tags {
            if !span_tags.contains(tag) {
                span_tags.push(tag.clone());
            }
        }
    }

    resolve::apply_classification(span, record);

    if record.event.ends_with("_start") {
        apply_start(span, record);
    } else if record.event.ends_with("_end") {
        apply_end(span, record);
    } else if record.event.ends_with("_error") {
        apply_error(span, record);
    }
    // Any other suffix: metadata/tags/classification updates only
}

/// Handle a `*_start` event
///
/// **Private** - the most recent start event wins the recorded start time
fn apply_start(span: &mut Span, record: &EventRecord) {
    if record.timestamp.is_some() {
        span.timestamp = record.timestamp;
    }

    if let Some(inputs) = extract_payload(&record.data, INPUT_FIELD_RULES) {
        span.inputs = Some(inputs);
    }

    resolve::apply_start_name_fallback(span, record);
}

/// Handle a `*_end` event
///
/// **Private**
fn apply_end(span: &mut Span, record: &EventRecord) {
    span.status = SpanStatus::Success;
    span.end_time = record.timestamp;

    if let Some(outputs) = extract_payload(&record.data, OUTPUT_FIELD_RULES) {
        span.outputs = Some(outputs);
    }
}

/// Handle a `*_error` event
///
/// **Private**
fn apply_error(span: &mut Span, record: &EventRecord) {
    span.status = SpanStatus::Error;
    span.end_time = record.timestamp;

    let error_value = record.data.get("error").cloned().unwrap_or(Value::Null);
    span.error_message = match &error_value {
        Value::String(message) => Some(message.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    };

    let mut outputs = Map::new();
    outputs.insert("error".to_string(), error_value);
    span.outputs = Some(Value::Object(outputs));
}

/// Extract a payload from event data via an ordered rule list
///
/// **Public** - the rule tables live in `utils::config`; first present,
/// non-null field wins, optionally re-wrapped as `{field: value}`
pub fn extract_payload(data: &Value, rules: &[(&str, bool)]) -> Option<Value> {
    let object = data.as_object()?;

    for (field, wrap) in rules {
        match object.get(*field) {
            None | Some(Value::Null) => continue,
            Some(value) => {
                if *wrap {
                    let mut wrapped = Map::new();
                    wrapped.insert((*field).to_string(), value.clone());
                    return Some(Value::Object(wrapped));
                }
                return Some(value.clone());
            }
        }
    }

    None
}

/// Resolve parent edges, dropping edges to unknown spans and breaking cycles
///
/// **Private** - a parent id that never resolved demotes the span to a root;
/// a parent chain that loops back is broken at its first-created member so
/// the later tree walk terminates
fn resolve_parent_edges(
    span_map: &HashMap<String, Span>,
    order: &[String],
) -> HashMap<String, String> {
    let mut edges: HashMap<String, String> = HashMap::new();

    for id in order {
        let Some(span) = span_map.get(id) else { continue };
        if let Some(parent) = span.parent_id.as_deref() {
            if span_map.contains_key(parent) {
                edges.insert(id.clone(), parent.to_string());
            } else {
                debug!("Span {} references unknown parent {}, treating as root", id, parent);
            }
        }
    }

    for id in order {
        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(id.clone());

        let mut current = edges.get(id.as_str()).cloned();
        while let Some(parent) = current {
            if parent == *id {
                warn!("Parent chain of run {} forms a cycle, demoting it to a root", id);
                edges.remove(id.as_str());
                break;
            }
            current = edges.get(parent.as_str()).cloned();
            if !visited.insert(parent) {
                // Reached a cycle that does not include this span; it will be
                // broken when its own earliest member is processed
                break;
            }
        }
    }

    edges
}

/// Move a span and its descendants out of the accumulation map
///
/// **Private** - ownership of children flows from parent to child here
fn take_subtree(
    id: &str,
    span_map: &mut HashMap<String, Span>,
    child_ids: &HashMap<&str, Vec<&str>>,
) -> Option<Span> {
    let mut span = span_map.remove(id)?;

    if let Some(children) = child_ids.get(id) {
        for child in children {
            if let Some(child_span) = take_subtree(child, span_map, child_ids) {
                span.children.push(child_span);
            }
        }
    }

    Some(span)
}

/// Sort sibling spans by start time, recursively
///
/// **Private** - stable sort, so ties keep first-creation order
fn sort_spans(spans: &mut [Span]) {
    spans.sort_by(|a, b| {
        a.timestamp
            .unwrap_or(0.0)
            .total_cmp(&b.timestamp.unwrap_or(0.0))
    });

    for span in spans {
        sort_spans(&mut span.children);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_payload_priority() {
        let data = json!({"input": "low", "inputs": {"q": 1}});
        let extracted = extract_payload(&data, INPUT_FIELD_RULES).unwrap();
        assert_eq!(extracted, json!({"q": 1}));
    }

    #[test]
    fn test_extract_payload_wraps_secondary_fields() {
        let data = json!({"messages": [["sys"]]});
        let extracted = extract_payload(&data, INPUT_FIELD_RULES).unwrap();
        assert_eq!(extracted, json!({"messages": [["sys"]]}));

        let data = json!({"output": "done"});
        let extracted = extract_payload(&data, OUTPUT_FIELD_RULES).unwrap();
        assert_eq!(extracted, json!({"output": "done"}));
    }

    #[test]
    fn test_extract_payload_ignores_null_and_missing() {
        let data = json!({"inputs": null, "input": "x"});
        let extracted = extract_payload(&data, INPUT_FIELD_RULES).unwrap();
        assert_eq!(extracted, json!({"input": "x"}));

        assert!(extract_payload(&json!({}), INPUT_FIELD_RULES).is_none());
        assert!(extract_payload(&json!("scalar"), INPUT_FIELD_RULES).is_none());
    }
}
