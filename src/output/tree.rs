//! Text tree rendering for the terminal.
//!
//! Renders a correlated span forest as an indented tree with per-span
//! status, type, and duration, and optionally the normalized conversation
//! messages carried by each span's inputs/outputs.

use crate::correlator::{Span, SpanStatus};
use crate::messages::extract_messages;

/// Render a span forest as an indented text tree
///
/// **Public** - main entry point for terminal output
pub fn render_tree(spans: &[Span]) -> String {
    let mut lines = Vec::new();
    for span in spans {
        render_span(span, 0, &mut lines);
    }
    lines.join("\n")
}

/// Render one span and its children
///
/// **Private** - internal recursion for render_tree
fn render_span(span: &Span, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    let glyph = status_glyph(span.status);

    let mut line = format!("{}{} {} [{}]", indent, glyph, span.name, span.span_type);

    if let Some(duration) = span.duration {
        line.push_str(&format!("  {}", format_duration(duration)));
    }

    if let Some(error) = &span.error_message {
        line.push_str(&format!("  error: {}", error));
    }

    lines.push(line);

    for child in &span.children {
        render_span(child, depth + 1, lines);
    }
}

/// Render the conversations carried by a span forest
///
/// **Public** - walks the forest depth-first and prints the normalized
/// messages of every span that has message-bearing inputs or outputs
pub fn render_conversations(spans: &[Span]) -> String {
    let mut lines = Vec::new();
    for span in spans {
        render_span_conversation(span, &mut lines);
    }
    lines.join("\n")
}

/// Collect the conversation lines for one span subtree
///
/// **Private** - internal recursion for render_conversations
fn render_span_conversation(span: &Span, lines: &mut Vec<String>) {
    let mut messages = Vec::new();
    if let Some(inputs) = &span.inputs {
        messages.extend(extract_messages(inputs));
    }
    if let Some(outputs) = &span.outputs {
        messages.extend(extract_messages(outputs));
    }

    if !messages.is_empty() {
        lines.push(format!("--- {} [{}] ---", span.name, span.span_type));
        for message in &messages {
            let mut line = format!("{}: {}", message.role, message.content);
            if let Some(tool_calls) = &message.tool_calls {
                line.push_str(&format!("  ({} tool calls)", tool_calls.len()));
            }
            lines.push(line);
        }
    }

    for child in &span.children {
        render_span_conversation(child, lines);
    }
}

/// Summary counts over a span forest
///
/// **Public** - returned from summarize
#[derive(Debug, Clone, Default)]
pub struct ForestSummary {
    pub total_spans: usize,
    pub root_count: usize,
    pub error_count: usize,
    pub running_count: usize,
}

impl ForestSummary {
    /// Get human-readable summary line
    pub fn summary(&self) -> String {
        format!(
            "Spans: {} | Roots: {} | Errors: {} | Still running: {}",
            self.total_spans, self.root_count, self.error_count, self.running_count
        )
    }
}

/// Count spans, roots, and statuses across a forest
///
/// **Public** - for logging and the validate command
pub fn summarize(spans: &[Span]) -> ForestSummary {
    let mut summary = ForestSummary {
        root_count: spans.len(),
        ..Default::default()
    };

    for span in spans {
        count_span(span, &mut summary);
    }

    summary
}

fn count_span(span: &Span, summary: &mut ForestSummary) {
    summary.total_spans += 1;
    match span.status {
        SpanStatus::Error => summary.error_count += 1,
        SpanStatus::Running => summary.running_count += 1,
        SpanStatus::Success => {}
    }

    for child in &span.children {
        count_span(child, summary);
    }
}

fn status_glyph(status: SpanStatus) -> &'static str {
    match status {
        SpanStatus::Success => "✓",
        SpanStatus::Error => "✗",
        SpanStatus::Running => "…",
    }
}

/// Format a millisecond duration for display
///
/// **Private** - sub-second values stay in ms, longer ones switch to seconds
fn format_duration(ms: f64) -> String {
    if ms >= 1000.0 {
        format!("{:.2}s", ms / 1000.0)
    } else {
        format!("{:.0}ms", ms)
    }
}
