//! Configuration and constants for the CLI.

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Placeholder display name for spans that never resolve one
pub const UNKNOWN_NAME: &str = "Unknown";

/// Placeholder type for spans that never resolve one
pub const UNKNOWN_TYPE: &str = "unknown";

// Payload extraction rules, tried in order; first present field wins.
// The second element says whether the value is re-wrapped as `{field: value}`
// so the renderer still sees where the payload came from.
pub const INPUT_FIELD_RULES: &[(&str, bool)] = &[
    ("inputs", false),
    ("messages", true),
    ("input", true),
];
pub const OUTPUT_FIELD_RULES: &[(&str, bool)] = &[
    ("outputs", false),
    ("generations", true),
    ("output", true),
];

// Event-name substrings mapped to span types (callback names differ per
// pipeline integration); tried in order, first match wins
pub const TYPE_RULES: &[(&str, &str)] = &[
    ("chat_model", "generation"),
    ("llm", "generation"),
    ("tool", "tool"),
    ("chain", "chain"),
];
