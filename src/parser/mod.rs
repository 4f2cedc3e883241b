//! Callback log parsing and event schema.
//!
//! This module handles:
//! - Decoding raw log text (JSON array or JSONL) into event records
//! - Normalizing heterogeneous timestamp formats
//! - Defining the event record schema

pub mod event;
pub mod log_file;

// Re-export main types
pub use event::{timestamp_from_value, EventRecord};
pub use log_file::parse_log_text;
