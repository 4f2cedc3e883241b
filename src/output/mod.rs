//! Output writers and renderers for correlated spans.
//!
//! This module handles presenting span forests:
//! - Versioned JSON documents on disk
//! - Indented text trees and conversation views for the terminal

pub mod json;
pub mod tree;

// Re-export main functions
pub use json::{build_document, read_document, write_document, SpanDocument};
pub use tree::{render_conversations, render_tree, summarize, ForestSummary};
