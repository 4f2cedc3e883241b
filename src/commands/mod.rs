//! CLI command implementations.

pub mod render;
pub mod utils;

pub use render::{execute_render, validate_args, RenderArgs};
pub use utils::{display_schema, display_version, validate_document_file};
