//! Shared utilities: error types and configuration constants.

pub mod config;
pub mod error;
