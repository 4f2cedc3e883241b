//! Chain Trace Studio
//!
//! Span-tree reconstruction and rendering for LangChain/LangGraph
//! callback logs.
//!
//! This crate provides the core implementation for the
//! `chain-trace` CLI tool: it decodes flat JSON callback logs,
//! correlates the events into a forest of spans, and normalizes
//! conversation messages embedded in span payloads.

pub mod commands;
pub mod correlator;
pub mod messages;
pub mod output;
pub mod parser;
pub mod utils;
