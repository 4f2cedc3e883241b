use crate::output::{read_document, summarize};
use crate::utils::config::SCHEMA_VERSION;
use anyhow::Result;
use std::path::PathBuf;

/// Validate a span document JSON file
pub fn validate_document_file(file_path: PathBuf) -> Result<()> {
    println!("Validating span document: {}", file_path.display());

    let document = read_document(&file_path)?;
    let summary = summarize(&document.spans);

    println!("✓ Valid span document");
    println!("  Version: {}", document.version);
    println!("  Generated: {}", document.generated_at);
    println!("  Roots: {}", summary.root_count);
    println!("  Spans: {}", summary.total_spans);
    println!("  Errors: {}", summary.error_count);

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Chain Trace Studio Span Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string       - Schema version (e.g., '1.0.0')");
        println!("  generated_at: string  - ISO 8601 timestamp");
        println!("  spans: array          - Root spans of the forest");
        println!("    id: string          - Run identifier");
        println!("    parentId: string?   - Parent run identifier");
        println!("    name: string        - Display name ('Unknown' if unresolved)");
        println!("    type: string        - generation | tool | chain | unknown | ...");
        println!("    status: string      - running | success | error");
        println!("    timestamp: number?  - Start instant (epoch ms)");
        println!("    endTime: number?    - End instant (epoch ms)");
        println!("    duration: number?   - endTime - timestamp, when both present");
        println!("    inputs: any?        - Extracted input payload");
        println!("    outputs: any?       - Extracted output payload");
        println!("    metadata: object    - Merged event metadata");
        println!("    tags: array?        - Union of event tags");
        println!("    events: array       - Contributing raw event records");
        println!("    children: array     - Child spans, sorted by timestamp");
        println!("    errorMessage: string? - Message from an error event");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Chain Trace Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Span Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Span-tree reconstruction for LangChain/LangGraph callback logs.");
}
