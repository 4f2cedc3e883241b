//! Render command implementation.
//!
//! The render command:
//! 1. Reads a callback log file
//! 2. Decodes it into event records
//! 3. Correlates the records into a span forest
//! 4. Writes the forest as JSON and/or prints it as a text tree

use crate::correlator::correlate;
use crate::output::{build_document, render_conversations, render_tree, summarize, write_document};
use crate::parser::parse_log_text;
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the render command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct RenderArgs {
    /// Path to the callback log file (JSON array or JSONL)
    pub input: PathBuf,

    /// Output path for the span JSON document (optional)
    pub output: Option<PathBuf>,

    /// Print the span tree to stdout
    pub tree: bool,

    /// Print normalized conversation messages to stdout
    pub messages: bool,
}

impl Default for RenderArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("workflow_log.json"),
            output: None,
            tree: true,
            messages: false,
        }
    }
}

/// Validate render arguments
///
/// **Public** - can be called before execute_render for early validation
pub fn validate_args(args: &RenderArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if !args.input.exists() {
        anyhow::bail!("Input file does not exist: {}", args.input.display());
    }

    if args.input.is_dir() {
        anyhow::bail!("Input path is a directory: {}", args.input.display());
    }

    if let Some(output) = &args.output {
        if output.as_os_str().is_empty() {
            anyhow::bail!("Output path cannot be empty");
        }
    }

    Ok(())
}

/// Execute the render command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Input file read errors
/// * Log decode errors
/// * Output write errors
pub fn execute_render(args: RenderArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Rendering callback log: {}", args.input.display());

    // Step 1: Read the raw log text
    info!("Step 1/3: Reading log file...");
    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read log file {}", args.input.display()))?;

    // Step 2: Decode and correlate
    info!("Step 2/3: Decoding and correlating events...");
    let events = parse_log_text(&text).context("Failed to decode callback log")?;

    debug!("Decoded {} event records", events.len());

    let spans = correlate(&events);
    let summary = summarize(&spans);
    info!("Correlation summary: {}", summary.summary());

    // Step 3: Write/print outputs
    info!("Step 3/3: Writing output...");

    if let Some(output) = &args.output {
        let document = build_document(spans.clone());
        write_document(&document, output).context("Failed to write span JSON")?;

        info!("✓ Spans written to: {}", output.display());
    }

    // Default to the text tree when no file output was requested
    if args.tree || args.output.is_none() {
        println!("{}", render_tree(&spans));
    }

    if args.messages {
        let conversations = render_conversations(&spans);
        if !conversations.is_empty() {
            println!("\n{}", conversations);
        }
    }

    let elapsed = start_time.elapsed();
    info!("Render completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validate_args_valid() {
        let mut log = tempfile::NamedTempFile::new().unwrap();
        writeln!(log, "[]").unwrap();

        let args = RenderArgs {
            input: log.path().to_path_buf(),
            ..Default::default()
        };

        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_empty_input() {
        let args = RenderArgs {
            input: PathBuf::new(),
            ..Default::default()
        };

        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_missing_input() {
        let args = RenderArgs {
            input: PathBuf::from("/nonexistent/log.json"),
            ..Default::default()
        };

        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_input_is_directory() {
        let dir = tempfile::tempdir().unwrap();

        let args = RenderArgs {
            input: dir.path().to_path_buf(),
            ..Default::default()
        };

        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_execute_render_writes_document() {
        let mut log = tempfile::NamedTempFile::new().unwrap();
        write!(
            log,
            r#"[{{"timestamp": 0, "event": "chain_start", "run_id": "r1", "data": {{"input": "x"}}}},
               {{"timestamp": 5, "event": "chain_end", "run_id": "r1", "data": {{"output": "y"}}}}]"#
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("spans.json");

        let args = RenderArgs {
            input: log.path().to_path_buf(),
            output: Some(output.clone()),
            tree: false,
            messages: false,
        };

        execute_render(args).unwrap();

        let document = crate::output::read_document(&output).unwrap();
        assert_eq!(document.spans.len(), 1);
        assert_eq!(document.spans[0].span_type, "chain");
    }
}
