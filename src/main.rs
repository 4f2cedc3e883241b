//! Chain Trace Studio CLI
//!
//! Reconstructs and renders span trees from LangChain/LangGraph
//! JSON callback logs.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use chain_trace_studio::commands::{
    display_schema, display_version, execute_render, validate_args, validate_document_file,
    RenderArgs,
};

/// Chain Trace Studio - Span trees from pipeline callback logs
#[derive(Parser, Debug)]
#[command(name = "chain-trace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconstruct a span tree from a callback log
    Render {
        /// Path to the callback log (JSON array or JSONL)
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the span JSON document
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the span tree to stdout
        #[arg(long)]
        tree: bool,

        /// Print normalized conversation messages
        #[arg(long)]
        messages: bool,
    },

    /// Validate a span document JSON file
    Validate {
        /// Path to span document JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Render {
            input,
            output,
            tree,
            messages,
        } => {
            let args = RenderArgs {
                input,
                output,
                tree,
                messages,
            };

            // Validate args first
            validate_args(&args)?;

            // Execute render
            execute_render(args)?;
        }

        Commands::Validate { file } => {
            validate_document_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
