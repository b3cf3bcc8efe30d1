//! Custody CLI - chain-of-custody operations for conversation exports.

use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{canonicalize, export, inspect, verify};

#[derive(Parser)]
#[command(name = "custody")]
#[command(about = "Conversation export integrity and verification CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an export artifact from a capture bundle
    Export {
        /// Path to capture bundle JSON
        capture: String,
        /// Write the artifact to this path (stdout if not provided)
        #[arg(long)]
        output: Option<String>,
    },
    /// Verify an export artifact's integrity block
    Verify {
        /// Path to export artifact JSON
        artifact: String,
        /// Re-verify every page against the original capture bundle
        #[arg(long)]
        capture: Option<String>,
        /// Exit with error code if any verification fails
        #[arg(long)]
        strict: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarize an export artifact
    Inspect {
        /// Path to export artifact JSON
        artifact: String,
        /// Show the first N messages as plain text
        #[arg(long, default_value_t = 0)]
        preview: usize,
    },
    /// Show canonical content bytes for one captured page
    Canonicalize {
        /// Capture bundle JSON file (or stdin if not provided)
        input: Option<String>,
        /// Page index to canonicalize
        #[arg(long, default_value_t = 0)]
        page: usize,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Export { capture, output } => export::run(capture, output),
        Commands::Verify {
            artifact,
            capture,
            strict,
            json,
        } => verify::run(artifact, capture, strict, json),
        Commands::Inspect { artifact, preview } => inspect::run(artifact, preview),
        Commands::Canonicalize { input, page } => canonicalize::run(input, page),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
