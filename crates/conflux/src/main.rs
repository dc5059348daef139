//! Conflux CLI - Markdown to Confluence storage format.
//!
//! Provides commands for:
//! - `convert`: Convert content between representations
//! - `macro`: Render a single storage-format macro
//! - `parse`: Print the parsed document tree as JSON

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ConvertArgs, MacroArgs, ParseArgs};
use output::Output;

/// Conflux - Markdown to Confluence storage format compiler.
#[derive(Parser)]
#[command(name = "conflux", version, about)]
struct Cli {
    /// Enable verbose output (info level logging).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert content between representations.
    Convert(ConvertArgs),
    /// Render a single macro by name.
    Macro(MacroArgs),
    /// Parse Markdown and print the document tree as JSON.
    Parse(ParseArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Convert(args) => args.execute(&output),
        Commands::Macro(args) => args.execute(&output),
        Commands::Parse(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
