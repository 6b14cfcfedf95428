//! kwlink CLI - Keyword auto-linking.
//!
//! Provides commands for:
//! - `render`: Link keywords in a document's content
//! - `keywords get` / `keywords set`: Read or replace a document's keywords
//! - `dictionary`: Show the aggregated keyword dictionary
//! - `cache clear`: Invalidate the cached dictionary

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CacheCommand, CommonArgs, DictionaryArgs, KeywordsCommand, RenderArgs};
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// kwlink - Keyword auto-linking for document content.
#[derive(Parser)]
#[command(name = "kwlink", version, about)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Link keywords in a document and print the result.
    Render(RenderArgs),
    /// Read or replace a document's keyword list.
    #[command(subcommand)]
    Keywords(KeywordsCommand),
    /// Print the aggregated keyword dictionary.
    Dictionary(DictionaryArgs),
    /// Dictionary cache maintenance.
    #[command(subcommand)]
    Cache(CacheCommand),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.common.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(&cli.common),
        Commands::Keywords(cmd) => cmd.execute(&cli.common),
        Commands::Dictionary(args) => args.execute(&cli.common),
        Commands::Cache(cmd) => cmd.execute(&cli.common),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
