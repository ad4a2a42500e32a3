// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Bilifeed CLI - fetch, filter and summarize Bilibili dynamics.
//!
//! # Examples
//!
//! ```bash
//! # Fetch the default number of pages and list posts per author
//! bilifeed --sessdata "$SESSDATA"
//!
//! # Only videos from two authors, last week
//! bilifeed fetch --type video --query-mode selected_up --target-up-mids 123,456 \
//!     --from 2024-05-01 --to 2024-05-07
//!
//! # Author list filtered by keyword
//! bilifeed authors --filter music
//!
//! # Attributed summary of one author
//! bilifeed summary --author 123 --summary-provider openai --summary-api-key "$KEY"
//!
//! # JSON output
//! bilifeed --format json --pretty
//! ```

mod args;
mod commands;
mod context;
mod output;
mod progress;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use args::FetchArgs;
use commands::{authors, config, fetch, summary};

// ============================================================================
// CLI Definition
// ============================================================================

/// Bilifeed CLI - Bilibili dynamics from the command line.
#[derive(Parser)]
#[command(name = "bilifeed")]
#[command(about = "Fetch, filter and summarize Bilibili dynamics")]
#[command(long_about = r#"
Bilifeed pages through the dynamics feed of a logged-in Bilibili account,
filters posts by time window, keyword and author, and summarizes one
author's posts with sentences that cite their sources.

Authentication uses your browser cookie (--cookie) or just SESSDATA
(--sessdata). Both can be saved in the config file.

Examples:
  bilifeed                          # Fetch with saved settings
  bilifeed fetch --pages 2          # Two pages only
  bilifeed authors --filter music   # Matching authors
  bilifeed summary --author 123     # Summary of one author
  bilifeed config path              # Where settings live
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run. If none, runs 'fetch' with saved settings.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode (no progress, no logging).
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Interface language (en-US, zh-CN); defaults to config, then locale.
    #[arg(long, global = true)]
    pub lang: Option<String>,

    /// Settings file to use instead of the default location.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch dynamics and list them per author (default).
    #[command(visible_alias = "f")]
    Fetch(FetchArgs),

    /// Fetch dynamics and list authors with post counts.
    #[command(visible_alias = "a")]
    Authors(authors::AuthorsArgs),

    /// Summarize one author's dynamics.
    #[command(visible_alias = "s")]
    Summary(summary::SummaryArgs),

    /// Inspect configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// General error.
    Error = 1,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("bilifeed=debug,info")
    } else {
        EnvFilter::new("bilifeed=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Fetch(args)) => fetch::run(args, &cli).await,
        Some(Commands::Authors(args)) => authors::run(args, &cli).await,
        Some(Commands::Summary(args)) => summary::run(args, &cli).await,
        Some(Commands::Config(args)) => config::run(args, &cli).await,
        None => fetch::run(&FetchArgs::default(), &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(ExitCode::Error as i32);
    }

    Ok(())
}
