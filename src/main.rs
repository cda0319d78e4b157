//! Binary entry point for blackout.
//!
//! This binary drives the redaction library from local files: locating
//! phrases in OCR output and burning redaction plans into documents.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use blackout::cli::{FindArgs, RedactArgs, cmd_find, cmd_redact};
use blackout::config::Config;
use blackout::observability::{self, LogFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Blackout - permanent, raster-backed document redaction.
#[derive(Parser)]
#[command(name = "blackout")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log output format: plain or json.
    #[arg(long, global = true, default_value = "plain")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Locate a literal phrase in OCR output and print its rectangles.
    Find(FindArgs),

    /// Apply a redaction request to a document and write flattened output.
    Redact(RedactArgs),
}

/// Main entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    observability::init_tracing(cli.verbose, LogFormat::parse(&cli.log_format));

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };
    observability::install_prometheus(&config.metrics);

    let result = match cli.command {
        Commands::Find(args) => cmd_find(&args),
        Commands::Redact(args) => cmd_redact(&args, config.render),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}
