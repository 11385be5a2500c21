//! measeval - scorer for measurement annotations
//!
//! Compares submission TSV files against gold TSV files and reports
//! precision, recall, F-measure, and mean exact-match / overlap scores.
//!
//! # Usage
//!
//! ```bash
//! # Overall score
//! measeval score --gold gold/ --sub submission/
//!
//! # Per-class breakdown, gold limited to submitted documents
//! measeval score -i data/ -g gold/ -s sub/ --mode class --limit
//!
//! # Check a submission without scoring
//! measeval validate --sub submission/
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`.

use clap::Parser;
use measeval::cli::commands;
use measeval::cli::output::color;
use measeval::cli::{Cli, Commands};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score(args) => commands::score::run(args),
        Commands::Validate(args) => commands::validate::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", color("31", "error:"), e);
            ExitCode::FAILURE
        }
    }
}
