//! Validate command - check submission files without scoring

use super::{resolve_dir, skip_set};
use crate::cli::output::color;
use crate::validation::{ensure_valid, validate_dir};
use clap::Parser;
use std::path::PathBuf;

/// Validate submission TSV files
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Submission data directory
    #[arg(short, long, value_name = "DIR")]
    pub sub: PathBuf,

    /// Base path joined in front of --sub
    #[arg(short, long, value_name = "DIR")]
    pub indir: Option<PathBuf>,

    /// File of file names to skip, one per line
    #[arg(long, value_name = "FILE")]
    pub skip: Option<PathBuf>,

    /// Also print warnings
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn run(args: ValidateArgs) -> Result<(), String> {
    let dir = resolve_dir(args.indir.as_deref(), &args.sub);
    let skip = skip_set(&[], args.skip.as_deref())?;
    let results = validate_dir(&dir, &skip).map_err(|e| e.to_string())?;

    for v in &results {
        if v.result.is_valid {
            println!("{} {}", color("32", "ok:"), v.file);
        } else {
            for e in &v.result.errors {
                println!("{} {}: {}", color("31", "error"), v.file, e);
            }
        }
        if args.verbose {
            for w in &v.result.warnings {
                println!("{} {}: {}", color("33", "warning"), v.file, w);
            }
        }
    }

    println!("Validated {} file(s) in {}", results.len(), dir.display());
    ensure_valid(&results).map_err(|e| e.to_string())
}
