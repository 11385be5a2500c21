//! Score command - score a submission directory against gold data

use super::{resolve_dir, skip_set};
use crate::cli::output::{color, write_output};
use crate::config::ScoreConfig;
use crate::eval::{
    aggregate, score_corpus, write_records, Mode, OutputFormat, ScoreReport, ScoreTable, TokenSplit,
};
use crate::loader::{load_corpora, LoadOptions};
use crate::subject::SubjectLookup;
use crate::validation::{ensure_valid, validate_dir, FileValidation};
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Score a submission directory against a gold directory
#[derive(Parser, Debug)]
pub struct ScoreArgs {
    /// Gold data directory
    #[arg(short, long, value_name = "DIR")]
    pub gold: PathBuf,

    /// Submission data directory
    #[arg(short, long, value_name = "DIR")]
    pub sub: PathBuf,

    /// Base path joined in front of --gold and --sub
    #[arg(short, long, value_name = "DIR")]
    pub indir: Option<PathBuf>,

    /// Reporting mode [default: overall, or the config value]
    #[arg(short, long, value_enum)]
    pub mode: Option<Mode>,

    /// File of file names to skip, one per line
    #[arg(long, value_name = "FILE")]
    pub skip: Option<PathBuf>,

    /// Load only gold files the submission also has
    #[arg(short, long)]
    pub limit: bool,

    /// Subject categories file (docId prefix TAB subject)
    #[arg(long, value_name = "FILE")]
    pub categories: Option<PathBuf>,

    /// Tokenization rule for the overlap F1
    #[arg(long, value_enum)]
    pub token_split: Option<TokenSplit>,

    /// Report format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Also write the per-record score table (TSV) to this path
    #[arg(long, value_name = "PATH")]
    pub records: Option<PathBuf>,

    /// TOML config file; flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,

    /// Validate the submission only, then stop
    #[arg(short = 'v', long, visible_alias = "val")]
    pub validate_only: bool,
}

impl ScoreArgs {
    /// Config file values with the command-line flags applied on top.
    fn resolve_config(&self) -> Result<ScoreConfig, String> {
        let mut config = match &self.config {
            Some(path) => ScoreConfig::from_file(path).map_err(|e| e.to_string())?,
            None => ScoreConfig::default(),
        };
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(split) = self.token_split {
            config.token_split = split;
        }
        if let Some(categories) = &self.categories {
            config.categories = Some(categories.clone());
        }
        config.limit_to_submission |= self.limit;
        config.check().map_err(|e| e.to_string())?;
        Ok(config)
    }
}

fn report_invalid(results: &[FileValidation]) {
    for v in results.iter().filter(|v| !v.result.is_valid) {
        for e in &v.result.errors {
            eprintln!("{} {}: {}", color("31", "error"), v.file, e);
        }
    }
}

pub fn run(args: ScoreArgs) -> Result<(), String> {
    let config = args.resolve_config()?;
    let gold_dir = resolve_dir(args.indir.as_deref(), &args.gold);
    let sub_dir = resolve_dir(args.indir.as_deref(), &args.sub);
    let skip = skip_set(&config.skip, args.skip.as_deref())?;

    // Progress goes to stdout only when stdout carries the human report.
    let quiet_stdout = config.format != OutputFormat::Human || args.output.is_some();
    let say = |msg: &str| {
        if quiet_stdout {
            eprintln!("{}", msg);
        } else {
            println!("{}", msg);
        }
    };

    let validations = validate_dir(&sub_dir, &skip).map_err(|e| e.to_string())?;
    if let Err(e) = ensure_valid(&validations) {
        report_invalid(&validations);
        eprintln!("Scroll up to see specific problems.");
        eprintln!("For more detailed errors, enable debug level logging (RUST_LOG=debug).");
        return Err(e.to_string());
    }

    if args.validate_only {
        say("Running in validate only mode.");
        say("Validation finished.");
        say("Have a nice day!");
        return Ok(());
    }

    let options = LoadOptions {
        skip,
        limit_to_submission: config.limit_to_submission,
    };
    let (gold, sub) = load_corpora(&gold_dir, &sub_dir, &options).map_err(|e| e.to_string())?;
    say(&format!("Submission directory contains: {}", sub.files.len()));
    say(&format!("Gold directory contains: {}", gold.files.len()));
    for (t, n) in gold.type_counts() {
        say(&format!("Gold count of {}: {}", t, n));
    }
    say("");
    for (t, n) in sub.type_counts() {
        say(&format!("Submission count of {}: {}", t, n));
    }
    say("");

    let mut table = score_corpus(&gold.store, &sub.store, config.token_split);
    if let Some(path) = &config.categories {
        let lookup = SubjectLookup::load(path).map_err(|e| e.to_string())?;
        table.join_subjects(&lookup);
    }

    if let Some(path) = &args.records {
        write_record_table(&table, path)?;
    }

    say(&format!("Working in mode {}", config.mode));
    let report = ScoreReport::new(config.mode, aggregate(&table, config.mode));
    let rendered = report.render(config.format).map_err(|e| e.to_string())?;
    write_output(&rendered, args.output.as_deref())?;
    if let Some(path) = &args.output {
        eprintln!("{} report written to {}", color("32", "ok:"), path);
    }
    Ok(())
}

fn write_record_table(table: &ScoreTable, path: &Path) -> Result<(), String> {
    let file = File::create(path).map_err(|e| format!("Failed to create {}: {}", path.display(), e))?;
    write_records(table, BufWriter::new(file)).map_err(|e| e.to_string())?;
    log::info!("wrote {} records to {}", table.len(), path.display());
    Ok(())
}
