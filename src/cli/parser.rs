//! CLI argument parsing and structure definitions

use super::commands::{ScoreArgs, ValidateArgs};
use clap::{Parser, Subcommand};

/// Measurement annotation scorer
#[derive(Parser)]
#[command(name = "measeval")]
#[command(
    author,
    version,
    about = "Score quantity, entity, property and qualifier annotations against gold data",
    long_about = r#"
measeval - span and relation scoring for measurement annotations

SCORED:
  • Quantity, MeasuredEntity, MeasuredProperty, Qualifier spans (EM + overlap F1)
  • Units and modifiers of quantities
  • HasQuantity, HasProperty, Qualifies relations

MODES:
  overall   one score for everything (leaderboard score)
  class     per annotation / relation type
  subject   per document subject (needs --categories)
  doc       per document
  classdoc  per document and type

EXAMPLES:
  measeval score --gold gold/ --sub submission/
  measeval score -i data/ -g gold/ -s sub/ --mode class --limit
  measeval validate --sub submission/

Logging goes to stderr; set RUST_LOG=debug for per-document detail.
"#
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a submission directory against a gold directory
    #[command(visible_alias = "s")]
    Score(ScoreArgs),

    /// Validate submission files without scoring
    #[command(visible_alias = "v")]
    Validate(ValidateArgs),
}
