//! Score report rendering.
//!
//! A [`ScoreReport`] pairs a mode with its slice summaries and renders them
//! as human-readable text, JSON, or TSV. The per-record table is written
//! separately with [`write_records`].
//!
//! # Example
//!
//! ```rust,ignore
//! use measeval::eval::{aggregate, score_corpus, Mode, ScoreReport, TokenSplit};
//!
//! let table = score_corpus(&gold, &sub, TokenSplit::Whitespace);
//! let report = ScoreReport::new(Mode::Overall, aggregate(&table, Mode::Overall));
//! println!("{}", report.summary());
//! ```

use super::aggregate::{Mode, Prf, SliceSummary};
use super::scorer::ScoreTable;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;

/// Output format of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Tsv,
}

// =============================================================================
// Report
// =============================================================================

/// Summaries of one run in one mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub mode: Mode,
    pub summaries: Vec<SliceSummary>,
}

impl ScoreReport {
    /// Create a report.
    #[must_use]
    pub fn new(mode: Mode, summaries: Vec<SliceSummary>) -> Self {
        Self { mode, summaries }
    }

    /// Render in `format`.
    ///
    /// # Errors
    ///
    /// JSON serialization failure.
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Human => Ok(self.summary()),
            OutputFormat::Json => self.to_json(),
            OutputFormat::Tsv => Ok(self.to_tsv()),
        }
    }

    /// Human-readable text, one block per slice.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for s in &self.summaries {
            match self.mode {
                Mode::Overall => overall_block(&mut out, s),
                Mode::Class | Mode::Subject => slice_block(&mut out, s),
                Mode::Doc => means_block(&mut out, s, false),
                Mode::ClassDoc => means_block(&mut out, s, true),
            }
        }
        out
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Serialization failure.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::evaluation(format!("JSON serialization failed: {}", e)))
    }

    /// One TSV row per slice, with a header.
    #[must_use]
    pub fn to_tsv(&self) -> String {
        let mut out =
            String::from("slice\trows\ttp\tfp\tfn\tprecision\trecall\tf_measure\tmean_em\tmean_f1\n");
        for s in &self.summaries {
            let (p, r, f) = match s.prf {
                Prf::Scored {
                    precision,
                    recall,
                    f_measure,
                } => (num(precision), num(recall), num(f_measure)),
                Prf::NoData | Prf::NoMatches => (String::new(), String::new(), String::new()),
            };
            out.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
                s.slice.label(),
                s.rows,
                s.tp,
                s.fp,
                s.fn_,
                p,
                r,
                f,
                mean(s.mean_em),
                mean(s.mean_f1)
            ));
        }
        out
    }
}

impl fmt::Display for ScoreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

// =============================================================================
// Human blocks
// =============================================================================

fn overall_block(out: &mut String, s: &SliceSummary) {
    out.push_str(&format!("True positives (matching rows): {}\n", s.tp));
    out.push_str(&format!("False positives (submission only): {}\n", s.fp));
    out.push_str(&format!("False negatives (gold only): {}\n\n", s.fn_));
    match s.prf {
        Prf::NoData => out.push_str("Submission has no data.\n\n"),
        Prf::NoMatches => out.push_str("Submission has no matches against gold data\n"),
        Prf::Scored {
            precision,
            recall,
            f_measure,
        } => {
            out.push_str(&format!("Precision: {}\n", num(precision)));
            out.push_str(&format!("Recall: {}\n", num(recall)));
            out.push_str(&format!("F-measure: {}\n\n", num(f_measure)));
        }
    }
    out.push_str(&format!("Overall Score Exact Match: {}\n", mean(s.mean_em)));
    out.push_str(&format!("Overall Score F1 (Overlap): {}\n", mean(s.mean_f1)));
}

fn slice_block(out: &mut String, s: &SliceSummary) {
    let name = s.slice.label();
    out.push_str(&format!("Processing {}\n", name));
    match s.prf {
        Prf::NoData => out.push_str(&format!("Submission has no data for {}\n\n", name)),
        Prf::NoMatches => out.push_str(&format!(
            "Submission has no matches against gold data for {}\n",
            name
        )),
        Prf::Scored {
            precision,
            recall,
            f_measure,
        } => {
            out.push_str(&format!("True positives (matching rows) for {}: {}\n", name, s.tp));
            out.push_str(&format!("False positives (submission only) for {}: {}\n", name, s.fp));
            out.push_str(&format!("False negatives (gold only) for {}: {}\n\n", name, s.fn_));
            out.push_str(&format!("Precision for {}: {}\n", name, num(precision)));
            out.push_str(&format!("Recall for {}: {}\n", name, num(recall)));
            out.push_str(&format!("F-measure for {}: {}\n\n", name, num(f_measure)));
        }
    }
    out.push_str(&format!("Exact Match Score for {}: {}\n", name, mean(s.mean_em)));
    out.push_str(&format!("F1 (Overlap) Score for {}: {}\n\n", name, mean(s.mean_f1)));
}

fn means_block(out: &mut String, s: &SliceSummary, spaced: bool) {
    let name = s.slice.label();
    out.push_str(&format!("Exact Match Score for {}: {}\n", name, mean(s.mean_em)));
    out.push_str(&format!("F1 (Overlap) Score for {}: {}\n", name, mean(s.mean_f1)));
    if spaced {
        out.push('\n');
    }
}

/// Shortest round-trip float, always with a fractional part (`1.0`, not `1`).
fn num(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 {
        format!("{:.1}", x)
    } else {
        format!("{}", x)
    }
}

fn mean(x: Option<f64>) -> String {
    x.map_or_else(|| "nan".to_string(), num)
}

// =============================================================================
// Records
// =============================================================================

/// Write the per-record table as TSV: `docId, matchType, type, EM, F1, subject`.
///
/// # Errors
///
/// Write failure.
pub fn write_records<W: Write>(table: &ScoreTable, mut w: W) -> Result<()> {
    writeln!(w, "docId\tmatchType\ttype\tEM\tF1\tsubject")?;
    for r in table.records() {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}",
            r.doc_id,
            r.match_type,
            r.kind,
            num(r.em),
            num(r.f1),
            r.subject.as_deref().unwrap_or("")
        )?;
    }
    w.flush()?;
    Ok(())
}
