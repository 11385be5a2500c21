//! Aggregation of score records into precision / recall / F-measure.
//!
//! Counting follows the record outcome:
//!
//! | Outcome | Counts as |
//! |---------|-----------|
//! | Match | true positive |
//! | Sub only | false positive |
//! | Gold only | false negative |
//!
//! EM and F1 means are taken over every record of a slice, so unmatched rows
//! pull the means down with their zero scores.

use super::record::{MatchType, ScoreRecord, ScoreType};
use super::scorer::ScoreTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Reporting granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Mode {
    /// Everything in one slice
    #[default]
    Overall,
    /// One slice per score type
    Class,
    /// One slice per document subject
    #[serde(alias = "sub")]
    #[cfg_attr(feature = "cli", value(alias = "sub"))]
    Subject,
    /// One slice per document
    Doc,
    /// One slice per document and score type
    #[serde(alias = "both")]
    #[cfg_attr(feature = "cli", value(name = "classdoc", alias = "both"))]
    ClassDoc,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Mode::Overall => "overall",
            Mode::Class => "class",
            Mode::Subject => "subject",
            Mode::Doc => "doc",
            Mode::ClassDoc => "classdoc",
        })
    }
}

/// Supplies the subject of a document and the preferred subject order.
pub trait SubjectSource {
    /// Subject of `doc_id`, if known.
    fn subject_for(&self, doc_id: &str) -> Option<&str>;

    /// Known subjects in reporting order.
    fn subjects(&self) -> Vec<&str>;
}

/// Precision, recall and F-measure of a slice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Prf {
    /// The submission contributed nothing to the slice (`tp + fp == 0`).
    NoData,
    /// The submission contributed rows but none matched (`tp == 0`).
    NoMatches,
    /// At least one match.
    Scored {
        /// `tp / (tp + fp)`
        precision: f64,
        /// `tp / (tp + fn)`
        recall: f64,
        /// Harmonic mean of precision and recall
        f_measure: f64,
    },
}

impl Prf {
    /// Derive from outcome counts.
    #[must_use]
    pub fn from_counts(tp: usize, fp: usize, fn_: usize) -> Self {
        if tp + fp == 0 {
            return Prf::NoData;
        }
        if tp == 0 {
            return Prf::NoMatches;
        }
        let precision = tp as f64 / (tp + fp) as f64;
        let recall = tp as f64 / (tp + fn_) as f64;
        let f_measure = 2.0 * precision * recall / (precision + recall);
        Prf::Scored {
            precision,
            recall,
            f_measure,
        }
    }

    /// F-measure, if the slice could be scored.
    #[must_use]
    pub fn f_measure(&self) -> Option<f64> {
        match self {
            Prf::Scored { f_measure, .. } => Some(*f_measure),
            _ => None,
        }
    }
}

/// Which records a summary covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "slice", rename_all = "snake_case")]
pub enum Slice {
    Overall,
    Class { class: ScoreType },
    Subject { subject: String },
    Doc { doc_id: String },
    ClassDoc { doc_id: String, class: ScoreType },
}

impl Slice {
    fn contains(&self, record: &ScoreRecord) -> bool {
        match self {
            Slice::Overall => true,
            Slice::Class { class } => record.kind == *class,
            Slice::Subject { subject } => record.subject.as_deref() == Some(subject.as_str()),
            Slice::Doc { doc_id } => record.doc_id == *doc_id,
            Slice::ClassDoc { doc_id, class } => record.doc_id == *doc_id && record.kind == *class,
        }
    }

    /// Short label: the class, subject, or document name.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Slice::Overall => "overall".to_string(),
            Slice::Class { class } => class.to_string(),
            Slice::Subject { subject } => subject.clone(),
            Slice::Doc { doc_id } => doc_id.clone(),
            Slice::ClassDoc { doc_id, class } => format!("{} for {}", doc_id, class),
        }
    }
}

/// Counts and scores of one slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceSummary {
    #[serde(flatten)]
    pub slice: Slice,
    /// Number of records in the slice
    pub rows: usize,
    pub tp: usize,
    pub fp: usize,
    #[serde(rename = "fn")]
    pub fn_: usize,
    pub prf: Prf,
    /// Mean EM; `None` for an empty slice
    pub mean_em: Option<f64>,
    /// Mean F1; `None` for an empty slice
    pub mean_f1: Option<f64>,
}

impl SliceSummary {
    /// Summarize the records `slice` selects.
    #[must_use]
    pub fn compute(slice: Slice, records: &[ScoreRecord]) -> Self {
        let (mut tp, mut fp, mut fn_) = (0, 0, 0);
        let (mut em_sum, mut f1_sum) = (0.0, 0.0);
        let mut rows = 0;

        for r in records.iter().filter(|r| slice.contains(r)) {
            rows += 1;
            em_sum += r.em;
            f1_sum += r.f1;
            match r.match_type {
                MatchType::Match => tp += 1,
                MatchType::SubOnly => fp += 1,
                MatchType::GoldOnly => fn_ += 1,
            }
        }

        let mean = |sum: f64| (rows > 0).then(|| sum / rows as f64);
        Self {
            slice,
            rows,
            tp,
            fp,
            fn_,
            prf: Prf::from_counts(tp, fp, fn_),
            mean_em: mean(em_sum),
            mean_f1: mean(f1_sum),
        }
    }
}

fn doc_ids(records: &[ScoreRecord]) -> BTreeSet<&str> {
    records.iter().map(|r| r.doc_id.as_str()).collect()
}

/// Summaries for `mode`, in reporting order.
///
/// Pure function of the table: aggregating twice gives identical output.
#[must_use]
pub fn aggregate(table: &ScoreTable, mode: Mode) -> Vec<SliceSummary> {
    let records = table.records();
    let slices: Vec<Slice> = match mode {
        Mode::Overall => vec![Slice::Overall],
        Mode::Class => ScoreType::ALL
            .into_iter()
            .map(|class| Slice::Class { class })
            .collect(),
        Mode::Subject => table
            .subject_order()
            .iter()
            .map(|s| Slice::Subject { subject: s.clone() })
            .collect(),
        Mode::Doc => doc_ids(records)
            .into_iter()
            .map(|d| Slice::Doc { doc_id: d.to_string() })
            .collect(),
        Mode::ClassDoc => doc_ids(records)
            .into_iter()
            .flat_map(|d| {
                ScoreType::ALL.into_iter().map(move |class| Slice::ClassDoc {
                    doc_id: d.to_string(),
                    class,
                })
            })
            .collect(),
    };

    slices
        .into_iter()
        .map(|slice| SliceSummary::compute(slice, records))
        .collect()
}
