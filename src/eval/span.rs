//! Span matching: pair submitted spans with gold spans of the same category.
//!
//! # Candidates
//!
//! A submitted span and a gold span are candidates when their offsets touch
//! or overlap (see [`Span::overlaps`]):
//!
//! ```text
//! Gold:      [10=====15)
//! Sub A:     [10==13)          candidate, overlap 3 chars
//! Sub B: [5==10)               candidate, overlap 0 chars (touching)
//! Sub C: [5=9)                 not a candidate
//! ```
//!
//! Quantities are matched on offsets alone. Entities, properties and
//! qualifiers must additionally sit in the gold measurement set that the
//! submission's set was aligned to on the quantity pass.
//!
//! # Duplicates
//!
//! Every candidate pair is scored. A submitted row keeps the one pair with
//! the highest F1 (then EM, then longest overlap, then earliest gold row) and
//! yields a single `Match` record. Every gold row that took part in any
//! candidate pair counts as matched.
//!
//! [`Span::overlaps`]: measeval_core::Span::overlaps

use super::alignment::AlignmentIndex;
use super::overlap::{exact_match, overlap_f1, SpanText, TokenSplit};
use super::record::{ScoreRecord, ScoreType};
use measeval_core::{AnnotType, Annotation};
use std::cmp::Ordering;
use std::collections::HashMap;

/// A retained submission/gold pair.
#[derive(Debug, Clone, Copy)]
pub struct SpanMatch<'a> {
    /// Submitted row
    pub sub: &'a Annotation,
    /// Gold row it was paired with
    pub gold: &'a Annotation,
    /// Both boundaries agree
    pub em: bool,
    /// Token-overlap F1 of the pair
    pub f1: f64,
}

/// Result of matching one category within one document.
#[derive(Debug, Clone)]
pub struct SpanMatches<'a> {
    /// Category matched
    pub kind: AnnotType,
    /// One entry per matched submission row, in submission order
    pub matched: Vec<SpanMatch<'a>>,
    /// Gold rows that took part in at least one candidate pair
    pub gold_matched: Vec<&'a Annotation>,
    /// Submission rows without a candidate
    pub sub_only: Vec<&'a Annotation>,
    /// Gold rows without a candidate
    pub gold_only: Vec<&'a Annotation>,
}

impl<'a> SpanMatches<'a> {
    /// Score records for this pass: one per matched submission row plus the
    /// unmatched rows on either side.
    #[must_use]
    pub fn records(&self, doc_id: &str) -> Vec<ScoreRecord> {
        let kind = ScoreType::from(self.kind);
        self.matched
            .iter()
            .map(|m| ScoreRecord::matched(doc_id, kind, if m.em { 1.0 } else { 0.0 }, m.f1))
            .chain(self.sub_only.iter().map(|_| ScoreRecord::sub_only(doc_id, kind)))
            .chain(self.gold_only.iter().map(|_| ScoreRecord::gold_only(doc_id, kind)))
            .collect()
    }

    /// Lookup from submission row to the gold row it was paired with.
    #[must_use]
    pub fn table(&self) -> MatchTable {
        MatchTable::from_matches(&self.matched)
    }
}

/// `(sub annotSet, sub annotId) -> gold annotId` for one category.
///
/// Relations re-key their endpoints through these tables. Keyed by set first
/// so lookups borrow the annotId.
#[derive(Debug, Clone, Default)]
pub struct MatchTable {
    entries: HashMap<i64, HashMap<String, String>>,
}

impl MatchTable {
    /// Build from retained pairs.
    #[must_use]
    pub fn from_matches(matches: &[SpanMatch<'_>]) -> Self {
        let mut table = Self::default();
        for m in matches {
            table.insert(m.sub.annot_set, m.sub.annot_id.clone(), m.gold.annot_id.clone());
        }
        table
    }

    fn insert(&mut self, annot_set: i64, sub_id: String, gold_id: String) {
        self.entries
            .entry(annot_set)
            .or_default()
            .entry(sub_id)
            .or_insert(gold_id);
    }

    /// Gold annotId paired with submission row `annot_id` of set `annot_set`.
    #[must_use]
    pub fn get(&self, annot_set: i64, annot_id: &str) -> Option<&str> {
        self.entries.get(&annot_set)?.get(annot_id).map(String::as_str)
    }

    /// Merge another table, keeping existing entries.
    pub fn merge(&mut self, other: MatchTable) {
        for (set, ids) in other.entries {
            for (sub_id, gold_id) in ids {
                self.insert(set, sub_id, gold_id);
            }
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    /// True if nothing was matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(HashMap::is_empty)
    }
}

struct Candidate {
    gold_idx: usize,
    em: bool,
    f1: f64,
    overlap: usize,
}

impl Candidate {
    /// Ordering used to retain one pair per submission row. Earlier gold rows
    /// win full ties because replacement needs a strictly better candidate.
    fn rank(&self, other: &Candidate) -> Ordering {
        self.f1
            .total_cmp(&other.f1)
            .then(self.em.cmp(&other.em))
            .then(self.overlap.cmp(&other.overlap))
    }
}

/// Match submitted rows of one category against gold rows of the same
/// category and document.
///
/// `alignment` restricts candidates to the gold set aligned with the
/// submission row's set; pass `None` for the quantity pass, which builds that
/// alignment.
#[must_use]
pub fn match_spans<'a>(
    kind: AnnotType,
    gold: &[&'a Annotation],
    sub: &[&'a Annotation],
    alignment: Option<&AlignmentIndex>,
    split: TokenSplit,
) -> SpanMatches<'a> {
    let mut gold_hit = vec![false; gold.len()];
    let mut matched = Vec::new();
    let mut sub_only = Vec::new();

    for &s in sub {
        let required_set = match alignment {
            Some(index) => match index.gold_set(s.annot_set) {
                Some(set) => Some(set),
                None => {
                    sub_only.push(s);
                    continue;
                }
            },
            None => None,
        };

        let mut best: Option<Candidate> = None;
        for (gold_idx, &g) in gold.iter().enumerate() {
            if required_set.is_some_and(|set| set != g.annot_set) {
                continue;
            }
            if !s.span.overlaps(&g.span) {
                continue;
            }
            gold_hit[gold_idx] = true;

            let candidate = Candidate {
                gold_idx,
                em: exact_match(s.span, g.span),
                f1: overlap_f1(
                    SpanText::new(s.span, &s.text),
                    SpanText::new(g.span, &g.text),
                    split,
                ),
                overlap: s.span.intersection(&g.span).len(),
            };
            if best
                .as_ref()
                .map_or(true, |b| candidate.rank(b) == Ordering::Greater)
            {
                best = Some(candidate);
            }
        }

        match best {
            Some(c) => matched.push(SpanMatch {
                sub: s,
                gold: gold[c.gold_idx],
                em: c.em,
                f1: c.f1,
            }),
            None => sub_only.push(s),
        }
    }

    let (gold_matched, gold_only): (Vec<_>, Vec<_>) = gold
        .iter()
        .zip(&gold_hit)
        .partition(|(_, hit)| **hit);

    log::debug!(
        "{}: {} matched, {} sub only, {} gold only",
        kind,
        matched.len(),
        sub_only.len(),
        gold_only.len()
    );

    SpanMatches {
        kind,
        matched,
        gold_matched: gold_matched.into_iter().map(|(&g, _)| g).collect(),
        sub_only,
        gold_only: gold_only.into_iter().map(|(&g, _)| g).collect(),
    }
}
