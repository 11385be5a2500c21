//! Per-document scoring pipeline and corpus driver.
//!
//! ```text
//! Quantity spans ──► AlignmentIndex ──┬──► Entity / Property / Qualifier spans
//!                                     ├──► Unit, modifier
//!                                     └──► HasQuantity, HasProperty, Qualifies
//!                                            (re-keyed through span match tables)
//! ```
//!
//! Documents share no state, so the corpus driver scores them independently
//! and concatenates the records in doc-id order.

use super::aggregate::SubjectSource;
use super::alignment::AlignmentIndex;
use super::attribute::{match_modifiers, match_units};
use super::overlap::TokenSplit;
use super::record::{MatchType, ScoreRecord};
use super::relation::{resolve_relations, MatchTables};
use super::span::match_spans;
use crate::store::{AnnotationStore, DocumentAnnotations};
use measeval_core::{AnnotType, Annotation, RelationType};
use std::collections::BTreeSet;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Every score record of a run, plus the subject order used for reporting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreTable {
    records: Vec<ScoreRecord>,
    subject_order: Vec<String>,
}

impl ScoreTable {
    /// Wrap records produced elsewhere.
    #[must_use]
    pub fn from_records(records: Vec<ScoreRecord>) -> Self {
        let mut table = Self {
            records,
            subject_order: Vec::new(),
        };
        table.extend_subject_order(std::iter::empty());
        table
    }

    /// All records.
    #[must_use]
    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    /// Subjects in reporting order.
    #[must_use]
    pub fn subject_order(&self) -> &[String] {
        &self.subject_order
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if no record was produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records with outcome `match_type`.
    #[must_use]
    pub fn count(&self, match_type: MatchType) -> usize {
        self.records
            .iter()
            .filter(|r| r.match_type == match_type)
            .count()
    }

    /// Attach subjects to records and adopt the source's subject order.
    ///
    /// Records whose document has no subject keep `None`; they take part in
    /// every mode except subject mode.
    pub fn join_subjects(&mut self, source: &dyn SubjectSource) {
        let mut missing = BTreeSet::new();
        for r in &mut self.records {
            match source.subject_for(&r.doc_id) {
                Some(subject) => r.subject = Some(subject.to_string()),
                None => {
                    if r.subject.is_none() && missing.insert(r.doc_id.clone()) {
                        log::debug!("no subject for document {}", r.doc_id);
                    }
                }
            }
        }
        let known: Vec<String> = source.subjects().into_iter().map(str::to_string).collect();
        self.extend_subject_order(known);
    }

    fn extend_subject_order(&mut self, first: impl IntoIterator<Item = String>) {
        let mut order: Vec<String> = Vec::new();
        let from_records = self.records.iter().filter_map(|r| r.subject.clone());
        for subject in first.into_iter().chain(from_records) {
            if !order.contains(&subject) {
                order.push(subject);
            }
        }
        self.subject_order = order;
    }
}

impl Extend<ScoreRecord> for ScoreTable {
    fn extend<I: IntoIterator<Item = ScoreRecord>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}

fn of_type(doc: &DocumentAnnotations, t: AnnotType) -> Vec<&Annotation> {
    doc.of_type(t).collect()
}

fn relation_rows(doc: &DocumentAnnotations) -> Vec<&Annotation> {
    doc.rows()
        .iter()
        .filter(|r| r.annot_type.is_relation_bearing())
        .collect()
}

/// Score one document. `gold` and `sub` must describe the same document;
/// either may be empty, as built by [`DocumentAnnotations::empty`].
#[must_use]
pub fn score_document(
    gold: &DocumentAnnotations,
    sub: &DocumentAnnotations,
    split: TokenSplit,
) -> Vec<ScoreRecord> {
    let doc_id = gold.doc_id();
    let mut records = Vec::new();
    let mut tables = MatchTables::new();

    let gold_quantities = of_type(gold, AnnotType::Quantity);
    let sub_quantities = of_type(sub, AnnotType::Quantity);
    let quantities = match_spans(
        AnnotType::Quantity,
        &gold_quantities,
        &sub_quantities,
        None,
        split,
    );
    let alignment = AlignmentIndex::from_matches(&quantities.matched);
    records.extend(quantities.records(doc_id));
    tables.insert(AnnotType::Quantity, quantities.table());

    for kind in [
        AnnotType::MeasuredEntity,
        AnnotType::MeasuredProperty,
        AnnotType::Qualifier,
    ] {
        let m = match_spans(
            kind,
            &of_type(gold, kind),
            &of_type(sub, kind),
            Some(&alignment),
            split,
        );
        records.extend(m.records(doc_id));
        tables.insert(kind, m.table());
    }

    records.extend(match_units(&gold_quantities, &sub_quantities, &alignment).records(doc_id));
    records.extend(match_modifiers(&gold_quantities, &sub_quantities, &alignment).records(doc_id));

    let (gold_rel, sub_rel) = (relation_rows(gold), relation_rows(sub));
    for rel_type in RelationType::ALL {
        let m = resolve_relations(rel_type, &gold_rel, &sub_rel, &tables, &alignment);
        records.extend(m.records(doc_id));
    }

    log::debug!(
        "{}: {} records, {} aligned sets",
        doc_id,
        records.len(),
        alignment.len()
    );
    records
}

/// Score every document present on either side.
#[must_use]
pub fn score_corpus(gold: &AnnotationStore, sub: &AnnotationStore, split: TokenSplit) -> ScoreTable {
    let doc_ids: Vec<&str> = gold
        .doc_ids()
        .chain(sub.doc_ids())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let score = |doc_id: &&str| -> Vec<ScoreRecord> {
        let empty = DocumentAnnotations::empty(*doc_id);
        let g = gold.doc(doc_id).unwrap_or(&empty);
        let s = sub.doc(doc_id).unwrap_or(&empty);
        score_document(g, s, split)
    };

    #[cfg(feature = "parallel")]
    let per_doc: Vec<Vec<ScoreRecord>> = doc_ids.par_iter().map(score).collect();
    #[cfg(not(feature = "parallel"))]
    let per_doc: Vec<Vec<ScoreRecord>> = doc_ids.iter().map(score).collect();

    let table = ScoreTable::from_records(per_doc.into_iter().flatten().collect());
    log::info!(
        "scored {} documents: {} match, {} sub only, {} gold only",
        doc_ids.len(),
        table.count(MatchType::Match),
        table.count(MatchType::SubOnly),
        table.count(MatchType::GoldOnly)
    );
    table
}
