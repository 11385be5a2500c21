//! Relation resolution between matched spans.
//!
//! | Relation | Source | Target |
//! |----------|--------|--------|
//! | HasQuantity | MeasuredEntity, MeasuredProperty | Quantity |
//! | HasProperty | MeasuredEntity | MeasuredProperty |
//! | Qualifies | Qualifier | MeasuredEntity, MeasuredProperty, Quantity |
//!
//! A submitted relation names its endpoints by submission annotIds. Both are
//! re-keyed to gold annotIds through the span match tables, looked up within
//! the relation's own measurement set. The relation is correct only when both
//! endpoints re-key and the aligned gold set holds the same triple, so a
//! relation is never credited for endpoints the span pass got wrong.

use super::alignment::AlignmentIndex;
use super::record::{ScoreRecord, ScoreType};
use super::span::MatchTable;
use measeval_core::{AnnotType, Annotation, Relation, RelationType};
use std::collections::HashMap;

/// Span match tables of every category in one document.
#[derive(Debug, Clone, Default)]
pub struct MatchTables {
    tables: HashMap<AnnotType, MatchTable>,
}

impl MatchTables {
    /// Create an empty set of tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the table of one category.
    pub fn insert(&mut self, kind: AnnotType, table: MatchTable) {
        self.tables.entry(kind).or_default().merge(table);
    }

    /// Re-key submission row `annot_id` of set `annot_set`, searching the
    /// tables of `kinds` in order.
    #[must_use]
    pub fn rekey(&self, kinds: &[AnnotType], annot_set: i64, annot_id: &str) -> Option<&str> {
        kinds
            .iter()
            .filter_map(|k| self.tables.get(k))
            .find_map(|t| t.get(annot_set, annot_id))
    }
}

/// A relation together with the measurement set of its source row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetRelation {
    pub annot_set: i64,
    pub source_type: AnnotType,
    pub relation: Relation,
}

/// Relations of `rel_type` carried by `rows`, in row order.
#[must_use]
pub fn extract_relations(rows: &[&Annotation], rel_type: RelationType) -> Vec<SetRelation> {
    rows.iter()
        .filter_map(|row| {
            let relation = row.relation()?;
            (relation.rel_type == rel_type).then(|| SetRelation {
                annot_set: row.annot_set,
                source_type: row.annot_type,
                relation,
            })
        })
        .collect()
}

/// Outcome of one relation type within one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationMatches {
    pub rel_type: RelationType,
    /// Submitted relations found in gold
    pub matched: Vec<SetRelation>,
    /// Submitted relations that could not be re-keyed or were not found
    pub sub_only: Vec<SetRelation>,
    /// Gold relations no submitted relation matched
    pub gold_only: Vec<SetRelation>,
}

impl RelationMatches {
    /// Score records for this relation type.
    #[must_use]
    pub fn records(&self, doc_id: &str) -> Vec<ScoreRecord> {
        let kind = ScoreType::from(self.rel_type);
        self.matched
            .iter()
            .map(|_| ScoreRecord::exact(doc_id, kind))
            .chain(self.sub_only.iter().map(|_| ScoreRecord::sub_only(doc_id, kind)))
            .chain(self.gold_only.iter().map(|_| ScoreRecord::gold_only(doc_id, kind)))
            .collect()
    }
}

/// Resolve relations of one type.
///
/// `gold` and `sub` are the relation-bearing rows of one document.
#[must_use]
pub fn resolve_relations(
    rel_type: RelationType,
    gold: &[&Annotation],
    sub: &[&Annotation],
    tables: &MatchTables,
    alignment: &AlignmentIndex,
) -> RelationMatches {
    let gold_relations = extract_relations(gold, rel_type);
    let mut gold_hit = vec![false; gold_relations.len()];
    let mut matched = Vec::new();
    let mut sub_only = Vec::new();

    for s in extract_relations(sub, rel_type) {
        let found = alignment.gold_set(s.annot_set).and_then(|gold_set| {
            let src = tables.rekey(&[s.source_type], s.annot_set, &s.relation.src)?;
            let target = tables.rekey(rel_type.targets(), s.annot_set, &s.relation.target)?;
            gold_relations.iter().position(|g| {
                g.annot_set == gold_set && g.relation.src == src && g.relation.target == target
            })
        });

        match found {
            Some(i) => {
                gold_hit[i] = true;
                matched.push(s);
            }
            None => {
                log::debug!(
                    "{} {} -> {} in set {} not resolved",
                    rel_type,
                    s.relation.src,
                    s.relation.target,
                    s.annot_set
                );
                sub_only.push(s);
            }
        }
    }

    let gold_only = gold_relations
        .into_iter()
        .zip(gold_hit)
        .filter_map(|(g, hit)| (!hit).then_some(g))
        .collect();

    RelationMatches {
        rel_type,
        matched,
        sub_only,
        gold_only,
    }
}
