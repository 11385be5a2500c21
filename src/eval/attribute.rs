//! Dependent attributes of quantities: unit and modifiers.
//!
//! Attributes carry no offsets of their own. A submitted attribute counts
//! when its measurement set was aligned on the quantity pass and the aligned
//! gold set carries an equal value. Scoring is binary (EM = F1 = 1).

use super::alignment::AlignmentIndex;
use super::record::{ScoreRecord, ScoreType};
use measeval_core::{Annotation, ModifierTag};

/// Outcome counts of one attribute pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeMatches {
    /// `Unit` or `modifier`
    pub kind: ScoreType,
    /// Submitted values with an equal value in the aligned gold set
    pub matched: usize,
    /// Submitted values without one
    pub sub_only: usize,
    /// Gold values no submitted value matched
    pub gold_only: usize,
}

impl AttributeMatches {
    /// Score records for this pass.
    #[must_use]
    pub fn records(&self, doc_id: &str) -> Vec<ScoreRecord> {
        let mut records = Vec::with_capacity(self.matched + self.sub_only + self.gold_only);
        records.extend((0..self.matched).map(|_| ScoreRecord::exact(doc_id, self.kind)));
        records.extend((0..self.sub_only).map(|_| ScoreRecord::sub_only(doc_id, self.kind)));
        records.extend((0..self.gold_only).map(|_| ScoreRecord::gold_only(doc_id, self.kind)));
        records
    }
}

fn match_values<T: PartialEq>(
    kind: ScoreType,
    gold: &[(i64, T)],
    sub: &[(i64, T)],
    alignment: &AlignmentIndex,
) -> AttributeMatches {
    let mut gold_hit = vec![false; gold.len()];
    let mut matched = 0;
    let mut sub_only = 0;

    for (sub_set, value) in sub {
        let Some(gold_set) = alignment.gold_set(*sub_set) else {
            sub_only += 1;
            continue;
        };
        let mut found = false;
        for (i, (set, gold_value)) in gold.iter().enumerate() {
            if *set == gold_set && gold_value == value {
                gold_hit[i] = true;
                found = true;
            }
        }
        if found {
            matched += 1;
        } else {
            sub_only += 1;
        }
    }

    AttributeMatches {
        kind,
        matched,
        sub_only,
        gold_only: gold_hit.iter().filter(|hit| !**hit).count(),
    }
}

fn units<'a>(quantities: &[&'a Annotation]) -> Vec<(i64, &'a str)> {
    quantities
        .iter()
        .filter_map(|q| {
            let unit = q.payload.quantity()?.unit()?;
            Some((q.annot_set, unit))
        })
        .collect()
}

fn modifiers(quantities: &[&Annotation]) -> Vec<(i64, ModifierTag)> {
    quantities
        .iter()
        .filter_map(|q| q.payload.quantity().map(|attrs| (q.annot_set, attrs)))
        .flat_map(|(set, attrs)| attrs.mods.iter().map(move |&tag| (set, tag)))
        .collect()
}

/// Score units of quantity rows. Quantities without a unit take no part.
#[must_use]
pub fn match_units(
    gold: &[&Annotation],
    sub: &[&Annotation],
    alignment: &AlignmentIndex,
) -> AttributeMatches {
    match_values(ScoreType::Unit, &units(gold), &units(sub), alignment)
}

/// Score modifiers, one value per tag of each quantity row.
///
/// Repeated submitted tags may all match the same gold tag.
#[must_use]
pub fn match_modifiers(
    gold: &[&Annotation],
    sub: &[&Annotation],
    alignment: &AlignmentIndex,
) -> AttributeMatches {
    match_values(ScoreType::Modifier, &modifiers(gold), &modifiers(sub), alignment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::span::SpanMatch;
    use measeval_core::{AnnotType, Payload};

    fn quantity(set: i64, id: &str, other: &str) -> Annotation {
        Annotation::new("d", set, id, AnnotType::Quantity, 0, 4, "5 kg")
            .with_payload(Payload::parse(AnnotType::Quantity, other).unwrap())
            .unwrap()
    }

    fn aligned(sub: &Annotation, gold: &Annotation) -> AlignmentIndex {
        AlignmentIndex::from_matches(&[SpanMatch { sub, gold, em: true, f1: 1.0 }])
    }

    #[test]
    fn test_two_modifiers_match() {
        let g = quantity(1, "G", r#"{"mods": ["IsApproximate", "IsCount"]}"#);
        let s = quantity(4, "S", r#"{"mods": ["IsApproximate", "IsCount"]}"#);
        let m = match_modifiers(&[&g], &[&s], &aligned(&s, &g));
        assert_eq!((m.matched, m.sub_only, m.gold_only), (2, 0, 0));
        let records = m.records("d");
        assert!(records.iter().all(|r| r.em == 1.0 && r.kind == ScoreType::Modifier));
    }

    #[test]
    fn test_unit_mismatch() {
        let g = quantity(1, "G", r#"{"unit": "kg"}"#);
        let s = quantity(2, "S", r#"{"unit": "g"}"#);
        let m = match_units(&[&g], &[&s], &aligned(&s, &g));
        assert_eq!((m.matched, m.sub_only, m.gold_only), (0, 1, 1));
    }

    #[test]
    fn test_unaligned_set_is_sub_only() {
        let g = quantity(1, "G", r#"{"unit": "kg"}"#);
        let s = quantity(2, "S", r#"{"unit": "kg"}"#);
        let m = match_units(&[&g], &[&s], &AlignmentIndex::default());
        assert_eq!((m.matched, m.sub_only, m.gold_only), (0, 1, 1));
    }

    #[test]
    fn test_missing_unit_takes_no_part() {
        let g = quantity(1, "G", "");
        let s = quantity(2, "S", r#"{"unit": ""}"#);
        let m = match_units(&[&g], &[&s], &aligned(&s, &g));
        assert_eq!(m.records("d").len(), 0);
    }
}
