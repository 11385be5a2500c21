//! Property tests for span matching, the dependent passes and aggregation.
//!
//! Spans are cut from one shared random document, so gold and submission
//! texts agree wherever their offsets do.

use measeval::eval::{
    aggregate, match_spans, score_corpus, score_document, AlignmentIndex, MatchType, Mode, Prf,
    ScoreRecord, ScoreType, TokenSplit,
};
use measeval::store::{AnnotationStore, DocumentAnnotations};
use measeval::{
    AnnotType, Annotation, EntityLinks, ModifierTag, Payload, PropertyLinks, QualifierLinks,
    QuantityAttrs,
};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

fn cut(doc: &str, doc_id: &str, set: i64, id: String, t: AnnotType, start: usize, len: usize) -> Annotation {
    let start = start.min(doc.chars().count());
    let text: String = doc.chars().skip(start).take(len).collect();
    let end = start + text.chars().count();
    Annotation::new(doc_id, set, id, t, start, end, text)
}

fn rows(doc: &str, spans: &[(usize, usize)], prefix: &str) -> Vec<Annotation> {
    spans
        .iter()
        .enumerate()
        .map(|(i, &(s, l))| cut(doc, "d", 1, format!("{}{}", prefix, i), AnnotType::Quantity, s, l))
        .collect()
}

fn spans() -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((0usize..60, 1usize..12), 0..8)
}

// =============================================================================
// Whole measurements
// =============================================================================

/// Width of the slot each span is cut from. Spans start at most two
/// characters into their slot and are six long, so neighbours never touch.
const SLOT: usize = 12;
const SPAN_LEN: usize = 6;
/// Slots per measurement: quantity, property, entity, qualifier.
const SLOTS: usize = 4;

#[derive(Debug, Clone)]
struct Measurement {
    unit: Option<&'static str>,
    mods: Vec<ModifierTag>,
    property: bool,
    entity: bool,
    /// Qualifier target slot, falling back to the quantity when absent
    qualifies: Option<usize>,
    shift: usize,
}

fn measurement() -> impl Strategy<Value = Measurement> {
    (
        prop::option::of(prop::sample::select(vec!["kg", "m", "mg/L"])),
        prop::collection::vec(prop::sample::select(ModifierTag::ALL.to_vec()), 0..3),
        any::<bool>(),
        any::<bool>(),
        prop::option::of(0usize..3),
        0usize..3,
    )
        .prop_map(|(unit, mods, property, entity, qualifies, shift)| Measurement {
            unit,
            mods,
            property,
            entity,
            qualifies,
            shift,
        })
}

fn measurements() -> impl Strategy<Value = Vec<Measurement>> {
    prop::collection::vec(measurement(), 0..5)
}

fn text() -> impl Strategy<Value = String> {
    "[a-z ]{200}"
}

/// Rows of one document. Measurement `k` fills slots `4k..4k + 4` and
/// belongs to set `k + first_set`.
fn measurement_rows(
    doc: &str,
    doc_id: &str,
    measurements: &[Measurement],
    first_set: i64,
    prefix: &str,
) -> Vec<Annotation> {
    let mut out = Vec::new();
    for (k, m) in measurements.iter().enumerate() {
        let set = k as i64 + first_set;
        let id = |slot: usize| format!("{}{}-{}", prefix, k, slot);
        let span = |slot: usize, t: AnnotType| {
            cut(doc, doc_id, set, id(slot), t, (k * SLOTS + slot) * SLOT + m.shift, SPAN_LEN)
        };

        let attrs = QuantityAttrs {
            mods: m.mods.clone(),
            unit: m.unit.map(str::to_string),
        };
        out.push(span(0, AnnotType::Quantity).with_payload(Payload::Quantity(attrs)).unwrap());

        if m.property {
            let links = PropertyLinks {
                has_quantity: Some(id(0)),
            };
            out.push(
                span(1, AnnotType::MeasuredProperty)
                    .with_payload(Payload::MeasuredProperty(links))
                    .unwrap(),
            );
        }
        if m.entity {
            let links = if m.property {
                EntityLinks {
                    has_property: Some(id(1)),
                    has_quantity: None,
                }
            } else {
                EntityLinks {
                    has_property: None,
                    has_quantity: Some(id(0)),
                }
            };
            out.push(
                span(2, AnnotType::MeasuredEntity)
                    .with_payload(Payload::MeasuredEntity(links))
                    .unwrap(),
            );
        }
        if let Some(target) = m.qualifies {
            let slot = match target {
                1 if m.property => 1,
                2 if m.entity => 2,
                _ => 0,
            };
            let links = QualifierLinks {
                qualifies: Some(id(slot)),
            };
            out.push(
                span(3, AnnotType::Qualifier)
                    .with_payload(Payload::Qualifier(links))
                    .unwrap(),
            );
        }
    }
    out
}

/// What each score type should see from one side: span rows, units,
/// modifier tags and relation links.
fn items(rows: &[Annotation]) -> BTreeMap<ScoreType, usize> {
    let mut counts = BTreeMap::new();
    for r in rows {
        *counts.entry(ScoreType::from(r.annot_type)).or_insert(0) += 1;
        if let Some(q) = r.payload.quantity() {
            if q.unit().is_some() {
                *counts.entry(ScoreType::Unit).or_insert(0) += 1;
            }
            *counts.entry(ScoreType::Modifier).or_insert(0) += q.mods.len();
        }
        if let Some(relation) = r.relation() {
            *counts.entry(ScoreType::from(relation.rel_type)).or_insert(0) += 1;
        }
    }
    counts
}

fn outcomes(records: &[ScoreRecord], kind: ScoreType, match_type: MatchType) -> usize {
    records
        .iter()
        .filter(|r| r.kind == kind && r.match_type == match_type)
        .count()
}

fn of_type(rows: &[Annotation], t: AnnotType) -> Vec<&Annotation> {
    rows.iter().filter(|r| r.annot_type == t).collect()
}

fn single_doc(rows: Vec<Annotation>) -> DocumentAnnotations {
    AnnotationStore::from_annotations(rows)
        .doc("d")
        .cloned()
        .unwrap_or_else(|| DocumentAnnotations::empty("d"))
}

proptest! {
    #[test]
    fn test_every_row_lands_in_one_outcome(
        doc in "[a-z0-9 ]{60,80}",
        gold_spans in spans(),
        sub_spans in spans(),
    ) {
        let gold = rows(&doc, &gold_spans, "G");
        let sub = rows(&doc, &sub_spans, "S");
        let gold_refs: Vec<&Annotation> = gold.iter().collect();
        let sub_refs: Vec<&Annotation> = sub.iter().collect();

        let m = match_spans(AnnotType::Quantity, &gold_refs, &sub_refs, None, TokenSplit::Whitespace);
        prop_assert_eq!(m.matched.len() + m.sub_only.len(), sub.len());
        prop_assert_eq!(m.gold_matched.len() + m.gold_only.len(), gold.len());
        for g in &m.gold_only {
            prop_assert!(!m.gold_matched.iter().any(|h| std::ptr::eq(*h, *g)));
        }
    }

    #[test]
    fn test_exact_match_means_full_overlap(
        doc in "[a-z0-9 ]{60,80}",
        gold_spans in spans(),
        sub_spans in spans(),
    ) {
        let gold = rows(&doc, &gold_spans, "G");
        let sub = rows(&doc, &sub_spans, "S");
        let gold_refs: Vec<&Annotation> = gold.iter().collect();
        let sub_refs: Vec<&Annotation> = sub.iter().collect();

        let m = match_spans(AnnotType::Quantity, &gold_refs, &sub_refs, None, TokenSplit::Whitespace);
        for pair in &m.matched {
            prop_assert!((0.0..=1.0).contains(&pair.f1));
            if pair.em {
                prop_assert!(pair.f1 == 1.0 || pair.sub.text.trim().is_empty(),
                    "EM pair with f1 {} for {:?}", pair.f1, pair.sub.text);
            }
        }
    }

    #[test]
    fn test_gated_spans_partition_both_sides(
        doc in text(),
        gold_ms in measurements(),
        sub_ms in measurements(),
        first_set in 1i64..4,
    ) {
        let gold = measurement_rows(&doc, "d", &gold_ms, 1, "T");
        let sub = measurement_rows(&doc, "d", &sub_ms, first_set, "S");
        let quantities = match_spans(
            AnnotType::Quantity,
            &of_type(&gold, AnnotType::Quantity),
            &of_type(&sub, AnnotType::Quantity),
            None,
            TokenSplit::Whitespace,
        );
        let alignment = AlignmentIndex::from_matches(&quantities.matched);

        for kind in [AnnotType::MeasuredEntity, AnnotType::MeasuredProperty, AnnotType::Qualifier] {
            let (g, s) = (of_type(&gold, kind), of_type(&sub, kind));
            let m = match_spans(kind, &g, &s, Some(&alignment), TokenSplit::Whitespace);
            prop_assert_eq!(m.matched.len() + m.sub_only.len(), s.len(), "{}", kind);
            prop_assert_eq!(m.gold_matched.len() + m.gold_only.len(), g.len(), "{}", kind);
            for pair in &m.matched {
                prop_assert_eq!(alignment.gold_set(pair.sub.annot_set), Some(pair.gold.annot_set));
            }
        }
    }

    #[test]
    fn test_every_score_type_partitions_submission_items(
        doc in text(),
        gold_ms in measurements(),
        sub_ms in measurements(),
        first_set in 1i64..4,
    ) {
        let gold = measurement_rows(&doc, "d", &gold_ms, 1, "T");
        let sub = measurement_rows(&doc, "d", &sub_ms, first_set, "S");
        let (gold_items, sub_items) = (items(&gold), items(&sub));
        let records = score_document(&single_doc(gold), &single_doc(sub), TokenSplit::Whitespace);

        for kind in ScoreType::ALL {
            let gold_n = gold_items.get(&kind).copied().unwrap_or(0);
            let sub_n = sub_items.get(&kind).copied().unwrap_or(0);
            let matched = outcomes(&records, kind, MatchType::Match);
            let gold_only = outcomes(&records, kind, MatchType::GoldOnly);

            prop_assert_eq!(matched + outcomes(&records, kind, MatchType::SubOnly), sub_n, "{}", kind);
            prop_assert!(gold_only <= gold_n, "{}: {} gold only of {}", kind, gold_only, gold_n);
            if matched > 0 {
                prop_assert!(gold_only < gold_n, "{}: matched but every gold item missed", kind);
            }
        }
    }

    #[test]
    fn test_self_scoring_matches_everything(
        doc in text(),
        ms in measurements(),
    ) {
        let gold = measurement_rows(&doc, "d", &ms, 1, "T");
        let expected = items(&gold);
        let side = single_doc(gold);
        let records = score_document(&side, &side, TokenSplit::Whitespace);

        prop_assert!(records.iter().all(|r| r.match_type == MatchType::Match && r.em == 1.0));
        for kind in ScoreType::ALL {
            prop_assert_eq!(
                outcomes(&records, kind, MatchType::Match),
                expected.get(&kind).copied().unwrap_or(0),
                "{}", kind
            );
        }
    }

    #[test]
    fn test_corpus_equals_documents_in_id_order(
        docs in prop::collection::vec((text(), measurements(), measurements(), 0u8..3), 1..5),
    ) {
        let mut gold_rows = Vec::new();
        let mut sub_rows = Vec::new();
        // Reverse order so the stores, not the input, fix the document order.
        for (i, (doc, gold_ms, sub_ms, sides)) in docs.iter().enumerate().rev() {
            let doc_id = format!("S{}-1", i);
            if *sides != 2 {
                gold_rows.extend(measurement_rows(doc, &doc_id, gold_ms, 1, "T"));
            }
            if *sides != 1 {
                sub_rows.extend(measurement_rows(doc, &doc_id, sub_ms, 1, "S"));
            }
        }
        let gold = AnnotationStore::from_annotations(gold_rows);
        let sub = AnnotationStore::from_annotations(sub_rows);

        let doc_ids: BTreeSet<&str> = gold.doc_ids().chain(sub.doc_ids()).collect();
        let mut expected = Vec::new();
        for doc_id in doc_ids {
            let empty = DocumentAnnotations::empty(doc_id);
            expected.extend(score_document(
                gold.doc(doc_id).unwrap_or(&empty),
                sub.doc(doc_id).unwrap_or(&empty),
                TokenSplit::Whitespace,
            ));
        }

        let table = score_corpus(&gold, &sub, TokenSplit::Whitespace);
        prop_assert_eq!(table.records(), expected.as_slice());
    }

    #[test]
    fn test_aggregation_is_stable_and_bounded(
        doc in "[a-z0-9 ]{60,80}",
        gold_spans in spans(),
        sub_spans in spans(),
    ) {
        let gold = AnnotationStore::from_annotations(rows(&doc, &gold_spans, "G"));
        let sub = AnnotationStore::from_annotations(rows(&doc, &sub_spans, "S"));
        let table = score_corpus(&gold, &sub, TokenSplit::Whitespace);

        for mode in [Mode::Overall, Mode::Class, Mode::Doc, Mode::ClassDoc] {
            let first = aggregate(&table, mode);
            prop_assert_eq!(&first, &aggregate(&table, mode));
            for s in &first {
                prop_assert_eq!(s.tp + s.fp + s.fn_, s.rows);
                if let Prf::Scored { precision, recall, f_measure } = s.prf {
                    prop_assert!((0.0..=1.0).contains(&precision));
                    prop_assert!((0.0..=1.0).contains(&recall));
                    prop_assert!((0.0..=1.0).contains(&f_measure));
                }
            }
        }

        let overall = &aggregate(&table, Mode::Overall)[0];
        prop_assert_eq!(overall.tp, table.count(MatchType::Match));
        prop_assert_eq!(overall.tp + overall.fp, sub.len());
    }
}
