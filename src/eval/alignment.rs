//! Submission-set to gold-set alignment, fixed by the quantity pass.

use super::span::SpanMatch;
use std::collections::HashMap;

/// Per-document map from a submission annotSet to the gold annotSet its
/// quantity matched.
///
/// Built once from the quantity matches and read-only afterwards. When a
/// submission set contains several matched quantities, the first one in
/// file order decides the alignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignmentIndex {
    sets: HashMap<i64, i64>,
}

impl AlignmentIndex {
    /// Build from the retained quantity pairs, in submission order.
    #[must_use]
    pub fn from_matches(quantity_matches: &[SpanMatch<'_>]) -> Self {
        let mut sets = HashMap::new();
        for m in quantity_matches {
            let gold_set = m.gold.annot_set;
            let existing = *sets.entry(m.sub.annot_set).or_insert(gold_set);
            if existing != gold_set {
                log::debug!(
                    "{}: submission set {} already aligned to gold set {}, ignoring {}",
                    m.sub.doc_id,
                    m.sub.annot_set,
                    existing,
                    gold_set
                );
            }
        }
        Self { sets }
    }

    /// Gold set aligned with submission set `sub_set`.
    #[must_use]
    pub fn gold_set(&self, sub_set: i64) -> Option<i64> {
        self.sets.get(&sub_set).copied()
    }

    /// Whether `sub_set` has an alignment.
    #[must_use]
    pub fn is_aligned(&self, sub_set: i64) -> bool {
        self.sets.contains_key(&sub_set)
    }

    /// Number of aligned submission sets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// True if no set was aligned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
