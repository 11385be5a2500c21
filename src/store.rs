//! In-memory annotation store.
//!
//! One [`AnnotationStore`] holds one side of the comparison (gold or
//! submission). Rows are grouped per document and indexed per category so
//! matchers never scan the whole corpus. Row order within a document is the
//! order rows were inserted, i.e. file order; matchers rely on it for
//! deterministic tie-breaks.

use measeval_core::{AnnotType, Annotation};
use std::collections::{BTreeMap, HashMap};

/// Annotations of a single document.
#[derive(Debug, Clone, Default)]
pub struct DocumentAnnotations {
    doc_id: String,
    rows: Vec<Annotation>,
    by_type: HashMap<AnnotType, Vec<usize>>,
}

impl DocumentAnnotations {
    /// An empty document, used when only one side has rows for `doc_id`.
    #[must_use]
    pub fn empty(doc_id: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            ..Self::default()
        }
    }

    /// Document identifier.
    #[must_use]
    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    fn push(&mut self, annotation: Annotation) {
        self.by_type
            .entry(annotation.annot_type)
            .or_default()
            .push(self.rows.len());
        self.rows.push(annotation);
    }

    /// All rows in insertion order.
    #[must_use]
    pub fn rows(&self) -> &[Annotation] {
        &self.rows
    }

    /// Rows of one category, in insertion order.
    pub fn of_type(&self, annot_type: AnnotType) -> impl Iterator<Item = &Annotation> + '_ {
        self.by_type
            .get(&annot_type)
            .into_iter()
            .flatten()
            .map(move |&i| &self.rows[i])
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the document has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Gold or submission annotations for a whole corpus, keyed by document.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    docs: BTreeMap<String, DocumentAnnotations>,
}

impl AnnotationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from rows, preserving their order within each document.
    pub fn from_annotations(annotations: impl IntoIterator<Item = Annotation>) -> Self {
        let mut store = Self::new();
        store.extend(annotations);
        store
    }

    /// Add one row.
    pub fn insert(&mut self, annotation: Annotation) {
        self.docs
            .entry(annotation.doc_id.clone())
            .or_insert_with(|| DocumentAnnotations::empty(annotation.doc_id.clone()))
            .push(annotation);
    }

    /// Rows of one document.
    #[must_use]
    pub fn doc(&self, doc_id: &str) -> Option<&DocumentAnnotations> {
        self.docs.get(doc_id)
    }

    /// Document ids in sorted order.
    pub fn doc_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.docs.keys().map(String::as_str)
    }

    /// Number of documents.
    #[must_use]
    pub fn doc_count(&self) -> usize {
        self.docs.len()
    }

    /// Total number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.values().map(DocumentAnnotations::len).sum()
    }

    /// True if the store has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Number of rows of one category across all documents.
    #[must_use]
    pub fn count_of_type(&self, annot_type: AnnotType) -> usize {
        self.docs
            .values()
            .map(|d| d.by_type.get(&annot_type).map_or(0, Vec::len))
            .sum()
    }
}

impl Extend<Annotation> for AnnotationStore {
    fn extend<I: IntoIterator<Item = Annotation>>(&mut self, iter: I) {
        for annotation in iter {
            self.insert(annotation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(doc: &str, id: &str, t: AnnotType) -> Annotation {
        Annotation::new(doc, 1, id, t, 0, 1, "x")
    }

    #[test]
    fn test_grouping_and_order() {
        let store = AnnotationStore::from_annotations([
            row("b", "T1", AnnotType::Quantity),
            row("a", "T2", AnnotType::MeasuredEntity),
            row("a", "T3", AnnotType::Quantity),
            row("a", "T4", AnnotType::Quantity),
        ]);

        assert_eq!(store.doc_ids().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(store.len(), 4);
        assert_eq!(store.doc_count(), 2);
        assert_eq!(store.count_of_type(AnnotType::Quantity), 3);

        let a = store.doc("a").unwrap();
        let ids: Vec<_> = a
            .of_type(AnnotType::Quantity)
            .map(|r| r.annot_id.as_str())
            .collect();
        assert_eq!(ids, vec!["T3", "T4"]);
        assert_eq!(a.of_type(AnnotType::Qualifier).count(), 0);
    }

    #[test]
    fn test_empty_store() {
        let store = AnnotationStore::new();
        assert!(store.is_empty());
        assert_eq!(store.count_of_type(AnnotType::Quantity), 0);
        assert!(store.doc("missing").is_none());
    }
}
