//! Annotation rows and character spans.

use crate::error::{Error, Result};
use crate::payload::{Payload, Relation};
use serde::{Deserialize, Serialize};

/// The four span categories a row can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnnotType {
    /// A measured value, optionally with unit and modifiers.
    Quantity,
    /// The thing being measured.
    MeasuredEntity,
    /// The property of the entity being measured.
    MeasuredProperty,
    /// Text that qualifies an entity, property or quantity.
    Qualifier,
}

impl AnnotType {
    /// All categories, in scoring order.
    pub const ALL: [AnnotType; 4] = [
        AnnotType::Quantity,
        AnnotType::MeasuredEntity,
        AnnotType::MeasuredProperty,
        AnnotType::Qualifier,
    ];

    /// Label as it appears in the `annotType` column.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            AnnotType::Quantity => "Quantity",
            AnnotType::MeasuredEntity => "MeasuredEntity",
            AnnotType::MeasuredProperty => "MeasuredProperty",
            AnnotType::Qualifier => "Qualifier",
        }
    }

    /// Whether rows of this category carry a relation in their payload.
    #[must_use]
    pub const fn is_relation_bearing(&self) -> bool {
        !matches!(self, AnnotType::Quantity)
    }
}

impl std::fmt::Display for AnnotType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AnnotType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AnnotType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                Error::field(
                    "annotType",
                    format!(
                        "'{}' is not one of Quantity, MeasuredEntity, MeasuredProperty, Qualifier",
                        s
                    ),
                )
            })
    }
}

/// A character-offset interval `[start, end)` into a document's raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in characters.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether `text` has exactly as many characters as the span covers.
    #[must_use]
    pub fn fits_text(&self, text: &str) -> bool {
        text.chars().count() == self.len()
    }

    /// True for a zero-width span.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Candidate test used for alignment.
    ///
    /// Boundaries are inclusive on both sides: an endpoint of one span lying
    /// anywhere in `[start, end]` of the other counts, so touching spans
    /// (`a.end == b.start`) are candidates while `a.end < b.start` is not.
    #[must_use]
    pub fn overlaps(&self, other: &Span) -> bool {
        let within = |x: usize, s: &Span| x >= s.start && x <= s.end;
        within(self.start, other)
            || within(self.end, other)
            || within(other.start, self)
            || within(other.end, self)
    }

    /// Intersection `[max(start), min(end))`, possibly empty.
    #[must_use]
    pub fn intersection(&self, other: &Span) -> Span {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end).max(start);
        Span { start, end }
    }
}

/// One annotation row: `(docId, annotSet, annotId)` plus its span and payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Document identifier
    pub doc_id: String,
    /// Measurement instance this span belongs to within the document
    pub annot_set: i64,
    /// Row identifier, referenced by relation payloads
    pub annot_id: String,
    /// Category
    pub annot_type: AnnotType,
    /// Character offsets into the document
    pub span: Span,
    /// Covered text; its length equals `span.len()` in valid data
    pub text: String,
    /// Type-dependent attributes and relation links
    pub payload: Payload,
}

impl Annotation {
    /// Create an annotation with an empty payload of the matching type.
    #[must_use]
    pub fn new(
        doc_id: impl Into<String>,
        annot_set: i64,
        annot_id: impl Into<String>,
        annot_type: AnnotType,
        start: usize,
        end: usize,
        text: impl Into<String>,
    ) -> Self {
        Self {
            doc_id: doc_id.into(),
            annot_set,
            annot_id: annot_id.into(),
            annot_type,
            span: Span::new(start, end),
            text: text.into(),
            payload: Payload::empty(annot_type),
        }
    }

    /// Replace the payload.
    ///
    /// # Errors
    ///
    /// Returns an error when the payload variant belongs to another category.
    pub fn with_payload(mut self, payload: Payload) -> Result<Self> {
        if payload.annot_type() != self.annot_type {
            return Err(Error::invalid_input(format!(
                "{} payload attached to {} row {}",
                payload.annot_type(),
                self.annot_type,
                self.annot_id
            )));
        }
        self.payload = payload;
        Ok(self)
    }

    /// Whether `text` has exactly `end - start` characters.
    #[must_use]
    pub fn text_length_matches(&self) -> bool {
        self.span.fits_text(&self.text)
    }

    /// The relation this row is the source of, if any.
    #[must_use]
    pub fn relation(&self) -> Option<Relation> {
        self.payload
            .relation()
            .map(|(rel_type, target)| Relation::new(rel_type, &self.annot_id, target))
    }
}
