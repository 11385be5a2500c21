//! Alignment and scoring engine.
//!
//! # Overview
//!
//! Scoring runs per document, in dependency order:
//!
//! 1. **Quantities** are matched on offset overlap alone ([`span`]). Their
//!    matches fix which gold measurement set each submission set stands for
//!    ([`alignment`]).
//! 2. **Entities, properties, qualifiers** are matched on overlap within the
//!    aligned set. **Units and modifiers** are compared within the aligned set
//!    ([`attribute`]).
//! 3. **Relations** are re-keyed through the span match tables and compared
//!    with gold ([`relation`]).
//!
//! Every decision becomes a [`ScoreRecord`]; [`aggregate`](aggregate::aggregate)
//! turns the records into precision / recall / F-measure and EM / F1 means at
//! the requested granularity.
//!
//! # Metrics
//!
//! | Metric | Scope | Definition |
//! |--------|-------|------------|
//! | EM | span pairs | 1 if both boundaries agree |
//! | F1 (overlap) | span pairs | token overlap F1, see [`overlap`] |
//! | EM = F1 | units, modifiers, relations | 1 on match |
//! | P / R / F | any slice | from Match / Sub only / Gold only counts |
//!
//! # Example
//!
//! ```rust
//! use measeval::eval::{aggregate, score_corpus, Mode, TokenSplit};
//! use measeval::store::AnnotationStore;
//! use measeval::{AnnotType, Annotation};
//!
//! let gold = AnnotationStore::from_annotations([
//!     Annotation::new("doc-1", 1, "T1-1", AnnotType::Quantity, 10, 15, "12 kg"),
//! ]);
//! let sub = AnnotationStore::from_annotations([
//!     Annotation::new("doc-1", 1, "T1", AnnotType::Quantity, 10, 13, "12 "),
//! ]);
//!
//! let table = score_corpus(&gold, &sub, TokenSplit::Whitespace);
//! let overall = &aggregate(&table, Mode::Overall)[0];
//! assert_eq!(overall.tp, 1);
//! assert!((overall.mean_f1.unwrap() - 2.0 / 3.0).abs() < 1e-9);
//! ```

pub mod aggregate;
pub mod alignment;
pub mod attribute;
pub mod overlap;
pub mod record;
pub mod relation;
pub mod report;
pub mod scorer;
pub mod span;

pub use aggregate::{aggregate, Mode, Prf, Slice, SliceSummary, SubjectSource};
pub use alignment::AlignmentIndex;
pub use attribute::{match_modifiers, match_units, AttributeMatches};
pub use overlap::{exact_match, overlap_f1, SpanText, TokenSplit};
pub use record::{MatchType, ScoreRecord, ScoreType};
pub use relation::{resolve_relations, MatchTables, RelationMatches, SetRelation};
pub use report::{write_records, OutputFormat, ScoreReport};
pub use scorer::{score_corpus, score_document, ScoreTable};
pub use span::{match_spans, MatchTable, SpanMatch, SpanMatches};
