//! # measeval
//!
//! Scoring of measurement annotations: quantities, measured entities,
//! measured properties, qualifiers, units, modifiers and the relations
//! between them.
//!
//! - **Alignment**: submitted spans matched to gold spans on offset overlap,
//!   with entities, properties and qualifiers tied to the measurement set
//!   their quantity aligned to
//! - **Metrics**: exact match, token-overlap F1, precision / recall / F
//! - **Granularity**: overall, per class, per subject, per document, per
//!   document and class
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use measeval::loader::{load_corpora, LoadOptions};
//! use measeval::eval::{aggregate, score_corpus, Mode, ScoreReport, TokenSplit};
//!
//! let (gold, sub) = load_corpora("gold/".as_ref(), "sub/".as_ref(), &LoadOptions::default())?;
//! let table = score_corpus(&gold.store, &sub.store, TokenSplit::Whitespace);
//! println!("{}", ScoreReport::new(Mode::Class, aggregate(&table, Mode::Class)));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Adds |
//! |---------|---------|------|
//! | `cli` | yes | `measeval` binary |
//! | `parallel` | no | documents scored on a rayon pool |
//!
//! ## Modules
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | per-document, per-category annotation index |
//! | [`eval`] | matching, relation resolution, aggregation, reports |
//! | [`loader`] | TSV reading and directory discovery |
//! | [`validation`] | submission checks run before scoring |
//! | [`subject`] | document to subject lookup |
//! | [`config`] | TOML run configuration |

pub mod config;
pub mod error;
pub mod eval;
pub mod loader;
pub mod store;
pub mod subject;
pub mod validation;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Error, Result};
pub use measeval_core::{
    AnnotType, Annotation, EntityLinks, ModifierTag, Payload, PropertyLinks, QualifierLinks,
    QuantityAttrs, Relation, RelationType, Span,
};

/// Common imports.
pub mod prelude {
    pub use crate::config::ScoreConfig;
    pub use crate::eval::{
        aggregate, score_corpus, Mode, OutputFormat, Prf, ScoreRecord, ScoreReport, ScoreTable,
        SliceSummary, TokenSplit,
    };
    pub use crate::loader::{load_corpora, LoadOptions};
    pub use crate::store::AnnotationStore;
    pub use crate::subject::SubjectLookup;
    pub use crate::{AnnotType, Annotation, Error, Result};
}
