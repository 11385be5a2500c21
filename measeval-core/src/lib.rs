//! # measeval-core
//!
//! Data model shared by the measeval scorer: annotation rows, character
//! spans, and the typed `other` payload with its relation links.
//!
//! Loading, validation and scoring live in the `measeval` crate; this crate
//! only knows how a single row is shaped.

#![warn(missing_docs)]

/// Rows, categories and spans.
pub mod annotation;
/// Error types.
pub mod error;
/// The `other` column.
pub mod payload;

pub use annotation::{AnnotType, Annotation, Span};
pub use error::{Error, Result};
pub use payload::{
    EntityLinks, ModifierTag, Payload, PropertyLinks, QualifierLinks, QuantityAttrs, Relation,
    RelationType,
};
