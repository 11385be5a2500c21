//! SQuAD-style token overlap between a submitted span and a gold span.
//!
//! ```text
//! Gold:  [10========15)   "12 kg"   2 tokens
//! Sub:   [10=====13)      "12 "     1 token
//!                         overlap [10,13) -> "12 " -> 1 token
//!
//! P = 1/1, R = 1/2, F1 = 2PR/(P+R) = 2/3
//! ```
//!
//! The overlap interval is cut out of the *submission* text: its absolute
//! offsets are shifted into the submission's local character coordinates.

use measeval_core::Span;
use serde::{Deserialize, Serialize};

/// How span text is split into tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum TokenSplit {
    /// Runs of Unicode whitespace; empty tokens are never counted.
    #[default]
    Whitespace,
    /// Split on every `' '`, keeping empty pieces. A trailing space adds a
    /// token and an empty string still counts as one.
    SingleSpace,
}

impl TokenSplit {
    /// Number of tokens in `text`.
    #[must_use]
    pub fn token_count(&self, text: &str) -> usize {
        match self {
            TokenSplit::Whitespace => text.split_whitespace().count(),
            TokenSplit::SingleSpace => text.split(' ').count(),
        }
    }
}

impl std::fmt::Display for TokenSplit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TokenSplit::Whitespace => "whitespace",
            TokenSplit::SingleSpace => "single-space",
        })
    }
}

/// One side of a scored pair.
#[derive(Debug, Clone, Copy)]
pub struct SpanText<'a> {
    pub span: Span,
    pub text: &'a str,
}

impl<'a> SpanText<'a> {
    #[must_use]
    pub const fn new(span: Span, text: &'a str) -> Self {
        Self { span, text }
    }
}

/// Exact match: both boundaries equal.
#[must_use]
pub fn exact_match(sub: Span, gold: Span) -> bool {
    sub.start == gold.start && sub.end == gold.end
}

/// The part of the submission text covered by both spans.
///
/// Offsets are character offsets, so the cut is done on `char`s, not bytes.
#[must_use]
pub fn overlap_text<'a>(sub: SpanText<'a>, gold: Span) -> &'a str {
    let inter = sub.span.intersection(&gold);
    let local_start = inter.start.saturating_sub(sub.span.start);
    char_slice(sub.text, local_start, inter.len())
}

fn char_slice(text: &str, start: usize, len: usize) -> &str {
    let mut indices = text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len()));
    let Some(from) = indices.nth(start) else {
        return "";
    };
    let to = if len == 0 {
        from
    } else {
        indices.nth(len - 1).unwrap_or(text.len())
    };
    &text[from..to]
}

/// Token-overlap F1 of a submitted span against a gold span.
///
/// Returns 0 when either text has no tokens or precision and recall are both
/// zero.
#[must_use]
pub fn overlap_f1(sub: SpanText<'_>, gold: SpanText<'_>, split: TokenSplit) -> f64 {
    let sub_tokens = split.token_count(sub.text);
    let gold_tokens = split.token_count(gold.text);
    if sub_tokens == 0 || gold_tokens == 0 {
        return 0.0;
    }

    let overlap = split.token_count(overlap_text(sub, gold.span)) as f64;
    let precision = overlap / sub_tokens as f64;
    let recall = overlap / gold_tokens as f64;
    if precision + recall == 0.0 {
        return 0.0;
    }
    2.0 * precision * recall / (precision + recall)
}
