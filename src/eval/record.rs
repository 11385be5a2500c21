//! Score records: one row per alignment decision.

use measeval_core::{AnnotType, RelationType};
use serde::{Deserialize, Serialize};

/// Outcome of an alignment decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchType {
    /// Submission and gold agree (true positive).
    #[serde(rename = "Match")]
    Match,
    /// Submission row with no gold counterpart (false positive).
    #[serde(rename = "Sub only")]
    SubOnly,
    /// Gold row the submission missed (false negative).
    #[serde(rename = "Gold only")]
    GoldOnly,
}

impl MatchType {
    /// Label used in reports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            MatchType::Match => "Match",
            MatchType::SubOnly => "Sub only",
            MatchType::GoldOnly => "Gold only",
        }
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a record scores: a span category, a dependent attribute, or a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScoreType {
    Quantity,
    MeasuredEntity,
    MeasuredProperty,
    Qualifier,
    Unit,
    #[serde(rename = "modifier")]
    Modifier,
    HasQuantity,
    HasProperty,
    Qualifies,
}

impl ScoreType {
    /// Every type, in class-report order.
    pub const ALL: [ScoreType; 9] = [
        ScoreType::Quantity,
        ScoreType::MeasuredEntity,
        ScoreType::MeasuredProperty,
        ScoreType::Qualifier,
        ScoreType::Unit,
        ScoreType::Modifier,
        ScoreType::HasQuantity,
        ScoreType::HasProperty,
        ScoreType::Qualifies,
    ];

    /// Label used in reports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ScoreType::Quantity => "Quantity",
            ScoreType::MeasuredEntity => "MeasuredEntity",
            ScoreType::MeasuredProperty => "MeasuredProperty",
            ScoreType::Qualifier => "Qualifier",
            ScoreType::Unit => "Unit",
            ScoreType::Modifier => "modifier",
            ScoreType::HasQuantity => "HasQuantity",
            ScoreType::HasProperty => "HasProperty",
            ScoreType::Qualifies => "Qualifies",
        }
    }
}

impl std::fmt::Display for ScoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<AnnotType> for ScoreType {
    fn from(t: AnnotType) -> Self {
        match t {
            AnnotType::Quantity => ScoreType::Quantity,
            AnnotType::MeasuredEntity => ScoreType::MeasuredEntity,
            AnnotType::MeasuredProperty => ScoreType::MeasuredProperty,
            AnnotType::Qualifier => ScoreType::Qualifier,
        }
    }
}

impl From<RelationType> for ScoreType {
    fn from(t: RelationType) -> Self {
        match t {
            RelationType::HasQuantity => ScoreType::HasQuantity,
            RelationType::HasProperty => ScoreType::HasProperty,
            RelationType::Qualifies => ScoreType::Qualifies,
        }
    }
}

/// One scored alignment decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Document the decision was made in
    #[serde(rename = "docId")]
    pub doc_id: String,
    /// Outcome
    #[serde(rename = "matchType")]
    pub match_type: MatchType,
    /// Category scored
    #[serde(rename = "type")]
    pub kind: ScoreType,
    /// Exact match score, 0 or 1
    #[serde(rename = "EM")]
    pub em: f64,
    /// Overlap score in [0, 1]
    #[serde(rename = "F1")]
    pub f1: f64,
    /// Subject category of the document, once joined
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl ScoreRecord {
    /// A matched pair with its scores.
    #[must_use]
    pub fn matched(doc_id: impl Into<String>, kind: ScoreType, em: f64, f1: f64) -> Self {
        Self {
            doc_id: doc_id.into(),
            match_type: MatchType::Match,
            kind,
            em,
            f1,
            subject: None,
        }
    }

    /// A binary match: EM and F1 both 1.
    #[must_use]
    pub fn exact(doc_id: impl Into<String>, kind: ScoreType) -> Self {
        Self::matched(doc_id, kind, 1.0, 1.0)
    }

    /// A submission row without gold counterpart, scored zero.
    #[must_use]
    pub fn sub_only(doc_id: impl Into<String>, kind: ScoreType) -> Self {
        Self::unmatched(doc_id, kind, MatchType::SubOnly)
    }

    /// A gold row the submission missed, scored zero.
    #[must_use]
    pub fn gold_only(doc_id: impl Into<String>, kind: ScoreType) -> Self {
        Self::unmatched(doc_id, kind, MatchType::GoldOnly)
    }

    fn unmatched(doc_id: impl Into<String>, kind: ScoreType, match_type: MatchType) -> Self {
        Self {
            doc_id: doc_id.into(),
            match_type,
            kind,
            em: 0.0,
            f1: 0.0,
            subject: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmatched_records_score_zero() {
        let s = ScoreRecord::sub_only("d", ScoreType::Unit);
        let g = ScoreRecord::gold_only("d", ScoreType::Unit);
        assert_eq!((s.em, s.f1, s.match_type), (0.0, 0.0, MatchType::SubOnly));
        assert_eq!((g.em, g.f1, g.match_type), (0.0, 0.0, MatchType::GoldOnly));
    }

    #[test]
    fn test_labels() {
        assert_eq!(ScoreType::Modifier.as_str(), "modifier");
        assert_eq!(ScoreType::from(RelationType::Qualifies), ScoreType::Qualifies);
        assert_eq!(MatchType::SubOnly.to_string(), "Sub only");
        let json = serde_json::to_string(&ScoreRecord::exact("d", ScoreType::Modifier)).unwrap();
        assert!(json.contains(r#""type":"modifier""#));
        assert!(json.contains(r#""matchType":"Match""#));
    }
}
