//! The `other` column: a payload whose shape depends on the row's category.
//!
//! | Category | Keys |
//! |----------|------|
//! | Quantity | `mods` (list of [`ModifierTag`]), `unit` |
//! | MeasuredEntity | `HasProperty`, `HasQuantity` |
//! | MeasuredProperty | `HasQuantity` |
//! | Qualifier | `Qualifies` |
//!
//! Shapes are enforced while parsing: unknown keys, a non-list `mods` or an
//! unknown modifier tag are errors.

use crate::annotation::AnnotType;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Modifier tags a quantity can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModifierTag {
    /// A count of things, usually unitless ("12 samples").
    IsCount,
    /// Hedged value ("about 5 m").
    IsApproximate,
    /// Mean with a tolerance ("5 ± 0.2 m on average").
    IsMeanHasTolerance,
    /// Median value.
    IsMedian,
    /// Several values listed together ("3, 4 and 7 kg").
    IsList,
    /// Range with a tolerance on its bounds.
    IsRangeHasTolerance,
    /// Mean value.
    IsMean,
    /// Range of values ("3-7 kg").
    IsRange,
    /// Value with a tolerance ("5 ± 0.2 m").
    HasTolerance,
    /// Mean given as a range.
    IsMeanIsRange,
    /// Mean with a standard deviation.
    IsMeanHasSD,
}

impl ModifierTag {
    /// Every known tag.
    pub const ALL: [ModifierTag; 11] = [
        ModifierTag::IsCount,
        ModifierTag::IsApproximate,
        ModifierTag::IsMeanHasTolerance,
        ModifierTag::IsMedian,
        ModifierTag::IsList,
        ModifierTag::IsRangeHasTolerance,
        ModifierTag::IsMean,
        ModifierTag::IsRange,
        ModifierTag::HasTolerance,
        ModifierTag::IsMeanIsRange,
        ModifierTag::IsMeanHasSD,
    ];

    /// Tag as written in the `mods` list.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ModifierTag::IsCount => "IsCount",
            ModifierTag::IsApproximate => "IsApproximate",
            ModifierTag::IsMeanHasTolerance => "IsMeanHasTolerance",
            ModifierTag::IsMedian => "IsMedian",
            ModifierTag::IsList => "IsList",
            ModifierTag::IsRangeHasTolerance => "IsRangeHasTolerance",
            ModifierTag::IsMean => "IsMean",
            ModifierTag::IsRange => "IsRange",
            ModifierTag::HasTolerance => "HasTolerance",
            ModifierTag::IsMeanIsRange => "IsMeanIsRange",
            ModifierTag::IsMeanHasSD => "IsMeanHasSD",
        }
    }
}

impl std::fmt::Display for ModifierTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ModifierTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ModifierTag::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| Error::field("other", format!("unknown modifier '{}'", s)))
    }
}

/// Typed relation between two annotations of the same document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RelationType {
    /// MeasuredEntity or MeasuredProperty → Quantity
    HasQuantity,
    /// MeasuredEntity → MeasuredProperty
    HasProperty,
    /// Qualifier → MeasuredEntity, MeasuredProperty or Quantity
    Qualifies,
}

impl RelationType {
    /// All relation types, in scoring order.
    pub const ALL: [RelationType; 3] = [
        RelationType::HasQuantity,
        RelationType::HasProperty,
        RelationType::Qualifies,
    ];

    /// Payload key naming this relation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            RelationType::HasQuantity => "HasQuantity",
            RelationType::HasProperty => "HasProperty",
            RelationType::Qualifies => "Qualifies",
        }
    }

    /// Categories allowed as the relation's source.
    #[must_use]
    pub const fn sources(&self) -> &'static [AnnotType] {
        match self {
            RelationType::HasQuantity => &[AnnotType::MeasuredEntity, AnnotType::MeasuredProperty],
            RelationType::HasProperty => &[AnnotType::MeasuredEntity],
            RelationType::Qualifies => &[AnnotType::Qualifier],
        }
    }

    /// Categories allowed as the relation's target.
    #[must_use]
    pub const fn targets(&self) -> &'static [AnnotType] {
        match self {
            RelationType::HasQuantity => &[AnnotType::Quantity],
            RelationType::HasProperty => &[AnnotType::MeasuredProperty],
            RelationType::Qualifies => &[
                AnnotType::MeasuredEntity,
                AnnotType::MeasuredProperty,
                AnnotType::Quantity,
            ],
        }
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `(src, relType, target)` extracted from a source row's payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    /// Relation type
    pub rel_type: RelationType,
    /// annotId of the row carrying the payload
    pub src: String,
    /// annotId named in the payload
    pub target: String,
}

impl Relation {
    /// Create a new relation.
    #[must_use]
    pub fn new(rel_type: RelationType, src: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            rel_type,
            src: src.into(),
            target: target.into(),
        }
    }
}

/// Quantity attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuantityAttrs {
    /// Modifier tags, exploded one record per tag when scored
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mods: Vec<ModifierTag>,
    /// Unit text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl QuantityAttrs {
    /// The unit, treating an empty string as absent.
    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref().filter(|u| !u.is_empty())
    }
}

/// MeasuredEntity links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityLinks {
    /// annotId of the MeasuredProperty this entity has
    #[serde(rename = "HasProperty", default, skip_serializing_if = "Option::is_none")]
    pub has_property: Option<String>,
    /// annotId of the Quantity measured directly on this entity
    #[serde(rename = "HasQuantity", default, skip_serializing_if = "Option::is_none")]
    pub has_quantity: Option<String>,
}

/// MeasuredProperty links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyLinks {
    /// annotId of the Quantity measuring this property
    #[serde(rename = "HasQuantity", default, skip_serializing_if = "Option::is_none")]
    pub has_quantity: Option<String>,
}

/// Qualifier links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QualifierLinks {
    /// annotId of the row this qualifier qualifies
    #[serde(rename = "Qualifies", default, skip_serializing_if = "Option::is_none")]
    pub qualifies: Option<String>,
}

/// Typed `other` payload, one variant per [`AnnotType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    /// Unit and modifiers
    Quantity(QuantityAttrs),
    /// Entity links
    MeasuredEntity(EntityLinks),
    /// Property links
    MeasuredProperty(PropertyLinks),
    /// Qualifier link
    Qualifier(QualifierLinks),
}

impl Payload {
    /// The payload of a row whose `other` column is empty.
    #[must_use]
    pub fn empty(annot_type: AnnotType) -> Self {
        match annot_type {
            AnnotType::Quantity => Payload::Quantity(QuantityAttrs::default()),
            AnnotType::MeasuredEntity => Payload::MeasuredEntity(EntityLinks::default()),
            AnnotType::MeasuredProperty => Payload::MeasuredProperty(PropertyLinks::default()),
            AnnotType::Qualifier => Payload::Qualifier(QualifierLinks::default()),
        }
    }

    /// Parse the raw `other` column for a row of `annot_type`.
    ///
    /// # Errors
    ///
    /// Invalid JSON, a non-object value, keys not allowed for the category,
    /// a `mods` value that is not a list of known tags.
    pub fn parse(annot_type: AnnotType, other: &str) -> Result<Self> {
        let other = other.trim();
        if other.is_empty() {
            return Ok(Self::empty(annot_type));
        }

        let value: serde_json::Value = serde_json::from_str(other)
            .map_err(|e| Error::field("other", format!("'{}' is not valid json: {}", other, e)))?;
        if !value.is_object() {
            return Err(Error::field(
                "other",
                format!("'{}' is not a JSON object", other),
            ));
        }

        let shape_err =
            |e: serde_json::Error| Error::field("other", format!("'{}' for {}: {}", other, annot_type, e));

        Ok(match annot_type {
            AnnotType::Quantity => {
                Payload::Quantity(serde_json::from_value(value).map_err(shape_err)?)
            }
            AnnotType::MeasuredEntity => {
                Payload::MeasuredEntity(serde_json::from_value(value).map_err(shape_err)?)
            }
            AnnotType::MeasuredProperty => {
                Payload::MeasuredProperty(serde_json::from_value(value).map_err(shape_err)?)
            }
            AnnotType::Qualifier => {
                Payload::Qualifier(serde_json::from_value(value).map_err(shape_err)?)
            }
        })
    }

    /// Category this payload belongs to.
    #[must_use]
    pub const fn annot_type(&self) -> AnnotType {
        match self {
            Payload::Quantity(_) => AnnotType::Quantity,
            Payload::MeasuredEntity(_) => AnnotType::MeasuredEntity,
            Payload::MeasuredProperty(_) => AnnotType::MeasuredProperty,
            Payload::Qualifier(_) => AnnotType::Qualifier,
        }
    }

    /// Quantity attributes, if this is a quantity payload.
    #[must_use]
    pub fn quantity(&self) -> Option<&QuantityAttrs> {
        match self {
            Payload::Quantity(q) => Some(q),
            _ => None,
        }
    }

    /// Every relation key present, in key order (`HasProperty` before `HasQuantity`).
    #[must_use]
    pub fn relation_links(&self) -> Vec<(RelationType, &str)> {
        match self {
            Payload::Quantity(_) => Vec::new(),
            Payload::MeasuredEntity(links) => [
                (RelationType::HasProperty, links.has_property.as_deref()),
                (RelationType::HasQuantity, links.has_quantity.as_deref()),
            ]
            .into_iter()
            .filter_map(|(t, target)| target.map(|target| (t, target)))
            .collect(),
            Payload::MeasuredProperty(links) => links
                .has_quantity
                .as_deref()
                .map(|t| vec![(RelationType::HasQuantity, t)])
                .unwrap_or_default(),
            Payload::Qualifier(links) => links
                .qualifies
                .as_deref()
                .map(|t| vec![(RelationType::Qualifies, t)])
                .unwrap_or_default(),
        }
    }

    /// The relation this payload expresses: the first relation key present.
    #[must_use]
    pub fn relation(&self) -> Option<(RelationType, &str)> {
        self.relation_links().into_iter().next()
    }
}
