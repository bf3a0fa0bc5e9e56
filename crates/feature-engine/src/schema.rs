//! Versioned Feature Schema
//!
//! The ordered list of features a fitted scaler/predictor pair expects, plus
//! the reference level of every categorical attribute. Artifacts carry the
//! schema fingerprint so a reordered or re-levelled schema is caught at load.

use crate::SchemaError;
use data_validator::{AttributeSpec, Constraint};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// One position in the feature vector
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Feature {
    /// Numeric attribute copied verbatim
    Numeric { attribute: &'static str },
    /// 1.0 iff `attribute == category`
    Indicator {
        attribute: &'static str,
        category: &'static str,
    },
}

impl Feature {
    pub const fn numeric(attribute: &'static str) -> Self {
        Feature::Numeric { attribute }
    }

    pub const fn indicator(attribute: &'static str, category: &'static str) -> Self {
        Feature::Indicator {
            attribute,
            category,
        }
    }

    /// Column name used at training time (`age`, `sex_male`, ...)
    pub fn name(&self) -> String {
        match self {
            Feature::Numeric { attribute } => attribute.to_string(),
            Feature::Indicator {
                attribute,
                category,
            } => format!("{attribute}_{category}"),
        }
    }

    /// Source attribute
    pub fn attribute(&self) -> &'static str {
        match self {
            Feature::Numeric { attribute } | Feature::Indicator { attribute, .. } => *attribute,
        }
    }
}

/// Ordered feature schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureSchema {
    version: &'static str,
    features: Vec<Feature>,
    reference_levels: Vec<(&'static str, &'static str)>,
}

impl FeatureSchema {
    /// Create a schema; coherence is checked by [`FeatureSchema::check_attributes`]
    pub fn new(
        version: &'static str,
        features: Vec<Feature>,
        reference_levels: Vec<(&'static str, &'static str)>,
    ) -> Self {
        Self {
            version,
            features,
            reference_levels,
        }
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Number of positions in every encoded vector
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Column names in vector order
    pub fn feature_names(&self) -> Vec<String> {
        self.features.iter().map(Feature::name).collect()
    }

    /// Reference level of a categorical attribute
    pub fn reference_level(&self, attribute: &str) -> Option<&'static str> {
        self.reference_levels
            .iter()
            .find(|(attr, _)| *attr == attribute)
            .map(|(_, level)| *level)
    }

    /// Hex SHA-256 over version, ordered feature names and reference levels
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!("schema:{}\n", self.version));
        for feature in &self.features {
            hasher.update(format!("feature:{}\n", feature.name()));
        }
        for (attribute, level) in &self.reference_levels {
            hasher.update(format!("reference:{attribute}={level}\n"));
        }
        hex::encode(hasher.finalize())
    }

    /// Check the schema against the declared request attributes
    ///
    /// Every numeric feature must come from a numeric attribute, and every
    /// categorical attribute with k categories must contribute exactly its
    /// k-1 non-reference indicators.
    pub fn check_attributes(&self, attributes: &[AttributeSpec]) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        for feature in &self.features {
            let name = feature.name();
            if !seen.insert(name.clone()) {
                return Err(SchemaError::DuplicateFeature(name));
            }

            let attr = attributes
                .iter()
                .find(|a| a.name == feature.attribute())
                .ok_or(SchemaError::UnknownAttribute(feature.attribute()))?;

            match (feature, &attr.constraint) {
                (Feature::Numeric { .. }, Constraint::Range { .. }) => {}
                (Feature::Numeric { attribute }, Constraint::OneOf { .. }) => {
                    return Err(SchemaError::NotNumeric(*attribute));
                }
                (Feature::Indicator { attribute, .. }, Constraint::Range { .. }) => {
                    return Err(SchemaError::NotCategorical(*attribute));
                }
                (
                    Feature::Indicator {
                        attribute,
                        category,
                    },
                    Constraint::OneOf { categories },
                ) => {
                    if !categories.contains(category) {
                        return Err(SchemaError::UnknownCategory {
                            attribute: *attribute,
                            category: *category,
                        });
                    }
                    if self.reference_level(attribute) == Some(*category) {
                        return Err(SchemaError::ReferenceEncoded {
                            attribute: *attribute,
                            category: *category,
                        });
                    }
                }
            }
        }

        for attr in attributes {
            let Some(categories) = attr.categories() else {
                continue;
            };
            let reference = self
                .reference_level(attr.name)
                .ok_or(SchemaError::MissingReference(attr.name))?;
            if !categories.contains(&reference) {
                return Err(SchemaError::UnknownCategory {
                    attribute: attr.name,
                    category: reference,
                });
            }
            let indicators = self
                .features
                .iter()
                .filter(|f| {
                    matches!(f, Feature::Indicator { attribute, .. } if *attribute == attr.name)
                })
                .count();
            if indicators != categories.len() - 1 {
                return Err(SchemaError::IndicatorCount {
                    attribute: attr.name,
                    expected: categories.len() - 1,
                    actual: indicators,
                });
            }
        }

        Ok(())
    }
}
