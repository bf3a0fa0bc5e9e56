//! Feature Engineering Engine
//!
//! Versioned feature schemas and the encoder that turns validated requests
//! into the ordered vectors the fitted artifacts expect.

mod catalog;
mod features;
mod schema;

pub use catalog::{ModelSpec, Task, Variant};
pub use features::{FeatureEncoder, FeatureVector};
pub use schema::{Feature, FeatureSchema};

use thiserror::Error;

/// Schema/attribute incoherence
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Duplicate feature: {0}")]
    DuplicateFeature(String),
    #[error("Feature refers to undeclared attribute: {0}")]
    UnknownAttribute(&'static str),
    #[error("Attribute {0} is categorical but encoded as numeric")]
    NotNumeric(&'static str),
    #[error("Attribute {0} is numeric but encoded as an indicator")]
    NotCategorical(&'static str),
    #[error("Unknown category {category} for attribute {attribute}")]
    UnknownCategory {
        attribute: &'static str,
        category: &'static str,
    },
    #[error("Reference level {category} of {attribute} must not be encoded")]
    ReferenceEncoded {
        attribute: &'static str,
        category: &'static str,
    },
    #[error("No reference level declared for {0}")]
    MissingReference(&'static str),
    #[error("Attribute {attribute} needs {expected} indicators, schema has {actual}")]
    IndicatorCount {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },
}
