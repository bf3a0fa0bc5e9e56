//! Raw and Validated Request Records

use serde::Serialize;
use std::collections::BTreeMap;

/// Request body as received at the boundary
pub type RawInput = serde_json::Map<String, serde_json::Value>;

/// A checked attribute value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    /// Lower-cased category
    Category(String),
}

/// A request whose every declared attribute is present and in bounds
///
/// Only [`crate::Validator::validate`] constructs one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedInput {
    values: BTreeMap<&'static str, Value>,
}

impl ValidatedInput {
    pub(crate) fn new(values: BTreeMap<&'static str, Value>) -> Self {
        Self { values }
    }

    /// Numeric value of an attribute
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.values.get(name)? {
            Value::Number(n) => Some(*n),
            Value::Category(_) => None,
        }
    }

    /// Normalized category of an attribute
    pub fn category(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            Value::Category(c) => Some(c.as_str()),
            Value::Number(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
