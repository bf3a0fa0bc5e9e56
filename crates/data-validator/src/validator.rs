//! Request Validator for Range and Enumeration Checking

use crate::attribute::{AttributeSpec, Constraint};
use crate::error::ValidationError;
use crate::input::{RawInput, ValidatedInput, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Validator for one model's declared attributes
#[derive(Debug, Clone)]
pub struct Validator {
    attributes: Vec<AttributeSpec>,
}

impl Validator {
    /// Create a new validator over the given attributes
    pub fn new(attributes: Vec<AttributeSpec>) -> Self {
        Self { attributes }
    }

    /// Validate a raw request
    ///
    /// Attributes are checked in declaration order and the first violation
    /// is returned. Undeclared keys are ignored.
    pub fn validate(&self, raw: &RawInput) -> Result<ValidatedInput, ValidationError> {
        let mut values = BTreeMap::new();

        for attr in &self.attributes {
            let raw_value = raw
                .get(attr.name)
                .filter(|v| !v.is_null())
                .ok_or(ValidationError::MissingField(attr.name))?;

            let value = match &attr.constraint {
                Constraint::Range {
                    range,
                    integer,
                    rules,
                } => {
                    let number = Self::as_number(attr.name, raw_value)?;
                    if *integer && number.fract() != 0.0 {
                        return Err(ValidationError::NotAnInteger {
                            field: attr.name,
                            value: number,
                        });
                    }
                    self.validate_range(attr.name, number, *range)?;
                    if let Some(rule) = rules.iter().find(|rule| !rule.allows(number)) {
                        return Err(ValidationError::RuleViolated {
                            field: attr.name,
                            value: number,
                            message: rule.message,
                        });
                    }
                    Value::Number(number)
                }
                Constraint::OneOf { categories } => {
                    let text = raw_value.as_str().ok_or(ValidationError::InvalidType {
                        field: attr.name,
                        expected: "string",
                    })?;
                    let normalized = text.to_lowercase();
                    if !categories.contains(&normalized.as_str()) {
                        return Err(ValidationError::InvalidCategory {
                            field: attr.name,
                            value: text.to_string(),
                            allowed: *categories,
                        });
                    }
                    Value::Category(normalized)
                }
            };

            values.insert(attr.name, value);
        }

        debug!("Validated {} fields", values.len());
        Ok(ValidatedInput::new(values))
    }

    /// Validate a JSON value that must be an object
    pub fn validate_json(
        &self,
        body: &serde_json::Value,
    ) -> Result<ValidatedInput, ValidationError> {
        let raw = body.as_object().ok_or_else(|| {
            ValidationError::InvalidFormat("expected a JSON object".to_string())
        })?;
        self.validate(raw)
    }

    /// Validate a single value against an inclusive range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Accept JSON numbers and numeric strings
    fn as_number(field: &'static str, value: &serde_json::Value) -> Result<f64, ValidationError> {
        let number = match value {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        number
            .filter(|n| n.is_finite())
            .ok_or(ValidationError::InvalidType {
                field,
                expected: "number",
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::Rule;
    use proptest::prelude::*;
    use serde_json::json;

    fn validator() -> Validator {
        Validator::new(vec![
            AttributeSpec::integer("age", 18.0, 100.0, "Age in years"),
            AttributeSpec::float("bmi", 10.0, 50.0, "Body Mass Index"),
            AttributeSpec::categorical("sex", &["male", "female"], "Gender"),
            AttributeSpec::float("glucose", 0.0, 300.0, "Glucose")
                .with_rule(Rule::at_least(40.0, "glucose too low")),
        ])
    }

    fn body(value: serde_json::Value) -> RawInput {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_valid_record() {
        let input = validator()
            .validate(&body(json!({"age": 30, "bmi": 25.0, "sex": "Male", "glucose": 120})))
            .unwrap();
        assert_eq!(input.number("age"), Some(30.0));
        assert_eq!(input.category("sex"), Some("male"));
        assert_eq!(input.len(), 4);
    }

    #[test]
    fn test_boundaries_inclusive() {
        let v = validator();
        for (age, bmi) in [(18, 10.0), (100, 50.0)] {
            let raw = body(json!({"age": age, "bmi": bmi, "sex": "female", "glucose": 40}));
            assert!(v.validate(&raw).is_ok(), "age={age} bmi={bmi}");
        }
    }

    #[test]
    fn test_out_of_range() {
        let v = validator();
        let err = v
            .validate(&body(json!({"age": 17, "bmi": 25.0, "sex": "male", "glucose": 90})))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                field: "age",
                value: 17.0,
                min: 18.0,
                max: 100.0,
            }
        );

        let err = v
            .validate(&body(json!({"age": 30, "bmi": 50.0001, "sex": "male", "glucose": 90})))
            .unwrap_err();
        assert_eq!(err.field(), Some("bmi"));
    }

    #[test]
    fn test_rule_after_range() {
        let v = validator();
        let err = v
            .validate(&body(json!({"age": 30, "bmi": 25.0, "sex": "male", "glucose": 39})))
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::RuleViolated {
                field: "glucose",
                ..
            }
        ));

        let err = v
            .validate(&body(json!({"age": 30, "bmi": 25.0, "sex": "male", "glucose": 301})))
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfRange {
                field: "glucose",
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_category() {
        let err = validator()
            .validate(&body(json!({"age": 30, "bmi": 25.0, "sex": "other", "glucose": 90})))
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidCategory { field: "sex", .. }
        ));

        let err = validator()
            .validate(&body(json!({"age": 30, "bmi": 25.0, "sex": " male ", "glucose": 90})))
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidCategory { field: "sex", .. }
        ));
    }

    #[test]
    fn test_missing_and_null_fields() {
        let v = validator();
        let err = v.validate(&body(json!({"age": 30, "sex": "male", "glucose": 90}))).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("bmi"));

        let err = v
            .validate(&body(json!({"age": 30, "bmi": null, "sex": "male", "glucose": 90})))
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("bmi"));
    }

    #[test]
    fn test_type_errors() {
        let v = validator();
        let err = v
            .validate(&body(json!({"age": 30.5, "bmi": 25.0, "sex": "male", "glucose": 90})))
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NotAnInteger { field: "age", .. }
        ));

        let err = v
            .validate(&body(json!({"age": true, "bmi": 25.0, "sex": "male", "glucose": 90})))
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidType { field: "age", .. }
        ));

        let err = v
            .validate(&body(json!({"age": 30, "bmi": 25.0, "sex": 1, "glucose": 90})))
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidType { field: "sex", .. }
        ));
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let input = validator()
            .validate(&body(json!({"age": "42", "bmi": "31.5", "sex": "female", "glucose": "88"})))
            .unwrap();
        assert_eq!(input.number("bmi"), Some(31.5));
    }

    #[test]
    fn test_non_object_body() {
        let err = validator().validate_json(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat(_)));
    }

    proptest! {
        #[test]
        fn prop_underage_always_rejected(
            age in 0i64..18,
            bmi in 0.0f64..80.0,
            sex in "[a-z]{1,8}",
            glucose in 0.0f64..400.0,
        ) {
            let raw = body(json!({"age": age, "bmi": bmi, "sex": sex, "glucose": glucose}));
            let err = validator().validate(&raw).unwrap_err();
            prop_assert_eq!(err.field(), Some("age"));
        }

        #[test]
        fn prop_in_range_accepted(
            age in 18i64..=100,
            bmi in 10.0f64..=50.0,
            glucose in 40.0f64..=300.0,
        ) {
            let raw = body(json!({"age": age, "bmi": bmi, "sex": "MALE", "glucose": glucose}));
            prop_assert!(validator().validate(&raw).is_ok());
        }
    }
}
