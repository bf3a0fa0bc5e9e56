//! Feature Vector Assembly

use crate::schema::{Feature, FeatureSchema};
use data_validator::ValidatedInput;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Encoded model input, positions fixed by the schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Raw feature values in schema order
    pub values: Vec<f64>,
    /// Schema features that could not be sourced and were set to 0.0
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub defaulted: Vec<String>,
}

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            defaulted: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Whether every position came from the input
    pub fn is_complete(&self) -> bool {
        self.defaulted.is_empty()
    }
}

/// Encodes validated records against one schema
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    schema: FeatureSchema,
}

impl FeatureEncoder {
    /// Create a new encoder
    pub fn new(schema: FeatureSchema) -> Self {
        Self { schema }
    }

    /// Encode a validated record
    ///
    /// Numeric attributes are copied, categorical attributes become 0/1
    /// indicators, strictly in schema order. No bounds checks happen here.
    pub fn encode(&self, input: &ValidatedInput) -> FeatureVector {
        let mut values = Vec::with_capacity(self.schema.len());
        let mut defaulted = Vec::new();

        for feature in self.schema.features() {
            let value = match feature {
                Feature::Numeric { attribute } => input.number(attribute),
                Feature::Indicator {
                    attribute,
                    category,
                } => input
                    .category(attribute)
                    .map(|value| if value == *category { 1.0 } else { 0.0 }),
            };

            match value {
                Some(v) => values.push(v),
                None => {
                    let name = feature.name();
                    warn!(
                        feature = %name,
                        schema = self.schema.version(),
                        "Feature missing after validation, defaulting to 0"
                    );
                    values.push(0.0);
                    defaulted.push(name);
                }
            }
        }

        debug!("Encoded {} features", values.len());
        FeatureVector { values, defaulted }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModelSpec;
    use data_validator::{AttributeSpec, Validator};
    use proptest::prelude::*;
    use serde_json::json;

    fn encode(spec: &ModelSpec, body: serde_json::Value) -> FeatureVector {
        let input = spec.validator().validate_json(&body).unwrap();
        spec.encoder().encode(&input)
    }

    #[test]
    fn test_insurance_encoding() {
        let spec = ModelSpec::insurance();
        let features = encode(
            &spec,
            json!({
                "age": 30, "sex": "male", "bmi": 25.0,
                "children": 1, "smoker": "no", "region": "northeast"
            }),
        );
        assert_eq!(
            features.values,
            vec![30.0, 25.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0]
        );
        assert!(features.is_complete());
    }

    #[test]
    fn test_insurance_non_reference_levels() {
        let spec = ModelSpec::insurance();
        let features = encode(
            &spec,
            json!({
                "age": 61, "sex": "FEMALE", "bmi": 33.4,
                "children": 0, "smoker": "Yes", "region": "southwest"
            }),
        );
        assert_eq!(
            features.values,
            vec![61.0, 33.4, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn test_diabetes_encoding_is_identity_in_order() {
        let spec = ModelSpec::diabetes();
        let features = encode(
            &spec,
            json!({
                "pregnancies": 2, "glucose": 180, "blood_pressure": 70, "skin_thickness": 20,
                "insulin": 80, "bmi": 35, "diabetes_pedigree": 0.5, "age": 50
            }),
        );
        assert_eq!(
            features.values,
            vec![2.0, 180.0, 70.0, 20.0, 80.0, 35.0, 0.5, 50.0]
        );
    }

    #[test]
    fn test_missing_source_defaults_and_flags() {
        let spec = ModelSpec::insurance();
        // Validate only a subset so the record lacks the region attribute
        let partial = Validator::new(
            spec.attributes
                .iter()
                .filter(|a| a.name != "region")
                .cloned()
                .collect::<Vec<AttributeSpec>>(),
        );
        let input = partial
            .validate_json(&json!({
                "age": 30, "sex": "male", "bmi": 25.0, "children": 1, "smoker": "no"
            }))
            .unwrap();

        let features = spec.encoder().encode(&input);
        assert_eq!(features.len(), spec.schema.len());
        assert_eq!(
            features.defaulted,
            vec!["region_northwest", "region_southeast", "region_southwest"]
        );
        assert_eq!(&features.values[5..], &[0.0, 0.0, 0.0]);
    }

    fn insurance_body() -> impl Strategy<Value = serde_json::Value> {
        (
            18i64..=100,
            prop::sample::select(vec!["male", "female", "MALE", "Female"]),
            10.0f64..=50.0,
            0i64..=10,
            prop::sample::select(vec!["yes", "no"]),
            prop::sample::select(vec!["northeast", "northwest", "southeast", "southwest"]),
        )
            .prop_map(|(age, sex, bmi, children, smoker, region)| {
                json!({
                    "age": age, "sex": sex, "bmi": bmi,
                    "children": children, "smoker": smoker, "region": region
                })
            })
    }

    proptest! {
        #[test]
        fn prop_length_and_one_hot(body in insurance_body()) {
            let spec = ModelSpec::insurance();
            let input = spec.validator().validate_json(&body).unwrap();
            let features = spec.encoder().encode(&input);

            prop_assert_eq!(features.len(), spec.schema.len());
            prop_assert!(features.is_complete());

            for attr in spec.attributes.iter().filter(|a| a.is_categorical()) {
                let hot: Vec<f64> = spec.schema.features().iter().zip(&features.values)
                    .filter(|(f, _)| f.attribute() == attr.name)
                    .map(|(_, v)| *v)
                    .collect();
                prop_assert!(hot.iter().all(|v| *v == 0.0 || *v == 1.0));
                let ones = hot.iter().filter(|v| **v == 1.0).count();
                let at_reference =
                    input.category(attr.name) == spec.schema.reference_level(attr.name);
                prop_assert_eq!(ones, if at_reference { 0 } else { 1 });
            }
        }

        #[test]
        fn prop_encoding_deterministic(body in insurance_body()) {
            let spec = ModelSpec::insurance();
            let input = spec.validator().validate_json(&body).unwrap();
            let first = spec.encoder().encode(&input);
            let second = spec.encoder().encode(&input);
            let first_bits: Vec<u64> = first.values.iter().map(|v| v.to_bits()).collect();
            let second_bits: Vec<u64> = second.values.iter().map(|v| v.to_bits()).collect();
            prop_assert_eq!(first_bits, second_bits);
        }
    }
}
