//! Model Catalog
//!
//! The two served models: insurance cost regression and diabetes
//! classification. Each entry pairs the request attributes with the feature
//! schema the fitted artifacts were trained on.

use crate::features::FeatureEncoder;
use crate::schema::{Feature, FeatureSchema};
use crate::SchemaError;
use data_validator::{AttributeSpec, Rule, Validator};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Served model variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Insurance,
    Diabetes,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Insurance => "insurance",
            Variant::Diabetes => "diabetes",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "insurance" => Ok(Variant::Insurance),
            "diabetes" => Ok(Variant::Diabetes),
            other => Err(format!("unknown variant '{other}' (expected insurance or diabetes)")),
        }
    }
}

/// Kind of output the model produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    /// Continuous value
    Regression,
    /// Binary label with positive-class probability
    Classification,
}

/// Everything needed to validate and encode requests for one model
#[derive(Debug, Clone)]
pub struct ModelSpec {
    pub variant: Variant,
    pub title: &'static str,
    pub description: &'static str,
    pub task: Task,
    /// Request attributes, in validation order
    pub attributes: Vec<AttributeSpec>,
    pub schema: FeatureSchema,
}

const SEXES: &[&str] = &["male", "female"];
const SMOKER: &[&str] = &["yes", "no"];
const REGIONS: &[&str] = &["northeast", "northwest", "southeast", "southwest"];

const PREGNANCY_CEILING: Rule =
    Rule::at_most(15.0, "Number of pregnancies seems unrealistically high");
const GLUCOSE_FLOOR: Rule = Rule::at_least(40.0, "Glucose level seems unrealistically low");

impl ModelSpec {
    /// Spec for a variant
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Insurance => Self::insurance(),
            Variant::Diabetes => Self::diabetes(),
        }
    }

    /// Medical insurance cost regression
    pub fn insurance() -> Self {
        Self {
            variant: Variant::Insurance,
            title: "Insurance Cost Prediction API",
            description: "API for predicting medical insurance costs",
            task: Task::Regression,
            attributes: vec![
                AttributeSpec::integer("age", 18.0, 100.0, "Age in years"),
                AttributeSpec::categorical("sex", SEXES, "Gender (male/female)"),
                AttributeSpec::float("bmi", 10.0, 50.0, "Body Mass Index"),
                AttributeSpec::integer("children", 0.0, 10.0, "Number of children/dependents"),
                AttributeSpec::categorical("smoker", SMOKER, "Smoking status (yes/no)"),
                AttributeSpec::categorical(
                    "region",
                    REGIONS,
                    "Region (northeast/northwest/southeast/southwest)",
                ),
            ],
            schema: FeatureSchema::new(
                "insurance-v1",
                vec![
                    Feature::numeric("age"),
                    Feature::numeric("bmi"),
                    Feature::numeric("children"),
                    Feature::indicator("sex", "male"),
                    Feature::indicator("smoker", "yes"),
                    Feature::indicator("region", "northwest"),
                    Feature::indicator("region", "southeast"),
                    Feature::indicator("region", "southwest"),
                ],
                vec![("sex", "female"), ("smoker", "no"), ("region", "northeast")],
            ),
        }
    }

    /// Diabetes onset classification
    pub fn diabetes() -> Self {
        // The 15-pregnancy and 40 mg/dL glucose rules are stricter than the
        // declared ranges; both bounds are enforced.
        Self {
            variant: Variant::Diabetes,
            title: "Diabetes Prediction API",
            description: "API for predicting diabetes from diagnostic measurements",
            task: Task::Classification,
            attributes: vec![
                AttributeSpec::integer("pregnancies", 0.0, 20.0, "Number of pregnancies")
                    .with_rule(PREGNANCY_CEILING),
                AttributeSpec::float("glucose", 0.0, 300.0, "Plasma glucose concentration (mg/dL)")
                    .with_rule(GLUCOSE_FLOOR),
                AttributeSpec::float(
                    "blood_pressure",
                    0.0,
                    200.0,
                    "Diastolic blood pressure (mm Hg)",
                ),
                AttributeSpec::float(
                    "skin_thickness",
                    0.0,
                    100.0,
                    "Triceps skin fold thickness (mm)",
                ),
                AttributeSpec::float("insulin", 0.0, 1000.0, "2-hour serum insulin (mu U/ml)"),
                AttributeSpec::float("bmi", 0.0, 70.0, "Body Mass Index"),
                AttributeSpec::float("diabetes_pedigree", 0.0, 3.0, "Diabetes pedigree function"),
                AttributeSpec::integer("age", 0.0, 120.0, "Age in years"),
            ],
            schema: FeatureSchema::new(
                "diabetes-v1",
                vec![
                    Feature::numeric("pregnancies"),
                    Feature::numeric("glucose"),
                    Feature::numeric("blood_pressure"),
                    Feature::numeric("skin_thickness"),
                    Feature::numeric("insulin"),
                    Feature::numeric("bmi"),
                    Feature::numeric("diabetes_pedigree"),
                    Feature::numeric("age"),
                ],
                vec![],
            ),
        }
    }

    /// Verify the schema is coherent with the attributes
    pub fn check(&self) -> Result<(), SchemaError> {
        self.schema.check_attributes(&self.attributes)
    }

    pub fn validator(&self) -> Validator {
        Validator::new(self.attributes.clone())
    }

    pub fn encoder(&self) -> FeatureEncoder {
        FeatureEncoder::new(self.schema.clone())
    }
}
