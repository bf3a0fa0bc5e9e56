//! Fitted Predictors

use crate::InferenceError;
use serde::{Deserialize, Serialize};

/// Raw model output before formatting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawPrediction {
    /// Regression output
    Value { value: f64 },
    /// Binary classification output
    Class {
        /// Predicted label (1 is the positive class)
        label: u8,
        /// Probability of the positive class
        probability: f64,
    },
}

/// A fitted model over scaled feature vectors
///
/// Implementations are immutable after loading and shared across requests.
pub trait Predictor: Send + Sync {
    /// Predict from one scaled vector
    fn predict(&self, features: &[f64]) -> Result<RawPrediction, InferenceError>;

    /// Number of input features
    fn n_features(&self) -> usize;

    /// Short model family name for logs
    fn kind(&self) -> &'static str;
}

/// Ordinary least-squares style linear model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearModel {
    /// `w . x + b`
    pub fn decision(&self, features: &[f64]) -> Result<f64, InferenceError> {
        if features.len() != self.coefficients.len() {
            return Err(InferenceError::InvalidInputShape {
                expected: self.coefficients.len(),
                actual: features.len(),
            });
        }
        Ok(self
            .coefficients
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept)
    }
}

impl Predictor for LinearModel {
    fn predict(&self, features: &[f64]) -> Result<RawPrediction, InferenceError> {
        Ok(RawPrediction::Value {
            value: self.decision(features)?,
        })
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn kind(&self) -> &'static str {
        "linear"
    }
}

/// Binary logistic regression
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticModel {
    pub linear: LinearModel,
}

impl LogisticModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            linear: LinearModel {
                coefficients,
                intercept,
            },
        }
    }

    /// Positive-class probability
    pub fn probability(&self, features: &[f64]) -> Result<f64, InferenceError> {
        let z = self.linear.decision(features)?;
        Ok(sigmoid(z))
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Predictor for LogisticModel {
    /// Label 1 only for a strictly positive decision value
    fn predict(&self, features: &[f64]) -> Result<RawPrediction, InferenceError> {
        let z = self.linear.decision(features)?;
        Ok(RawPrediction::Class {
            label: u8::from(z > 0.0),
            probability: sigmoid(z),
        })
    }

    fn n_features(&self) -> usize {
        self.linear.coefficients.len()
    }

    fn kind(&self) -> &'static str {
        "logistic"
    }
}
