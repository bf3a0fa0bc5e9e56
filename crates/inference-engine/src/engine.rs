//! Inference Engine Implementation

use crate::artifact::{PredictorArtifact, ScalerArtifact};
use crate::model::{Predictor, RawPrediction};
use crate::scaler::Scaler;
use crate::InferenceError;
use feature_engine::{FeatureVector, ModelSpec, Task};
use std::path::Path;
use tracing::{debug, info};

/// Result of inference operation
#[derive(Debug, Clone)]
pub struct InferenceResult {
    /// The prediction
    pub prediction: RawPrediction,
    /// Inference latency in microseconds
    pub latency_us: u64,
}

/// Loaded scaler + predictor pair for one model
///
/// Immutable once built; share it behind an `Arc`.
pub struct InferenceEngine {
    scaler: Scaler,
    predictor: Box<dyn Predictor>,
    task: Task,
    n_features: usize,
    schema_version: &'static str,
    schema_fingerprint: String,
}

impl InferenceEngine {
    /// Load both artifacts and verify them against the spec's schema
    pub fn load(
        spec: &ModelSpec,
        scaler_path: &Path,
        model_path: &Path,
    ) -> Result<Self, InferenceError> {
        info!(
            "Loading {} artifacts (schema {})",
            spec.variant,
            spec.schema.version()
        );
        let scaler = ScalerArtifact::load(scaler_path, &spec.schema)?;
        let predictor = PredictorArtifact::load(model_path, &spec.schema, spec.task)?;
        Ok(Self::new(spec, scaler, predictor))
    }

    /// Build from already-loaded parts
    pub fn new(spec: &ModelSpec, scaler: Scaler, predictor: Box<dyn Predictor>) -> Self {
        Self {
            scaler,
            predictor,
            task: spec.task,
            n_features: spec.schema.len(),
            schema_version: spec.schema.version(),
            schema_fingerprint: spec.schema.fingerprint(),
        }
    }

    /// Scale and predict one encoded vector
    pub fn predict(&self, features: &FeatureVector) -> Result<InferenceResult, InferenceError> {
        let start = std::time::Instant::now();

        if features.len() != self.n_features {
            return Err(InferenceError::InvalidInputShape {
                expected: self.n_features,
                actual: features.len(),
            });
        }

        let scaled = self.scaler.transform(features)?;
        debug!("Scaled features: {:?}", scaled.values);

        let prediction = self.predictor.predict(scaled.as_slice())?;
        self.check_output(&prediction)?;

        let latency_us = start.elapsed().as_micros() as u64;
        debug!("Inference completed in {}us", latency_us);

        Ok(InferenceResult {
            prediction,
            latency_us,
        })
    }

    fn check_output(&self, prediction: &RawPrediction) -> Result<(), InferenceError> {
        match (self.task, prediction) {
            (Task::Regression, RawPrediction::Value { value }) if value.is_finite() => Ok(()),
            (Task::Classification, RawPrediction::Class { label, probability })
                if *label <= 1 && (0.0..=1.0).contains(probability) =>
            {
                Ok(())
            }
            _ => Err(InferenceError::InferenceFailed(format!(
                "model produced invalid output {prediction:?} for a {:?} task",
                self.task
            ))),
        }
    }

    pub fn task(&self) -> Task {
        self.task
    }

    pub fn predictor_kind(&self) -> &'static str {
        self.predictor.kind()
    }

    pub fn schema_version(&self) -> &'static str {
        self.schema_version
    }

    pub fn schema_fingerprint(&self) -> &str {
        &self.schema_fingerprint
    }
}
