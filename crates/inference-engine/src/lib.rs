//! Model Inference Engine
//!
//! Loads the fitted scaler and predictor artifacts for a model, verifies
//! their schema stamp, and runs scale + predict on encoded feature vectors.

mod artifact;
mod engine;
mod model;
mod onnx;
mod scaler;

pub use artifact::{ModelParams, PredictorArtifact, ScalerArtifact, SchemaStamp};
pub use engine::{InferenceEngine, InferenceResult};
pub use model::{LinearModel, LogisticModel, Predictor, RawPrediction};
pub use onnx::OnnxModel;
pub use scaler::Scaler;

use thiserror::Error;

/// Errors during artifact loading and inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Failed to load artifact {path}: {reason}")]
    ArtifactLoad { path: String, reason: String },
    #[error("Artifact {path} was fitted for schema {found}, expected {expected}")]
    SchemaMismatch {
        path: String,
        expected: String,
        found: String,
    },
    #[error("Invalid input shape: expected {expected} features, got {actual}")]
    InvalidInputShape { expected: usize, actual: usize },
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
}
