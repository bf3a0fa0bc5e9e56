//! ONNX predictor using tract
//!
//! Regression graphs return the value as their first output. Classifier
//! graphs return the label first and a `[1, 2]` probability tensor second
//! (exported without a ZipMap node).

use crate::model::{Predictor, RawPrediction};
use crate::InferenceError;
use feature_engine::Task;
use std::path::Path;
use tract_onnx::prelude::*;
use tracing::{debug, info};

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// ONNX graph run through tract
pub struct OnnxModel {
    plan: TractModel,
    n_features: usize,
    task: Task,
}

impl OnnxModel {
    /// Load and optimize an ONNX graph with a fixed `[1, n_features]` input
    pub fn load(path: &Path, n_features: usize, task: Task) -> Result<Self, InferenceError> {
        info!("Loading ONNX model from {}", path.display());
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| Self::optimize(model, n_features))
            .map_err(|e| InferenceError::ArtifactLoad {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            plan,
            n_features,
            task,
        })
    }

    fn optimize(model: InferenceModel, n_features: usize) -> TractResult<TractModel> {
        model
            .with_input_fact(0, f32::fact([1, n_features]).into())?
            .into_optimized()?
            .into_runnable()
    }

    fn run(&self, features: &[f64]) -> TractResult<TVec<TValue>> {
        let data: Vec<f32> = features.iter().map(|v| *v as f32).collect();
        let input: Tensor =
            tract_ndarray::Array2::from_shape_vec((1, self.n_features), data)?.into();
        self.plan.run(tvec!(input.into()))
    }

    fn decode(&self, outputs: &[TValue]) -> TractResult<RawPrediction> {
        let first = outputs.first().ok_or_else(|| anyhow::anyhow!("model produced no outputs"))?;
        match self.task {
            Task::Regression => {
                let value = first
                    .to_array_view::<f32>()?
                    .iter()
                    .next()
                    .copied()
                    .ok_or_else(|| anyhow::anyhow!("empty regression output"))?;
                Ok(RawPrediction::Value {
                    value: f64::from(value),
                })
            }
            Task::Classification => {
                let label = first
                    .cast_to::<i64>()?
                    .to_array_view::<i64>()?
                    .iter()
                    .next()
                    .copied()
                    .ok_or_else(|| anyhow::anyhow!("empty label output"))?;
                let probabilities = outputs
                    .get(1)
                    .ok_or_else(|| anyhow::anyhow!("classifier has no probability output"))?
                    .to_array_view::<f32>()?
                    .iter()
                    .copied()
                    .collect::<Vec<f32>>();
                let positive = probabilities
                    .get(1)
                    .copied()
                    .ok_or_else(|| anyhow::anyhow!("expected two class probabilities"))?;
                Ok(RawPrediction::Class {
                    label: u8::from(label == 1),
                    probability: f64::from(positive),
                })
            }
        }
    }
}

impl Predictor for OnnxModel {
    fn predict(&self, features: &[f64]) -> Result<RawPrediction, InferenceError> {
        if features.len() != self.n_features {
            return Err(InferenceError::InvalidInputShape {
                expected: self.n_features,
                actual: features.len(),
            });
        }

        let outputs = self
            .run(features)
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;
        debug!("ONNX run produced {} outputs", outputs.len());
        self.decode(&outputs)
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn kind(&self) -> &'static str {
        "onnx"
    }
}
