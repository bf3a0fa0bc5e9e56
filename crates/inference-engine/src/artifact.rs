//! Serialized Scaler/Predictor Artifacts
//!
//! Both artifacts are JSON documents stamped with the schema version,
//! fingerprint and ordered feature names they were fitted against. Loading
//! rejects any artifact whose stamp differs from the compiled-in schema.

use crate::model::{LinearModel, LogisticModel, Predictor};
use crate::onnx::OnnxModel;
use crate::scaler::Scaler;
use crate::InferenceError;
use feature_engine::{FeatureSchema, Task};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Schema stamp carried by every artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaStamp {
    pub schema_version: String,
    pub schema_fingerprint: String,
    pub feature_names: Vec<String>,
}

impl SchemaStamp {
    pub fn for_schema(schema: &FeatureSchema) -> Self {
        Self {
            schema_version: schema.version().to_string(),
            schema_fingerprint: schema.fingerprint(),
            feature_names: schema.feature_names(),
        }
    }

    /// Reject artifacts fitted against a different schema
    pub fn verify(&self, schema: &FeatureSchema, path: &Path) -> Result<(), InferenceError> {
        let expected = schema.fingerprint();
        if self.schema_fingerprint != expected {
            return Err(InferenceError::SchemaMismatch {
                path: path.display().to_string(),
                expected: format!("{} ({})", schema.version(), expected),
                found: format!("{} ({})", self.schema_version, self.schema_fingerprint),
            });
        }
        if self.feature_names != schema.feature_names() {
            return Err(InferenceError::SchemaMismatch {
                path: path.display().to_string(),
                expected: schema.feature_names().join(","),
                found: self.feature_names.join(","),
            });
        }
        Ok(())
    }
}

/// Scaler artifact file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerArtifact {
    #[serde(flatten)]
    pub stamp: SchemaStamp,
    pub scaler: Scaler,
}

/// Predictor parameters as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelParams {
    Linear {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    Logistic {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    /// ONNX graph, path relative to the artifact file
    Onnx { path: PathBuf },
}

/// Predictor artifact file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorArtifact {
    #[serde(flatten)]
    pub stamp: SchemaStamp,
    pub model: ModelParams,
}

impl ScalerArtifact {
    pub fn new(schema: &FeatureSchema, scaler: Scaler) -> Self {
        Self {
            stamp: SchemaStamp::for_schema(schema),
            scaler,
        }
    }

    /// Load and verify a scaler artifact
    pub fn load(path: &Path, schema: &FeatureSchema) -> Result<Scaler, InferenceError> {
        let artifact: ScalerArtifact = read_json(path)?;
        artifact.stamp.verify(schema, path)?;
        artifact.scaler.check().map_err(|reason| load_error(path, reason))?;
        if let Some(n) = artifact.scaler.n_features() {
            if n != schema.len() {
                return Err(load_error(
                    path,
                    format!("scaler fitted on {n} features, schema has {}", schema.len()),
                ));
            }
        }
        info!("Loaded scaler from {}", path.display());
        Ok(artifact.scaler)
    }

    pub fn save(&self, path: &Path) -> Result<(), InferenceError> {
        write_json(path, self)
    }
}

impl PredictorArtifact {
    pub fn new(schema: &FeatureSchema, model: ModelParams) -> Self {
        Self {
            stamp: SchemaStamp::for_schema(schema),
            model,
        }
    }

    /// Load and verify a predictor artifact for the given task
    pub fn load(
        path: &Path,
        schema: &FeatureSchema,
        task: Task,
    ) -> Result<Box<dyn Predictor>, InferenceError> {
        let artifact: PredictorArtifact = read_json(path)?;
        artifact.stamp.verify(schema, path)?;

        let predictor: Box<dyn Predictor> = match (artifact.model, task) {
            (
                ModelParams::Linear {
                    coefficients,
                    intercept,
                },
                Task::Regression,
            ) => Box::new(LinearModel {
                coefficients,
                intercept,
            }),
            (
                ModelParams::Logistic {
                    coefficients,
                    intercept,
                },
                Task::Classification,
            ) => Box::new(LogisticModel::new(coefficients, intercept)),
            (ModelParams::Onnx { path: graph }, task) => {
                let graph = path.parent().unwrap_or_else(|| Path::new(".")).join(graph);
                Box::new(OnnxModel::load(&graph, schema.len(), task)?)
            }
            (params, task) => {
                return Err(load_error(
                    path,
                    format!("{} model cannot serve a {task:?} task", params_kind(&params)),
                ));
            }
        };

        if predictor.n_features() != schema.len() {
            return Err(load_error(
                path,
                format!(
                    "model fitted on {} features, schema has {}",
                    predictor.n_features(),
                    schema.len()
                ),
            ));
        }

        info!("Loaded {} predictor from {}", predictor.kind(), path.display());
        Ok(predictor)
    }

    pub fn save(&self, path: &Path) -> Result<(), InferenceError> {
        write_json(path, self)
    }
}

fn params_kind(params: &ModelParams) -> &'static str {
    match params {
        ModelParams::Linear { .. } => "linear",
        ModelParams::Logistic { .. } => "logistic",
        ModelParams::Onnx { .. } => "onnx",
    }
}

fn load_error(path: &Path, reason: impl Into<String>) -> InferenceError {
    InferenceError::ArtifactLoad {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, InferenceError> {
    let text = std::fs::read_to_string(path).map_err(|e| load_error(path, e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| load_error(path, e.to_string()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), InferenceError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| load_error(path, e.to_string()))?;
    std::fs::write(path, text).map_err(|e| load_error(path, e.to_string()))
}
