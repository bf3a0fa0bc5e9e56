//! Service configuration
//!
//! Defaults, then an optional config file (`PREDICT_CONFIG`), then
//! `PREDICT_*` environment variables.

use feature_engine::Variant;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Service settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Which model to serve
    pub variant: Variant,
    /// Listen address
    pub bind: String,
    /// Directory holding `<variant>/scaler.json` and `<variant>/model.json`
    pub artifact_dir: PathBuf,
    /// Explicit scaler artifact path
    #[serde(default)]
    pub scaler_file: Option<PathBuf>,
    /// Explicit predictor artifact path
    #[serde(default)]
    pub model_file: Option<PathBuf>,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit JSON log lines
    pub log_json: bool,
    /// Install the Prometheus recorder and serve `/metrics`
    pub metrics: bool,
}

impl Settings {
    /// Load from `PREDICT_CONFIG` (if set) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let file = std::env::var_os("PREDICT_CONFIG").map(PathBuf::from);
        Self::build(file.as_deref(), true)
    }

    /// Load from a config file over the defaults, ignoring the environment
    pub fn from_file(path: &Path) -> Result<Self, config::ConfigError> {
        Self::build(Some(path), false)
    }

    fn build(file: Option<&Path>, with_env: bool) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("variant", "insurance")?
            .set_default("bind", "0.0.0.0:8001")?
            .set_default("artifact_dir", "artifacts")?
            .set_default("log_level", "info")?
            .set_default("log_json", false)?
            .set_default("metrics", true)?;

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path));
        }
        if with_env {
            builder =
                builder.add_source(config::Environment::with_prefix("PREDICT").try_parsing(true));
        }

        builder.build()?.try_deserialize()
    }

    /// Scaler artifact location
    pub fn scaler_path(&self) -> PathBuf {
        self.scaler_file
            .clone()
            .unwrap_or_else(|| self.variant_dir().join("scaler.json"))
    }

    /// Predictor artifact location
    pub fn model_path(&self) -> PathBuf {
        self.model_file
            .clone()
            .unwrap_or_else(|| self.variant_dir().join("model.json"))
    }

    fn variant_dir(&self) -> PathBuf {
        self.artifact_dir.join(self.variant.as_str())
    }
}
