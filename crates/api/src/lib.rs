//! Prediction API Server
//!
//! HTTP front end for one served model: validate, encode, scale, predict and
//! format, with health, docs and metrics routes alongside.

// Large `json!` literals in the OpenAPI document
#![recursion_limit = "256"]

use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use data_validator::Validator;
use feature_engine::{FeatureEncoder, ModelSpec, Task};
use inference_engine::InferenceEngine;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub mod config;
pub mod error;
pub mod formatter;
mod routes;

pub use config::Settings;
pub use error::ApiError;
pub use formatter::{format_prediction, CostPrediction, DiagnosisPrediction, PredictionResponse};

/// Application state shared across handlers
///
/// Built once at startup and never mutated.
pub struct AppState {
    /// Served model
    pub spec: ModelSpec,
    pub validator: Validator,
    pub encoder: FeatureEncoder,
    pub engine: InferenceEngine,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Prometheus handle when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new application state around a loaded engine
    pub fn new(spec: ModelSpec, engine: InferenceEngine) -> Self {
        Self {
            validator: spec.validator(),
            encoder: spec.encoder(),
            spec,
            engine,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            metrics: None,
        }
    }

    /// Load the configured variant's artifacts
    ///
    /// Fails if the schema is incoherent or either artifact cannot be loaded
    /// or was fitted against a different schema.
    pub fn load(settings: &Settings) -> anyhow::Result<Self> {
        let spec = ModelSpec::for_variant(settings.variant);
        spec.check().with_context(|| {
            format!("Feature schema for {} is inconsistent", spec.variant)
        })?;

        let scaler_path = settings.scaler_path();
        let model_path = settings.model_path();
        let engine = InferenceEngine::load(&spec, &scaler_path, &model_path)
            .context("Model artifacts unavailable; refusing to serve")?;

        info!(
            variant = %spec.variant,
            predictor = engine.predictor_kind(),
            schema = engine.schema_version(),
            fingerprint = engine.schema_fingerprint(),
            "Model and scaler loaded successfully"
        );
        Ok(Self::new(spec, engine))
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Full pipeline for one request body
    pub fn predict(&self, body: &serde_json::Value) -> Result<PredictionResponse, ApiError> {
        let input = self.validator.validate_json(body)?;
        let features = self.encoder.encode(&input);
        if !features.is_complete() {
            warn!("Encoded vector has defaulted features: {:?}", features.defaulted);
        }
        let result = self.engine.predict(&features)?;
        debug!("Raw prediction {:?} in {}us", result.prediction, result.latency_us);
        Ok(format_prediction(result.prediction))
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub model: ModelStatus,
}

/// Loaded model details
#[derive(Debug, Serialize)]
pub struct ModelStatus {
    pub variant: String,
    pub task: Task,
    pub predictor: String,
    pub schema_version: String,
    pub schema_fingerprint: String,
    pub n_features: usize,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::predictions::root))
        .route("/predict", post(routes::predictions::predict))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/openapi.json", get(routes::docs::openapi_json))
        .route("/docs", get(routes::docs::swagger_ui))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        model: ModelStatus {
            variant: state.spec.variant.to_string(),
            task: state.engine.task(),
            predictor: state.engine.predictor_kind().to_string(),
            schema_version: state.engine.schema_version().to_string(),
            schema_fingerprint: state.engine.schema_fingerprint().to_string(),
            n_features: state.spec.schema.len(),
        },
    };

    Json(response)
}

/// Prometheus text exposition
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics disabled".to_string()),
    }
}

/// Initialize logging
///
/// `RUST_LOG` wins over `level` when set.
pub fn init_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    let result = if json {
        registry.with(fmt::layer().json().with_target(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    if let Err(e) = result {
        eprintln!("Failed to set tracing subscriber: {e}");
    }
}

/// Run the server until Ctrl-C
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let mut state = AppState::load(&settings)?;

    if settings.metrics {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        state = state.with_metrics(handle);
    }

    let app = create_router(Arc::new(state));

    info!("Starting API server on {}", settings.bind);

    let listener = tokio::net::TcpListener::bind(&settings.bind)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
