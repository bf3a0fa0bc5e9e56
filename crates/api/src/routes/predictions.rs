//! Prediction Routes

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use data_validator::ValidationError;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::error::ApiError;
use crate::formatter::PredictionResponse;
use crate::AppState;

/// Run one request through validate → encode → scale/predict → format
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let start = Instant::now();
    let variant = state.spec.variant.as_str();

    let result = payload
        .map_err(|rejection| {
            ApiError::from(ValidationError::InvalidFormat(rejection.body_text()))
        })
        .and_then(|Json(body)| state.predict(&body));

    match &result {
        Ok(_) => {
            metrics::counter!("predictions_total", "variant" => variant).increment(1);
            metrics::histogram!("prediction_latency_seconds", "variant" => variant)
                .record(start.elapsed().as_secs_f64());
            debug!("Served {} prediction in {:?}", variant, start.elapsed());
        }
        Err(err) => {
            metrics::counter!(
                "prediction_errors_total",
                "variant" => variant,
                "kind" => err.kind()
            )
            .increment(1);
        }
    }

    result.map(Json)
}

/// Static welcome message
pub async fn root(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": format!(
            "Welcome to the {}. Go to /docs for the Swagger UI.",
            state.spec.title
        )
    }))
}
