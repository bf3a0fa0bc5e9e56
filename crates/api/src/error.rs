//! Request-boundary errors

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use data_validator::ValidationError;
use inference_engine::InferenceError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Errors surfaced to HTTP callers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request violated a declared constraint (422)
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Scaling or prediction failed (500)
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation",
            ApiError::Inference(_) => "inference",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            ApiError::Validation(err) => {
                warn!("Rejected request: {}", err);
                let loc = match err.field() {
                    Some(field) => json!(["body", field]),
                    None => json!(["body"]),
                };
                json!({
                    "detail": [{
                        "loc": loc,
                        "msg": err.to_string(),
                        "type": err.kind(),
                    }]
                })
            }
            ApiError::Inference(err) => {
                error!("Prediction failed: {}", err);
                json!({ "detail": err.to_string() })
            }
        };

        (self.status(), Json(body)).into_response()
    }
}
