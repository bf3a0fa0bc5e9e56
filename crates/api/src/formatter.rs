//! Response formatting

use inference_engine::RawPrediction;
use serde::{Deserialize, Serialize};

/// Affirmative classification message (label 1)
pub const POSITIVE_MESSAGE: &str =
    "The model predicts that the patient is likely to have diabetes.";
/// Negative classification message (label 0)
pub const NEGATIVE_MESSAGE: &str =
    "The model predicts that the patient is unlikely to have diabetes.";

/// Regression response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostPrediction {
    pub predicted_cost: f64,
    pub message: String,
}

/// Classification response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisPrediction {
    /// 0 or 1
    pub prediction: u8,
    /// Probability of the positive class
    pub probability: f64,
    pub message: String,
}

/// Public `/predict` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionResponse {
    Cost(CostPrediction),
    Diagnosis(DiagnosisPrediction),
}

/// Turn raw model output into the public response
///
/// The message follows the predictor's label; no extra threshold is applied.
pub fn format_prediction(prediction: RawPrediction) -> PredictionResponse {
    match prediction {
        RawPrediction::Value { value } => PredictionResponse::Cost(CostPrediction {
            predicted_cost: value,
            message: format!("The estimated insurance cost is ${value:.2}"),
        }),
        RawPrediction::Class { label, probability } => {
            let message = if label == 1 {
                POSITIVE_MESSAGE
            } else {
                NEGATIVE_MESSAGE
            };
            PredictionResponse::Diagnosis(DiagnosisPrediction {
                prediction: label,
                probability,
                message: message.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_message_two_decimals() {
        let response = format_prediction(RawPrediction::Value { value: 4573.8549 });
        assert_eq!(
            response,
            PredictionResponse::Cost(CostPrediction {
                predicted_cost: 4573.8549,
                message: "The estimated insurance cost is $4573.85".to_string(),
            })
        );
    }

    fn class(label: u8, probability: f64) -> RawPrediction {
        RawPrediction::Class { label, probability }
    }

    #[test]
    fn test_message_follows_label() {
        let positive = format_prediction(class(1, 0.51));
        let negative = format_prediction(class(0, 0.49));
        match (positive, negative) {
            (PredictionResponse::Diagnosis(p), PredictionResponse::Diagnosis(n)) => {
                assert_eq!(p.message, POSITIVE_MESSAGE);
                assert_eq!(n.message, NEGATIVE_MESSAGE);
                assert_eq!(p.prediction, 1);
                assert_eq!(n.prediction, 0);
            }
            other => panic!("unexpected responses: {other:?}"),
        }
    }

    #[test]
    fn test_response_shapes() {
        let cost = format_prediction(RawPrediction::Value { value: 1.5 });
        let cost = serde_json::to_value(cost).unwrap();
        assert_eq!(cost["predicted_cost"], 1.5);
        assert!(cost.get("prediction").is_none());

        let diagnosis = serde_json::to_value(format_prediction(class(0, 0.2))).unwrap();
        assert_eq!(diagnosis["prediction"], 0);
        assert_eq!(diagnosis["probability"], 0.2);
    }
}
