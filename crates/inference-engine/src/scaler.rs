//! Fitted Feature Scaler

use crate::InferenceError;
use feature_engine::FeatureVector;
use serde::{Deserialize, Serialize};

/// Scaling method and its fitted parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    /// Z-score: `(x - mean) / scale`
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// Min-max to [0, 1]: `(x - min) / (max - min)`
    MinMax { min: Vec<f64>, max: Vec<f64> },
    /// No scaling
    Identity,
}

impl Scaler {
    /// Number of features the scaler was fitted on, if fixed
    pub fn n_features(&self) -> Option<usize> {
        match self {
            Scaler::Standard { mean, .. } => Some(mean.len()),
            Scaler::MinMax { min, .. } => Some(min.len()),
            Scaler::Identity => None,
        }
    }

    /// Check that parameter vectors agree with each other and are finite
    pub fn check(&self) -> Result<(), String> {
        let (a, b) = match self {
            Scaler::Standard { mean, scale } => (mean, scale),
            Scaler::MinMax { min, max } => (min, max),
            Scaler::Identity => return Ok(()),
        };
        if a.len() != b.len() {
            return Err(format!(
                "parameter lengths differ: {} vs {}",
                a.len(),
                b.len()
            ));
        }
        if a.iter().chain(b).any(|v| !v.is_finite()) {
            return Err("non-finite scaler parameter".to_string());
        }
        Ok(())
    }

    /// Apply the transform
    ///
    /// Zero-width columns (zero scale or `min == max`) are only shifted.
    pub fn transform(&self, features: &FeatureVector) -> Result<FeatureVector, InferenceError> {
        if let Some(expected) = self.n_features() {
            if features.len() != expected {
                return Err(InferenceError::InvalidInputShape {
                    expected,
                    actual: features.len(),
                });
            }
        }

        let values = match self {
            Scaler::Standard { mean, scale } => features
                .values
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(x, (m, s))| (x - m) / Self::nonzero(*s))
                .collect(),
            Scaler::MinMax { min, max } => features
                .values
                .iter()
                .zip(min.iter().zip(max))
                .map(|(x, (lo, hi))| (x - lo) / Self::nonzero(hi - lo))
                .collect(),
            Scaler::Identity => features.values.clone(),
        };

        Ok(FeatureVector {
            values,
            defaulted: features.defaulted.clone(),
        })
    }

    fn nonzero(width: f64) -> f64 {
        if width == 0.0 {
            1.0
        } else {
            width
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_scaling() {
        let scaler = Scaler::Standard {
            mean: vec![10.0, 0.5],
            scale: vec![2.0, 0.5],
        };
        let scaled = scaler.transform(&FeatureVector::new(vec![14.0, 0.0])).unwrap();
        assert_eq!(scaled.values, vec![2.0, -1.0]);
    }

    #[test]
    fn test_minmax_scaling() {
        let scaler = Scaler::MinMax {
            min: vec![0.0, 5.0],
            max: vec![100.0, 5.0],
        };
        let scaled = scaler.transform(&FeatureVector::new(vec![50.0, 7.0])).unwrap();
        assert!((scaled.values[0] - 0.5).abs() < 1e-12);
        // Zero-width column is shifted but not divided
        assert!((scaled.values[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_scale_passes_through() {
        let scaler = Scaler::Standard {
            mean: vec![3.0],
            scale: vec![0.0],
        };
        let scaled = scaler.transform(&FeatureVector::new(vec![4.0])).unwrap();
        assert_eq!(scaled.values, vec![1.0]);
    }

    #[test]
    fn test_shape_mismatch() {
        let scaler = Scaler::Standard {
            mean: vec![0.0; 3],
            scale: vec![1.0; 3],
        };
        let err = scaler.transform(&FeatureVector::new(vec![1.0, 2.0])).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::InvalidInputShape {
                expected: 3,
                actual: 2,
            }
        ));
    }

    #[test]
    fn test_check_rejects_ragged_parameters() {
        let scaler = Scaler::MinMax {
            min: vec![0.0, 1.0],
            max: vec![1.0],
        };
        assert!(scaler.check().is_err());
        assert!(Scaler::Identity.check().is_ok());
    }
}
