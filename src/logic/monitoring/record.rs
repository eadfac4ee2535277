//! Prediction Record - one observed inference

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::features::{FeatureVector, FEATURE_COUNT};

/// Immutable once appended to the buffer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub timestamp: DateTime<Utc>,
    pub features: [f64; FEATURE_COUNT],
    pub prediction: usize,
    pub max_probability: f64,
    pub latency_ms: f64,
}

impl PredictionRecord {
    pub fn new(features: &FeatureVector, prediction: usize, probabilities: &[f64], latency_ms: f64) -> Self {
        Self {
            timestamp: Utc::now(),
            features: *features.as_array(),
            prediction,
            max_probability: probabilities.iter().copied().fold(0.0, f64::max),
            latency_ms,
        }
    }
}
