//! Dataset Module - Reference data for training and drift comparison
//!
//! # Architecture
//! - `iris.rs`: embedded Iris measurements
//! - `split.rs`: stratified train/test split over `aprender`
//!
//! The reference dataset is built once and shared read-only (`shared()`).

pub mod iris;
pub mod split;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use aprender::primitives::Matrix;
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use once_cell::sync::Lazy;

use crate::logic::features::{CLASS_COUNT, FEATURE_COUNT};

pub use split::{train_test_split, TrainTestSplit};

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Malformed or unusable dataset
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetError(pub String);

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DatasetError: {}", self.0)
    }
}

impl std::error::Error for DatasetError {}

/// Row-major `f32` copy of `rows`, the input type of the `aprender` estimators
pub fn to_matrix(rows: ArrayView2<'_, f64>) -> Result<Matrix<f32>, DatasetError> {
    let (n_rows, n_cols) = rows.dim();
    Matrix::from_vec(n_rows, n_cols, rows.iter().map(|&v| v as f32).collect())
        .map_err(|e| DatasetError(e.to_string()))
}

// ============================================================================
// STATE
// ============================================================================

/// Process-wide reference dataset, built on first use
static REFERENCE: Lazy<Arc<ReferenceDataset>> = Lazy::new(|| Arc::new(ReferenceDataset::iris()));

/// Shared handle to the reference dataset
pub fn shared() -> Arc<ReferenceDataset> {
    Arc::clone(&REFERENCE)
}

// ============================================================================
// REFERENCE DATASET
// ============================================================================

/// Feature matrix (rows x `FEATURE_COUNT`) plus class labels
#[derive(Debug, Clone)]
pub struct ReferenceDataset {
    features: Array2<f64>,
    labels: Vec<usize>,
}

impl ReferenceDataset {
    /// Validate and wrap a feature matrix with its labels
    pub fn new(features: Array2<f64>, labels: Vec<usize>) -> Result<Self, DatasetError> {
        let (rows, cols) = features.dim();

        if rows == 0 {
            return Err(DatasetError("dataset is empty".to_string()));
        }
        if cols != FEATURE_COUNT {
            return Err(DatasetError(format!(
                "expected {} feature columns, got {}",
                FEATURE_COUNT, cols
            )));
        }
        if labels.len() != rows {
            return Err(DatasetError(format!(
                "{} rows but {} labels",
                rows,
                labels.len()
            )));
        }
        if let Some(&bad) = labels.iter().find(|&&l| l >= CLASS_COUNT) {
            return Err(DatasetError(format!(
                "label {} outside 0..{}",
                bad, CLASS_COUNT
            )));
        }
        if features.iter().any(|v| !v.is_finite()) {
            return Err(DatasetError("dataset contains non-finite values".to_string()));
        }

        Ok(Self { features, labels })
    }

    /// The embedded Iris dataset
    pub fn iris() -> Self {
        let features = Array2::from_shape_fn((iris::IRIS_SAMPLES, FEATURE_COUNT), |(i, j)| {
            iris::IRIS_FEATURES[i][j]
        });
        let labels = (0..iris::IRIS_SAMPLES).map(iris::iris_label).collect();
        Self { features, labels }
    }

    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn column(&self, index: usize) -> ArrayView1<'_, f64> {
        self.features.column(index)
    }

    /// Column `index` as an owned vector (input for drift statistics)
    pub fn column_values(&self, index: usize) -> Vec<f64> {
        self.features.column(index).to_vec()
    }

    pub fn column_means(&self) -> [f64; FEATURE_COUNT] {
        let mut means = [0.0; FEATURE_COUNT];
        if let Some(m) = self.features.mean_axis(Axis(0)) {
            for (slot, value) in means.iter_mut().zip(m.iter()) {
                *slot = *value;
            }
        }
        means
    }

    /// (min, max) of column `index`
    pub fn column_range(&self, index: usize) -> (f64, f64) {
        self.features
            .column(index)
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }

    pub fn class_counts(&self) -> [usize; CLASS_COUNT] {
        let mut counts = [0usize; CLASS_COUNT];
        for &label in &self.labels {
            counts[label] += 1;
        }
        counts
    }
}
