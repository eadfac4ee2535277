//! Random Forest Classifier
//!
//! Fitting and voting are `aprender::tree::RandomForestClassifier` (bootstrap
//! bagging, Gini trees, seeded by `random_state`). This wrapper keeps the
//! hyper-parameters next to the fitted forest and hands the service `f64`
//! probability rows that sum to 1.

use aprender::primitives::Matrix;
use aprender::tree::RandomForestClassifier;
use serde::{Deserialize, Serialize};

use super::error::ModelError;

// ============================================================================
// CONSTANTS
// ============================================================================

pub const DEFAULT_N_ESTIMATORS: usize = 100;
pub const DEFAULT_MAX_DEPTH: usize = 5;

// ============================================================================
// PARAMETERS
// ============================================================================

/// Forest hyper-parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: DEFAULT_N_ESTIMATORS,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

// ============================================================================
// FOREST
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    #[serde(default)]
    params: ForestParams,
    classifier: RandomForestClassifier,
}

impl RandomForest {
    /// Fit on `x` (rows x features) and labels `y`
    pub fn fit(
        x: &Matrix<f32>,
        y: &[usize],
        params: ForestParams,
        random_state: u64,
    ) -> Result<Self, ModelError> {
        let (n_samples, n_features) = x.shape();

        if n_samples == 0 || n_features == 0 {
            return Err(ModelError::Training("cannot fit on an empty matrix".to_string()));
        }
        if y.len() != n_samples {
            return Err(ModelError::Training(format!(
                "{} rows but {} labels",
                n_samples,
                y.len()
            )));
        }
        if params.n_estimators == 0 || params.max_depth == 0 {
            return Err(ModelError::Training(
                "n_estimators and max_depth must be positive".to_string(),
            ));
        }

        let mut classifier = RandomForestClassifier::new(params.n_estimators)
            .with_max_depth(params.max_depth)
            .with_random_state(random_state);
        classifier
            .fit(x, y)
            .map_err(|e| ModelError::Training(e.to_string()))?;

        log::debug!(
            "Fitted {} trees (max depth {}) on {} samples x {} features",
            params.n_estimators,
            params.max_depth,
            n_samples,
            n_features
        );

        Ok(Self { params, classifier })
    }

    pub fn params(&self) -> ForestParams {
        self.params
    }

    pub fn n_trees(&self) -> usize {
        self.params.n_estimators
    }

    /// Width of the training matrix, `None` for an unfitted forest
    pub fn n_features(&self) -> Option<usize> {
        self.classifier.feature_importances().map(|w| w.len())
    }

    /// Length of every probability row
    pub fn n_classes(&self) -> usize {
        let width = self.n_features().unwrap_or(0);
        Matrix::from_vec(1, width, vec![0.0; width])
            .map(|zeros| self.classifier.predict_proba(&zeros).n_cols())
            .unwrap_or(0)
    }

    /// Per-class probabilities, one row per input row
    pub fn predict_proba(&self, x: &Matrix<f32>) -> Vec<Vec<f64>> {
        let votes = self.classifier.predict_proba(x);
        let (rows, cols) = votes.shape();

        (0..rows)
            .map(|r| {
                let mut proba: Vec<f64> = (0..cols).map(|c| f64::from(votes.get(r, c))).collect();
                // f32 vote shares, re-normalised after widening
                let total: f64 = proba.iter().sum();
                if total > 0.0 {
                    proba.iter_mut().for_each(|p| *p /= total);
                }
                proba
            })
            .collect()
    }

    /// Argmax class per input row (lowest index wins ties)
    pub fn predict(&self, x: &Matrix<f32>) -> Vec<usize> {
        self.predict_proba(x).iter().map(|p| argmax(p)).collect()
    }
}

pub fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(bi, bv), (i, &v)| if v > bv { (i, v) } else { (bi, bv) })
        .0
}
