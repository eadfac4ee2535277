//! Model Lifecycle Manager
//!
//! Owns the single live `ModelArtifact`. Readers clone an `Arc` under a short
//! read lock and run inference without holding it; writers (`train`, `load`)
//! build the replacement completely before publishing it with one swap, so
//! `predict` sees either the old artifact or the new one, never a mix.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Local, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::logic::config::ServiceConfig;
use crate::logic::dataset::{self, train_test_split, ReferenceDataset};
use crate::logic::features::{layout, FeatureVector, CLASS_COUNT};
use super::artifact::ModelArtifact;
use super::error::ModelError;
use super::forest::{argmax, ForestParams, RandomForest};
use super::metrics::TrainingMetrics;
use super::storage;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Lifecycle of the live slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelState {
    Uninitialized,
    Trained,
    Loaded,
    Persisted,
}

/// Prediction output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub class_label: usize,
    pub class_name: String,
    /// One entry per class, ordered as the artifact's `target_names`
    pub probabilities: Vec<f64>,
    pub model_version: String,
}

impl Prediction {
    pub fn max_probability(&self) -> f64 {
        self.probabilities.iter().copied().fold(0.0, f64::max)
    }
}

/// Model metadata for observability
#[derive(Debug, Clone, Serialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub version: String,
    pub state: ModelState,
    pub feature_names: Vec<String>,
    pub target_names: Vec<String>,
    pub n_trees: usize,
    pub metrics: Option<TrainingMetrics>,
    pub activated_at: Option<DateTime<Utc>>,
}

/// Engine status (health + serving counters)
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub model_loaded: bool,
    pub state: ModelState,
    pub version: Option<String>,
    pub inference_count: u64,
    pub failed_count: u64,
    pub avg_latency_ms: f64,
}

struct ModelSlot {
    artifact: Option<Arc<ModelArtifact>>,
    state: ModelState,
    activated_at: Option<DateTime<Utc>>,
}

// ============================================================================
// SERVICE
// ============================================================================

pub struct ModelService {
    model_path: PathBuf,
    params: ForestParams,
    slot: RwLock<ModelSlot>,
    inference_count: AtomicU64,
    failed_count: AtomicU64,
    latency_sum_us: AtomicU64,
}

impl ModelService {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            params: ForestParams::default(),
            slot: RwLock::new(ModelSlot {
                artifact: None,
                state: ModelState::Uninitialized,
                activated_at: None,
            }),
            inference_count: AtomicU64::new(0),
            failed_count: AtomicU64::new(0),
            latency_sum_us: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(&config.model_path)
    }

    pub fn with_forest_params(mut self, params: ForestParams) -> Self {
        self.params = params;
        self
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Train on the shared reference dataset and publish the result
    pub fn train(&self, test_size: f64, random_state: u64) -> Result<(), ModelError> {
        self.train_with(&dataset::shared(), test_size, random_state)
    }

    /// Train on `data`. On failure the previously live artifact stays in place.
    pub fn train_with(
        &self,
        data: &ReferenceDataset,
        test_size: f64,
        random_state: u64,
    ) -> Result<(), ModelError> {
        log::info!(
            "Training model on {} samples (test_size={}, random_state={})...",
            data.n_samples(),
            test_size,
            random_state
        );

        let split = train_test_split(data.features(), data.labels(), test_size, random_state)?;
        let model = RandomForest::fit(&split.x_train, &split.y_train, self.params, random_state)?;

        // Probability rows must line up with TARGET_NAMES
        if model.n_classes() != CLASS_COUNT {
            return Err(ModelError::Training(format!(
                "training data covers {} of {} classes",
                model.n_classes(),
                CLASS_COUNT
            )));
        }

        let target_names = layout::target_names();
        let y_pred = model.predict(&split.x_test);
        let metrics = TrainingMetrics::evaluate(&split.y_test, &y_pred, &target_names, split.y_train.len());

        log::info!(
            "Training complete. Accuracy: {:.4} ({} train / {} test)",
            metrics.accuracy,
            metrics.train_samples,
            metrics.test_samples
        );
        for class in &metrics.per_class {
            log::debug!(
                "  {:<12} precision={:.3} recall={:.3} f1={:.3} support={}",
                class.label, class.precision, class.recall, class.f1, class.support
            );
        }

        let artifact = ModelArtifact {
            model,
            version: Local::now().format("%Y%m%d_%H%M%S").to_string(),
            feature_names: layout::feature_names(),
            target_names,
            metrics: Some(metrics),
        };

        self.publish(artifact, ModelState::Trained);
        Ok(())
    }

    /// Persist the live artifact to `model_path`
    pub fn save(&self) -> Result<(), ModelError> {
        let artifact = self.artifact().ok_or(ModelError::NotTrained)?;
        let checksum = storage::save_artifact(&artifact, &self.model_path)?;

        log::info!(
            "Model saved to {} (version: {}, sha256: {})",
            self.model_path.display(),
            artifact.version,
            checksum
        );

        let mut slot = self.slot.write();
        let unchanged = slot.artifact.as_ref().map_or(false, |live| Arc::ptr_eq(live, &artifact));
        if unchanged && slot.state == ModelState::Trained {
            slot.state = ModelState::Persisted;
        }
        Ok(())
    }

    /// Replace the live artifact with the one stored at `model_path`
    pub fn load(&self) -> Result<(), ModelError> {
        let (artifact, checksum) = storage::load_artifact(&self.model_path)?;

        log::info!(
            "Model loaded from {}, version: {} (sha256: {})",
            self.model_path.display(),
            artifact.version,
            checksum
        );

        self.publish(artifact, ModelState::Loaded);
        Ok(())
    }

    /// Startup policy: load, or on any failure train + save.
    pub fn bootstrap(&self, test_size: f64, random_state: u64) -> Result<ModelState, ModelError> {
        match self.load() {
            Ok(()) => Ok(ModelState::Loaded),
            Err(e) => {
                log::warn!("Model load failed ({}). Training a new model...", e);
                self.train(test_size, random_state)?;
                self.save()?;
                Ok(self.state())
            }
        }
    }

    fn publish(&self, artifact: ModelArtifact, state: ModelState) {
        let artifact = Arc::new(artifact);
        let mut slot = self.slot.write();
        slot.artifact = Some(artifact);
        slot.state = state;
        slot.activated_at = Some(Utc::now());
    }

    // ------------------------------------------------------------------------
    // Inference
    // ------------------------------------------------------------------------

    /// Validate raw values, then predict
    pub fn predict(&self, features: &[f64]) -> Result<Prediction, ModelError> {
        let start = Instant::now();
        let result = FeatureVector::try_from(features)
            .map_err(ModelError::from)
            .and_then(|vector| self.infer(&vector));
        self.track(start, &result);
        result
    }

    pub fn predict_vector(&self, features: &FeatureVector) -> Result<Prediction, ModelError> {
        let start = Instant::now();
        let result = self.infer(features);
        self.track(start, &result);
        result
    }

    fn infer(&self, features: &FeatureVector) -> Result<Prediction, ModelError> {
        let artifact = self.artifact().ok_or(ModelError::NotLoaded)?;

        let probabilities = artifact
            .model
            .predict_proba(&features.to_matrix())
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::InvalidArtifact("model produced no output".to_string()))?;

        let class_label = argmax(&probabilities);
        let class_name = artifact.target_names.get(class_label).cloned().ok_or_else(|| {
            ModelError::InvalidArtifact(format!(
                "{} probabilities for {} target names",
                probabilities.len(),
                artifact.target_names.len()
            ))
        })?;

        Ok(Prediction {
            class_label,
            class_name,
            probabilities,
            model_version: artifact.version.clone(),
        })
    }

    fn track(&self, start: Instant, result: &Result<Prediction, ModelError>) {
        match result {
            Ok(_) => {
                self.inference_count.fetch_add(1, Ordering::Relaxed);
                self.latency_sum_us
                    .fetch_add(start.elapsed().as_micros() as u64, Ordering::Relaxed);
            }
            Err(_) => {
                self.failed_count.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Snapshot of the live artifact
    pub fn artifact(&self) -> Option<Arc<ModelArtifact>> {
        self.slot.read().artifact.clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.read().artifact.is_some()
    }

    pub fn state(&self) -> ModelState {
        self.slot.read().state
    }

    pub fn version(&self) -> Option<String> {
        self.slot.read().artifact.as_ref().map(|a| a.version.clone())
    }

    pub fn metadata(&self) -> Option<ModelMetadata> {
        let slot = self.slot.read();
        let artifact = slot.artifact.as_ref()?;

        Some(ModelMetadata {
            model_path: self.model_path.display().to_string(),
            version: artifact.version.clone(),
            state: slot.state,
            feature_names: artifact.feature_names.clone(),
            target_names: artifact.target_names.clone(),
            n_trees: artifact.model.n_trees(),
            metrics: artifact.metrics.clone(),
            activated_at: slot.activated_at,
        })
    }

    pub fn status(&self) -> EngineStatus {
        let (model_loaded, state, version) = {
            let slot = self.slot.read();
            (
                slot.artifact.is_some(),
                slot.state,
                slot.artifact.as_ref().map(|a| a.version.clone()),
            )
        };

        let count = self.inference_count.load(Ordering::Relaxed);
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let avg_latency_ms = if count > 0 { (sum as f64 / count as f64) / 1000.0 } else { 0.0 };

        EngineStatus {
            model_loaded,
            state,
            version,
            inference_count: count,
            failed_count: self.failed_count.load(Ordering::Relaxed),
            avg_latency_ms,
        }
    }
}
