//! Model Artifact - trained classifier plus identifying metadata
//!
//! Persisted as a single JSON blob. `version` and the name lists are plain
//! strings so older/newer blobs stay readable; a blob without `version`
//! loads as `DEFAULT_MODEL_VERSION`.

use serde::{Deserialize, Serialize};

use crate::logic::features::layout;
use super::forest::RandomForest;
use super::metrics::TrainingMetrics;

/// Version assumed for artifacts persisted without one
pub const DEFAULT_MODEL_VERSION: &str = "1.0.0";

fn default_version() -> String {
    DEFAULT_MODEL_VERSION.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model: RandomForest,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "layout::feature_names")]
    pub feature_names: Vec<String>,
    #[serde(default = "layout::target_names")]
    pub target_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<TrainingMetrics>,
}

impl ModelArtifact {
    /// Check that the model and its metadata match the served layout: four
    /// features in `FEATURE_LAYOUT` order and one probability per entry of
    /// `TARGET_NAMES`.
    pub fn validate(&self) -> Result<(), String> {
        if self.feature_names != layout::feature_names() {
            return Err(format!(
                "feature names {:?} do not match {:?}",
                self.feature_names,
                layout::FEATURE_LAYOUT
            ));
        }
        if self.target_names != layout::target_names() {
            return Err(format!(
                "target names {:?} do not match {:?}",
                self.target_names,
                layout::TARGET_NAMES
            ));
        }

        match self.model.n_features() {
            Some(n) if n == layout::FEATURE_COUNT => {}
            Some(n) => {
                return Err(format!(
                    "model expects {} features, layout has {}",
                    n,
                    layout::FEATURE_COUNT
                ))
            }
            None => return Err("model is not fitted".to_string()),
        }

        let n_classes = self.model.n_classes();
        if n_classes != layout::CLASS_COUNT {
            return Err(format!(
                "model predicts {} classes, layout has {}",
                n_classes,
                layout::CLASS_COUNT
            ));
        }
        Ok(())
    }
}
