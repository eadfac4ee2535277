//! Model Module - Model Lifecycle Manager
//!
//! # Architecture
//! - `forest.rs`: `aprender` random forest behind an f64 predict_proba
//! - `artifact.rs`: `ModelArtifact` (model + version + names + metrics)
//! - `storage.rs`: atomic JSON persistence with checksum
//! - `service.rs`: `ModelService` (train / save / load / predict)
//!
//! # Failure Strategy
//! Every precondition violation is returned as a `ModelError`; a failed
//! train or load never replaces the live artifact.

pub mod artifact;
pub mod error;
pub mod forest;
pub mod metrics;
pub mod service;
pub mod storage;

// Re-export common types
pub use artifact::{ModelArtifact, DEFAULT_MODEL_VERSION};
pub use error::ModelError;
pub use forest::{ForestParams, RandomForest};
pub use metrics::{ClassMetrics, TrainingMetrics};
pub use service::{EngineStatus, ModelMetadata, ModelService, ModelState, Prediction};
