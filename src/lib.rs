//! MLOps Core - Model Lifecycle & Drift Monitoring
//!
//! Two process-wide services composed by an external serving layer:
//! - `logic::model` - train / persist / load / predict the Iris classifier
//! - `logic::monitoring` - rolling observation buffer + on-demand drift reports

pub mod constants;
pub mod logic;

pub use logic::config::ServiceConfig;
pub use logic::features::{FeatureVector, ShapeError};
pub use logic::model::{ModelError, ModelService, ModelState, Prediction};
pub use logic::monitoring::{MonitorError, MonitoringService};
