//! Monitoring Module - Drift Monitoring Engine
//!
//! # Architecture
//! - `record.rs` / `buffer.rs`: bounded window of served predictions
//! - `stats.rs` / `drift.rs`: per-feature two-sample drift statistics
//! - `quality.rs`: missing values, range checks, duplicates
//! - `report.rs`: `DriftReport` + HTML/JSON rendering
//! - `service.rs`: `MonitoringService` (log_prediction / generate_report)

pub mod buffer;
pub mod drift;
pub mod error;
pub mod quality;
pub mod record;
pub mod report;
pub mod service;
pub mod stats;

// Re-export common types
pub use buffer::{BufferStatus, MAX_BUFFER_SIZE, RETAIN_ON_OVERFLOW};
pub use drift::{DriftComparison, DriftMethod, DriftStatistic};
pub use error::MonitorError;
pub use quality::{IntakeCounts, QualitySummary};
pub use record::PredictionRecord;
pub use report::{DriftReport, FeatureDrift, ReportFormat};
pub use service::{MonitoringService, MIN_REPORT_SAMPLES};
