//! Drift Monitoring Engine
//!
//! `log_prediction` is the hot path: validate, append, done. No I/O, never
//! fails. `generate_report` snapshots the buffer and does all the heavy work
//! on the copy, so logging is never blocked by a report in progress.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::logic::config::ServiceConfig;
use crate::logic::dataset::{self, ReferenceDataset};
use crate::logic::features::{layout, FeatureVector, FEATURE_COUNT, FEATURE_LAYOUT};
use super::buffer::{BufferStatus, ObservationBuffer};
use super::drift::{DriftMethod, DriftStatistic};
use super::error::MonitorError;
use super::quality::{self, IntakeCounts};
use super::record::PredictionRecord;
use super::report::{self, ClassCount, DriftReport, FeatureDrift, PredictionSummary, ReportFormat};
use super::stats;

/// Minimum buffered predictions before a report can be generated
pub const MIN_REPORT_SAMPLES: usize = 10;

pub struct MonitoringService {
    reference: Arc<ReferenceDataset>,
    buffer: ObservationBuffer,
    statistic: Box<dyn DriftStatistic>,
    format: ReportFormat,
    reports_dir: PathBuf,
    intake: Mutex<IntakeCounts>,
}

impl MonitoringService {
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            reference: dataset::shared(),
            buffer: ObservationBuffer::default(),
            statistic: DriftMethod::default().statistic(),
            format: ReportFormat::default(),
            reports_dir: reports_dir.into(),
            intake: Mutex::new(IntakeCounts::default()),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(&config.reports_dir)
            .with_method(config.drift_method)
            .with_format(config.report_format)
    }

    pub fn with_method(self, method: DriftMethod) -> Self {
        self.with_statistic(method.statistic())
    }

    /// Plug in a custom drift statistic
    pub fn with_statistic(mut self, statistic: Box<dyn DriftStatistic>) -> Self {
        self.statistic = statistic;
        self
    }

    pub fn with_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_reference(mut self, reference: Arc<ReferenceDataset>) -> Self {
        self.reference = reference;
        self
    }

    pub fn with_buffer_limits(mut self, capacity: usize, retain: usize) -> Self {
        self.buffer = ObservationBuffer::with_limits(capacity, retain);
        self
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    // ------------------------------------------------------------------------
    // Ingest
    // ------------------------------------------------------------------------

    /// Record one served prediction. Malformed input is dropped and counted.
    pub fn log_prediction(&self, features: &[f64], prediction: usize, probabilities: &[f64], latency_ms: f64) {
        self.intake.lock().record(features);

        let vector = match FeatureVector::try_from(features) {
            Ok(v) => v,
            Err(e) => return self.reject(&e.to_string()),
        };
        if probabilities.is_empty() || probabilities.iter().any(|p| !p.is_finite()) {
            return self.reject("probabilities must be a non-empty list of finite values");
        }
        if !latency_ms.is_finite() {
            return self.reject("latency is not finite");
        }

        self.buffer
            .push(PredictionRecord::new(&vector, prediction, probabilities, latency_ms));
    }

    fn reject(&self, reason: &str) {
        self.intake.lock().rejected += 1;
        log::debug!("Dropped prediction record: {}", reason);
    }

    // ------------------------------------------------------------------------
    // Reports
    // ------------------------------------------------------------------------

    /// Compare the buffered window against the reference without writing anything
    pub fn compute_report(&self) -> Result<DriftReport, MonitorError> {
        let records = self.buffer.snapshot();

        if records.len() < MIN_REPORT_SAMPLES {
            log::warn!(
                "Insufficient data for drift analysis ({} of {} predictions)",
                records.len(),
                MIN_REPORT_SAMPLES
            );
            return Err(MonitorError::InsufficientData {
                required: MIN_REPORT_SAMPLES,
                actual: records.len(),
            });
        }

        let rows: Vec<[f64; FEATURE_COUNT]> = records.iter().map(|r| r.features).collect();

        let features: Vec<FeatureDrift> = FEATURE_LAYOUT
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let reference = self.reference.column_values(i);
                let current: Vec<f64> = rows.iter().map(|r| r[i]).collect();
                let comparison = self.statistic.compare(&reference, &current);

                log::debug!(
                    "{}: score={:.4} p={:?} drifted={}",
                    name, comparison.score, comparison.p_value, comparison.drifted
                );

                FeatureDrift {
                    feature: name.to_string(),
                    statistic: self.statistic.name().to_string(),
                    threshold: self.statistic.threshold(),
                    score: comparison.score,
                    p_value: comparison.p_value,
                    drifted: comparison.drifted,
                    reference_mean: stats::mean(&reference),
                    current_mean: stats::mean(&current),
                }
            })
            .collect();

        let drifted_features = features.iter().filter(|f| f.drifted).count();

        Ok(DriftReport {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            method: self.statistic.name().to_string(),
            reference_rows: self.reference.n_samples(),
            current_rows: records.len(),
            window_start: records.first().map(|r| r.timestamp),
            window_end: records.last().map(|r| r.timestamp),
            dataset_drift: drifted_features > 0,
            drifted_features,
            drift_share: drifted_features as f64 / features.len() as f64,
            features,
            predictions: summarize_predictions(&records),
            quality: quality::assess(&self.reference, &rows, &self.intake()),
        })
    }

    /// Compute and write a report, returns its path
    pub fn generate_report(&self) -> Result<PathBuf, MonitorError> {
        let report = self.compute_report()?;
        let path = report::write_report(&report, &self.reports_dir, self.format)?;

        log::info!(
            "Drift report saved: {} (dataset drift: {}, {}/{} features)",
            path.display(),
            report.dataset_drift,
            report.drifted_features,
            report.features.len()
        );
        Ok(path)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    /// Copy of the buffered records, oldest first
    pub fn snapshot(&self) -> Vec<PredictionRecord> {
        self.buffer.snapshot()
    }

    /// Intake tallies since start, including rejected submissions
    pub fn intake(&self) -> IntakeCounts {
        *self.intake.lock()
    }

    pub fn status(&self) -> BufferStatus {
        let current_size = self.buffer.len();
        BufferStatus {
            current_size,
            capacity: self.buffer.capacity(),
            retain: self.buffer.retain(),
            rejected: self.intake.lock().rejected,
            ready_for_report: current_size >= MIN_REPORT_SAMPLES,
        }
    }
}

fn summarize_predictions(records: &[PredictionRecord]) -> PredictionSummary {
    // Every known class appears, even with zero predictions
    let mut counts: BTreeMap<usize, usize> = (0..layout::CLASS_COUNT).map(|c| (c, 0)).collect();
    for r in records {
        *counts.entry(r.prediction).or_default() += 1;
    }

    let class_counts = counts
        .into_iter()
        .map(|(label, count)| ClassCount {
            label: layout::target_name(label)
                .map(str::to_string)
                .unwrap_or_else(|| label.to_string()),
            count,
        })
        .collect();

    let confidences: Vec<f64> = records.iter().map(|r| r.max_probability).collect();
    let latencies: Vec<f64> = records.iter().map(|r| r.latency_ms).collect();

    PredictionSummary {
        class_counts,
        mean_confidence: stats::mean(&confidences),
        mean_latency_ms: stats::mean(&latencies),
    }
}
