use std::path::PathBuf;

use crate::constants;
use super::monitoring::{DriftMethod, ReportFormat};

/// Runtime configuration shared by both services.
///
/// Built from environment variables (see `constants.rs`); tests construct it
/// directly so every run gets isolated paths.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub model_path: PathBuf,
    pub reports_dir: PathBuf,
    pub drift_method: DriftMethod,
    pub report_format: ReportFormat,
    pub test_size: f64,
    pub random_state: u64,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        let drift_method = constants::get_drift_method()
            .parse()
            .unwrap_or_else(|e| {
                log::warn!("{} - falling back to '{}'", e, constants::DEFAULT_DRIFT_METHOD);
                DriftMethod::default()
            });

        let report_format = constants::get_report_format()
            .parse()
            .unwrap_or_else(|e| {
                log::warn!("{} - falling back to '{}'", e, constants::DEFAULT_REPORT_FORMAT);
                ReportFormat::default()
            });

        Self {
            model_path: PathBuf::from(constants::get_model_path()),
            reports_dir: PathBuf::from(constants::get_reports_dir()),
            drift_method,
            report_format,
            test_size: constants::get_test_size(),
            random_state: constants::get_random_state(),
        }
    }

    /// Config rooted in `base`: `<base>/model.json` and `<base>/reports`.
    pub fn in_dir(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            model_path: base.join(constants::DEFAULT_MODEL_PATH),
            reports_dir: base.join(constants::DEFAULT_REPORTS_DIR),
            ..Self::default()
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(constants::DEFAULT_MODEL_PATH),
            reports_dir: PathBuf::from(constants::DEFAULT_REPORTS_DIR),
            drift_method: DriftMethod::default(),
            report_format: ReportFormat::default(),
            test_size: constants::DEFAULT_TEST_SIZE,
            random_state: constants::DEFAULT_RANDOM_STATE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_dir_paths() {
        let config = ServiceConfig::in_dir("/tmp/mlops");
        assert_eq!(config.model_path, PathBuf::from("/tmp/mlops/model.json"));
        assert_eq!(config.reports_dir, PathBuf::from("/tmp/mlops/reports"));
        assert_eq!(config.drift_method, DriftMethod::WelchTTest);
        assert_eq!(config.report_format, ReportFormat::Html);
    }

    #[test]
    fn test_default_training_params() {
        let config = ServiceConfig::default();
        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.random_state, 42);
    }
}
