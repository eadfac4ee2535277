//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Every default can be overridden through an environment variable.

/// Default location of the persisted model artifact
pub const DEFAULT_MODEL_PATH: &str = "model.json";

/// Default directory for rendered drift reports
pub const DEFAULT_REPORTS_DIR: &str = "reports";

/// Default drift statistic (see `DriftMethod`)
pub const DEFAULT_DRIFT_METHOD: &str = "ttest";

/// Default report format (`html` or `json`)
pub const DEFAULT_REPORT_FORMAT: &str = "html";

/// Default held-out fraction used by the startup training run
pub const DEFAULT_TEST_SIZE: f64 = 0.2;

/// Default seed used by the startup training run
pub const DEFAULT_RANDOM_STATE: u64 = 42;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "MLOps Core";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get model artifact path from environment or use default
pub fn get_model_path() -> String {
    std::env::var("MODEL_PATH")
        .unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string())
}

/// Get reports directory from environment or use default
pub fn get_reports_dir() -> String {
    std::env::var("REPORTS_DIR")
        .unwrap_or_else(|_| DEFAULT_REPORTS_DIR.to_string())
}

/// Get drift method name from environment or use default
pub fn get_drift_method() -> String {
    std::env::var("DRIFT_METHOD")
        .unwrap_or_else(|_| DEFAULT_DRIFT_METHOD.to_string())
}

/// Get report format name from environment or use default
pub fn get_report_format() -> String {
    std::env::var("REPORT_FORMAT")
        .unwrap_or_else(|_| DEFAULT_REPORT_FORMAT.to_string())
}

/// Get training test size from environment or use default
pub fn get_test_size() -> f64 {
    std::env::var("TRAIN_TEST_SIZE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_TEST_SIZE)
}

/// Get training seed from environment or use default
pub fn get_random_state() -> u64 {
    std::env::var("TRAIN_RANDOM_STATE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_RANDOM_STATE)
}
