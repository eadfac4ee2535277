//! MLOps Core - Main Entry Point
//!
//! Stands in for the serving layer: bootstraps the model, replays a batch of
//! simulated traffic through predict + monitoring, and writes one drift report.

use std::error::Error;
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use mlops_core::constants;
use mlops_core::{MonitoringService, ModelService, ServiceConfig};

/// Simulated traffic: per-feature mean and standard deviation
const TRAFFIC_MEAN: [f64; 4] = [5.8, 3.0, 4.3, 1.3];
const TRAFFIC_STD: [f64; 4] = [0.5, 0.4, 0.8, 0.3];
const TRAFFIC_SIZE: usize = 100;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}...", constants::APP_NAME, constants::APP_VERSION);

    let config = ServiceConfig::from_env();
    log::info!(
        "Model path: {} | Reports: {} | Drift method: {} | Format: {}",
        config.model_path.display(),
        config.reports_dir.display(),
        config.drift_method,
        config.report_format
    );

    let model = ModelService::from_config(&config);
    let state = model.bootstrap(config.test_size, config.random_state)?;
    log::info!("Model ready ({:?}, version {})", state, model.version().unwrap_or_default());

    let monitor = MonitoringService::from_config(&config);

    let distributions = TRAFFIC_MEAN
        .iter()
        .zip(TRAFFIC_STD.iter())
        .map(|(&mean, &std)| Normal::new(mean, std))
        .collect::<Result<Vec<_>, _>>()?;
    let mut rng = StdRng::from_entropy();

    for _ in 0..TRAFFIC_SIZE {
        // Measurements cannot be negative
        let features: Vec<f64> = distributions
            .iter()
            .map(|d| d.sample(&mut rng).max(0.0))
            .collect();

        let start = Instant::now();
        match model.predict(&features) {
            Ok(prediction) => {
                let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
                log::debug!(
                    "{:?} -> {} ({:.3})",
                    features,
                    prediction.class_name,
                    prediction.max_probability()
                );
                monitor.log_prediction(&features, prediction.class_label, &prediction.probabilities, latency_ms);
            }
            Err(e) => log::warn!("Prediction failed: {}", e),
        }
    }

    let status = model.status();
    log::info!(
        "Served {} predictions ({} failed, avg latency {:.3} ms)",
        status.inference_count,
        status.failed_count,
        status.avg_latency_ms
    );

    let path = monitor.generate_report()?;
    log::info!("Drift report generated: {}", path.display());

    Ok(())
}
