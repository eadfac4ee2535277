//! Drift Statistics (Extensible)
//!
//! Per-feature two-sample comparison of a reference column against the
//! current window. New tests plug in by implementing `DriftStatistic`;
//! `DriftMethod` picks one of the built-ins by name.

use aprender::stats::hypothesis::ttest_ind;
use serde::{Deserialize, Serialize};

use super::stats;

// ============================================================================
// DRIFT STATISTIC TRAIT
// ============================================================================

/// Outcome of one column comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftComparison {
    pub drifted: bool,
    /// Test statistic / distance (meaning depends on the statistic)
    pub score: f64,
    /// Present for hypothesis tests
    pub p_value: Option<f64>,
}

impl DriftComparison {
    fn stable(score: f64, p_value: Option<f64>) -> Self {
        Self { drifted: false, score, p_value }
    }
}

pub trait DriftStatistic: Send + Sync {
    fn name(&self) -> &str;
    /// p-value cutoff for tests, score cutoff for distances
    fn threshold(&self) -> f64;
    fn compare(&self, reference: &[f64], current: &[f64]) -> DriftComparison;
}

// ============================================================================
// BUILT-IN STATISTICS
// ============================================================================

/// Welch's unequal-variance t-test on the column means (`aprender` `ttest_ind`)
pub struct WelchTTest {
    pub alpha: f64,
}

impl Default for WelchTTest {
    fn default() -> Self {
        Self { alpha: 0.05 }
    }
}

impl DriftStatistic for WelchTTest {
    fn name(&self) -> &str {
        "welch_t_test"
    }

    fn threshold(&self) -> f64 {
        self.alpha
    }

    fn compare(&self, reference: &[f64], current: &[f64]) -> DriftComparison {
        if reference.len() < 2 || current.len() < 2 {
            return DriftComparison::stable(0.0, None);
        }

        let diff = stats::mean(current) - stats::mean(reference);
        let (v1, v2) = (stats::sample_variance(reference), stats::sample_variance(current));

        // Standardised mean difference against the reference spread
        let ref_std = v1.sqrt();
        let score = if ref_std > 0.0 { diff.abs() / ref_std } else { diff.abs() };

        let p_value = if v1 + v2 <= 0.0 {
            // Both columns constant
            if diff == 0.0 { 1.0 } else { 0.0 }
        } else {
            let (a, b) = (to_f32(reference), to_f32(current));
            match ttest_ind(&a, &b, false) {
                Ok(result) if result.pvalue.is_finite() => f64::from(result.pvalue),
                Ok(_) | Err(_) => return DriftComparison::stable(score, None),
            }
        };

        DriftComparison { drifted: p_value < self.alpha, score, p_value: Some(p_value) }
    }
}

/// Two-sample Kolmogorov-Smirnov, decided against the asymptotic critical
/// value `c(alpha) * sqrt((n + m) / (n * m))`
pub struct KolmogorovSmirnov {
    pub alpha: f64,
}

impl Default for KolmogorovSmirnov {
    fn default() -> Self {
        Self { alpha: 0.05 }
    }
}

impl KolmogorovSmirnov {
    /// Largest D accepted as "same distribution" for these sample sizes
    pub fn critical_value(&self, n: usize, m: usize) -> f64 {
        let c = (-(self.alpha / 2.0).ln() / 2.0).sqrt();
        let (n, m) = (n as f64, m as f64);
        c * ((n + m) / (n * m)).sqrt()
    }
}

impl DriftStatistic for KolmogorovSmirnov {
    fn name(&self) -> &str {
        "kolmogorov_smirnov"
    }

    fn threshold(&self) -> f64 {
        self.alpha
    }

    fn compare(&self, reference: &[f64], current: &[f64]) -> DriftComparison {
        if reference.is_empty() || current.is_empty() {
            return DriftComparison::stable(0.0, None);
        }

        let d = stats::ecdf_max_distance(&stats::sorted(reference), &stats::sorted(current));
        let critical = self.critical_value(reference.len(), current.len());

        DriftComparison { drifted: d > critical, score: d, p_value: None }
    }
}

/// Population Stability Index over equal-width bins of the combined range
pub struct PopulationStability {
    pub bins: usize,
    pub threshold: f64,
    pub epsilon: f64,
}

impl Default for PopulationStability {
    fn default() -> Self {
        Self { bins: 10, threshold: 0.25, epsilon: 1e-4 }
    }
}

impl PopulationStability {
    fn psi(&self, reference: &[f64], current: &[f64]) -> f64 {
        if reference.is_empty() || current.is_empty() || self.bins == 0 {
            return 0.0;
        }

        let (min, max) = reference
            .iter()
            .chain(current)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

        if (max - min).abs() < self.epsilon {
            return 0.0;
        }

        let width = (max - min) / self.bins as f64;
        let histogram = |values: &[f64]| {
            let mut counts = vec![0usize; self.bins];
            for &v in values {
                let bin = (((v - min) / width).floor() as usize).min(self.bins - 1);
                counts[bin] += 1;
            }
            counts
        };

        let (ref_counts, cur_counts) = (histogram(reference), histogram(current));
        let (ref_total, cur_total) = (reference.len() as f64, current.len() as f64);

        ref_counts
            .iter()
            .zip(&cur_counts)
            .map(|(&r, &c)| {
                let r = (r as f64 / ref_total).max(self.epsilon);
                let c = (c as f64 / cur_total).max(self.epsilon);
                (c - r) * (c / r).ln()
            })
            .sum::<f64>()
            .abs()
    }
}

impl DriftStatistic for PopulationStability {
    fn name(&self) -> &str {
        "population_stability_index"
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn compare(&self, reference: &[f64], current: &[f64]) -> DriftComparison {
        let psi = self.psi(reference, current);
        DriftComparison { drifted: psi >= self.threshold, score: psi, p_value: None }
    }
}

/// First Wasserstein distance, normalised by the reference standard deviation
pub struct Wasserstein {
    pub threshold: f64,
}

impl Default for Wasserstein {
    fn default() -> Self {
        Self { threshold: 0.1 }
    }
}

impl DriftStatistic for Wasserstein {
    fn name(&self) -> &str {
        "wasserstein_distance"
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn compare(&self, reference: &[f64], current: &[f64]) -> DriftComparison {
        if reference.is_empty() || current.is_empty() {
            return DriftComparison::stable(0.0, None);
        }

        let distance = stats::wasserstein_distance(&stats::sorted(reference), &stats::sorted(current));
        let ref_std = stats::sample_std(reference);
        let score = if ref_std > 0.0 { distance / ref_std } else { distance };

        DriftComparison { drifted: score >= self.threshold, score, p_value: None }
    }
}

fn to_f32(values: &[f64]) -> Vec<f32> {
    values.iter().map(|&v| v as f32).collect()
}

// ============================================================================
// METHOD SELECTION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftMethod {
    #[default]
    WelchTTest,
    KolmogorovSmirnov,
    PopulationStability,
    Wasserstein,
}

impl DriftMethod {
    /// Built-in statistic with default thresholds
    pub fn statistic(self) -> Box<dyn DriftStatistic> {
        match self {
            DriftMethod::WelchTTest => Box::new(WelchTTest::default()),
            DriftMethod::KolmogorovSmirnov => Box::new(KolmogorovSmirnov::default()),
            DriftMethod::PopulationStability => Box::new(PopulationStability::default()),
            DriftMethod::Wasserstein => Box::new(Wasserstein::default()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DriftMethod::WelchTTest => "ttest",
            DriftMethod::KolmogorovSmirnov => "ks",
            DriftMethod::PopulationStability => "psi",
            DriftMethod::Wasserstein => "wasserstein",
        }
    }
}

impl std::fmt::Display for DriftMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DriftMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ttest" | "t_test" | "welch" => Ok(DriftMethod::WelchTTest),
            "ks" | "kolmogorov_smirnov" => Ok(DriftMethod::KolmogorovSmirnov),
            "psi" => Ok(DriftMethod::PopulationStability),
            "wasserstein" | "emd" => Ok(DriftMethod::Wasserstein),
            other => Err(format!("Unknown drift method '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic, roughly bell-shaped sample around `center`
    fn sample(center: f64, spread: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let u = (i as f64 + 0.5) / n as f64;
                center + spread * (u - 0.5) * 3.0 * (1.0 - (2.0 * u - 1.0).abs()).sqrt()
            })
            .collect()
    }

    fn all_methods() -> Vec<DriftMethod> {
        vec![
            DriftMethod::WelchTTest,
            DriftMethod::KolmogorovSmirnov,
            DriftMethod::PopulationStability,
            DriftMethod::Wasserstein,
        ]
    }

    #[test]
    fn test_identical_columns_do_not_drift() {
        let reference = sample(5.0, 1.0, 150);
        for method in all_methods() {
            let result = method.statistic().compare(&reference, &reference);
            assert!(!result.drifted, "{} flagged identical data", method);
        }
    }

    #[test]
    fn test_large_shift_drifts() {
        let reference = sample(5.0, 1.0, 150);
        let current = sample(9.0, 1.0, 50);
        for method in all_methods() {
            let result = method.statistic().compare(&reference, &current);
            assert!(result.drifted, "{} missed a disjoint shift", method);
            assert!(result.score > 0.0);
        }
    }

    #[test]
    fn test_welch_points_at_mean() {
        let reference = sample(5.0, 1.0, 150);
        let m = stats::mean(&reference);
        let result = WelchTTest::default().compare(&reference, &[m; 10]);
        assert!(!result.drifted);
        assert!(result.p_value.unwrap() > 0.99);
    }

    #[test]
    fn test_welch_constant_columns() {
        let t = WelchTTest::default();
        assert!(!t.compare(&[1.0; 5], &[1.0; 5]).drifted);
        assert!(t.compare(&[1.0; 5], &[2.0; 5]).drifted);
        assert_eq!(t.compare(&[1.0], &[2.0]).p_value, None);
    }

    #[test]
    fn test_ks_critical_value() {
        let ks = KolmogorovSmirnov::default();
        // c(0.05) = 1.358
        assert!((ks.critical_value(100, 100) - 1.358_1 * 0.02f64.sqrt()).abs() < 1e-3);
        assert!(ks.critical_value(150, 10) > ks.critical_value(150, 100));

        // half of each sample overlaps the other
        let reference: Vec<f64> = (0..150).map(|i| i as f64).collect();
        let shifted: Vec<f64> = reference.iter().map(|v| v + 75.0).collect();
        let result = ks.compare(&reference, &shifted);
        assert_eq!(result.score, 0.5);
        assert!(result.drifted);
        assert_eq!(result.p_value, None);
    }

    #[test]
    fn test_psi_constant_range() {
        let psi = PopulationStability::default();
        assert_eq!(psi.compare(&[3.0; 10], &[3.0; 10]).score, 0.0);
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("ttest".parse::<DriftMethod>(), Ok(DriftMethod::WelchTTest));
        assert_eq!(" KS ".parse::<DriftMethod>(), Ok(DriftMethod::KolmogorovSmirnov));
        assert_eq!("psi".parse::<DriftMethod>(), Ok(DriftMethod::PopulationStability));
        assert_eq!("emd".parse::<DriftMethod>(), Ok(DriftMethod::Wasserstein));
        assert!("chi2".parse::<DriftMethod>().is_err());
        for method in all_methods() {
            assert_eq!(method.as_str().parse::<DriftMethod>(), Ok(method));
        }
        assert_eq!(DriftMethod::default(), DriftMethod::WelchTTest);
    }
}
