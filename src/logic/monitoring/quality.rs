//! Data Quality - missing values, range checks, duplicate rows
//!
//! Runs over the current window next to the drift comparison. Ranges come
//! from the reference dataset. The window only ever holds complete, finite
//! rows, so missing values are measured at intake: `IntakeCounts` tallies
//! every submitted record, including the ones `log_prediction` rejected.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::logic::dataset::ReferenceDataset;
use crate::logic::features::{FEATURE_COUNT, FEATURE_LAYOUT};
use super::stats;

/// Summary of the finite values in one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl ColumnSummary {
    pub fn of(values: &[f64]) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return Self { count: 0, mean: 0.0, std: 0.0, min: 0.0, max: 0.0 };
        }

        let (min, max) = finite
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

        Self {
            count: finite.len(),
            mean: stats::mean(&finite),
            std: stats::sample_std(&finite),
            min,
            max,
        }
    }
}

/// Records seen by `log_prediction` since the service started
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeCounts {
    pub submitted: u64,
    pub rejected: u64,
    /// Per feature: submissions where the value was absent or non-finite
    pub missing: [u64; FEATURE_COUNT],
}

impl IntakeCounts {
    /// Tally one submission; returns whether any feature was missing
    pub fn record(&mut self, features: &[f64]) -> bool {
        self.submitted += 1;
        let mut any_missing = false;
        for (i, slot) in self.missing.iter_mut().enumerate() {
            if features.get(i).map_or(true, |v| !v.is_finite()) {
                *slot += 1;
                any_missing = true;
            }
        }
        any_missing
    }

    pub fn missing_rate(&self, feature: usize) -> f64 {
        match self.missing.get(feature) {
            Some(&count) if self.submitted > 0 => count as f64 / self.submitted as f64,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureQuality {
    pub feature: String,
    /// Share of submitted records with this feature absent or non-finite
    pub missing_rate: f64,
    /// Share of values outside the reference [min, max]
    pub out_of_range_rate: f64,
    pub reference: ColumnSummary,
    pub current: ColumnSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitySummary {
    pub rows: usize,
    pub submitted_records: u64,
    pub rejected_records: u64,
    pub duplicate_rows: usize,
    pub duplicate_rate: f64,
    pub features: Vec<FeatureQuality>,
}

fn rate(count: usize, total: usize) -> f64 {
    if total == 0 { 0.0 } else { count as f64 / total as f64 }
}

/// Assess `rows` (current window) against the reference ranges
pub fn assess(
    reference: &ReferenceDataset,
    rows: &[[f64; FEATURE_COUNT]],
    intake: &IntakeCounts,
) -> QualitySummary {
    let n = rows.len();

    let features = FEATURE_LAYOUT
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let current: Vec<f64> = rows.iter().map(|r| r[i]).collect();
            let (lo, hi) = reference.column_range(i);

            let out_of_range = current
                .iter()
                .filter(|v| v.is_finite() && (**v < lo || **v > hi))
                .count();

            FeatureQuality {
                feature: name.to_string(),
                missing_rate: intake.missing_rate(i),
                out_of_range_rate: rate(out_of_range, n),
                reference: ColumnSummary::of(&reference.column_values(i)),
                current: ColumnSummary::of(&current),
            }
        })
        .collect();

    // Bitwise row identity
    let unique: HashSet<[u64; FEATURE_COUNT]> = rows.iter().map(|r| r.map(f64::to_bits)).collect();
    let duplicate_rows = n - unique.len();

    QualitySummary {
        rows: n,
        submitted_records: intake.submitted,
        rejected_records: intake.rejected,
        duplicate_rows,
        duplicate_rate: rate(duplicate_rows, n),
        features,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::dataset;

    #[test]
    fn test_clean_window() {
        let reference = dataset::shared();
        let rows = [[5.0, 3.0, 1.5, 0.2], [6.0, 2.9, 4.5, 1.5], [6.5, 3.0, 5.5, 2.0]];
        let q = assess(&reference, &rows, &IntakeCounts::default());

        assert_eq!(q.rows, 3);
        assert_eq!(q.duplicate_rows, 0);
        for f in &q.features {
            assert_eq!(f.missing_rate, 0.0);
            assert_eq!(f.out_of_range_rate, 0.0);
            assert_eq!(f.reference.count, 150);
            assert_eq!(f.current.count, 3);
        }
        assert_eq!(q.features[0].feature, "sepal_length");
    }

    #[test]
    fn test_out_of_range_and_duplicates() {
        let reference = dataset::shared();
        // sepal_length reference range is [4.3, 7.9]
        let rows = [
            [9.5, 3.0, 1.5, 0.2],
            [9.5, 3.0, 1.5, 0.2],
            [5.0, 3.0, 1.5, 0.2],
            [5.1, 3.0, 1.5, 0.2],
        ];
        let q = assess(&reference, &rows, &IntakeCounts::default());

        assert_eq!(q.features[0].out_of_range_rate, 0.5);
        assert_eq!(q.features[1].out_of_range_rate, 0.0);
        assert_eq!(q.duplicate_rows, 1);
        assert_eq!(q.duplicate_rate, 0.25);
    }

    #[test]
    fn test_intake_counts_missing_features() {
        let mut intake = IntakeCounts::default();
        assert!(intake.record(&[f64::NAN, 3.0, 1.5, 0.2]));
        assert!(intake.record(&[5.0, 3.0]));
        assert!(!intake.record(&[5.0, 3.0, 1.5, 0.2]));
        assert!(!intake.record(&[5.1, 3.0, 1.5, 0.2]));
        intake.rejected = 2;

        assert_eq!(intake.missing, [1, 0, 1, 1]);
        assert_eq!(intake.missing_rate(0), 0.25);
        assert_eq!(intake.missing_rate(1), 0.0);
        assert_eq!(intake.missing_rate(9), 0.0);

        let rows = [[5.0, 3.0, 1.5, 0.2], [5.1, 3.0, 1.5, 0.2]];
        let q = assess(&dataset::shared(), &rows, &intake);
        assert_eq!(q.submitted_records, 4);
        assert_eq!(q.rejected_records, 2);
        assert_eq!(q.features[2].missing_rate, 0.25);
        assert_eq!(q.features[1].missing_rate, 0.0);
    }

    #[test]
    fn test_non_finite_values_skipped_in_summary() {
        let summary = ColumnSummary::of(&[f64::NAN, 5.0]);
        assert_eq!(summary.count, 1);
        assert_eq!(summary.mean, 5.0);
    }

    #[test]
    fn test_empty_window() {
        let q = assess(&dataset::shared(), &[], &IntakeCounts::default());
        assert_eq!(q.features[0].missing_rate, 0.0);
        assert_eq!(q.rows, 0);
        assert_eq!(q.duplicate_rate, 0.0);
        assert_eq!(q.features[2].current.count, 0);
    }
}
