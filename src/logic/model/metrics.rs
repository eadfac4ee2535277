//! Held-out evaluation recorded at training time (accuracy + per-class report)
//!
//! Counting is `aprender::metrics::classification::confusion_matrix`
//! (rows = true class, columns = predicted); accuracy and the per-class
//! ratios are read off it.

use aprender::metrics::classification;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub accuracy: f64,
    pub train_samples: usize,
    pub test_samples: usize,
    pub per_class: Vec<ClassMetrics>,
}

impl TrainingMetrics {
    /// Compare predictions against ground truth. Undefined ratios (no
    /// predictions or no support for a class) are reported as 0.
    pub fn evaluate(y_true: &[usize], y_pred: &[usize], target_names: &[String], train_samples: usize) -> Self {
        let n = y_true.len();
        if n == 0 || y_pred.len() != n {
            let per_class = target_names
                .iter()
                .map(|label| ClassMetrics { label: label.clone(), precision: 0.0, recall: 0.0, f1: 0.0, support: 0 })
                .collect();
            return Self { accuracy: 0.0, train_samples, test_samples: n, per_class };
        }

        let confusion = classification::confusion_matrix(y_pred, y_true);
        let size = confusion.n_rows();
        let cell = |t: usize, p: usize| if t < size && p < size { confusion.get(t, p) } else { 0 };

        // Diagonal over total
        let accuracy = ratio((0..size).map(|c| cell(c, c)).sum(), n);

        let per_class = target_names
            .iter()
            .enumerate()
            .map(|(class, label)| {
                let tp = cell(class, class);
                let predicted: usize = (0..size).map(|t| cell(t, class)).sum();
                let support: usize = (0..size).map(|p| cell(class, p)).sum();

                let precision = ratio(tp, predicted);
                let recall = ratio(tp, support);
                let f1 = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                };

                ClassMetrics { label: label.clone(), precision, recall, f1, support }
            })
            .collect();

        Self { accuracy, train_samples, test_samples: n, per_class }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        vec!["a".to_string(), "b".to_string(), "c".to_string()]
    }

    #[test]
    fn test_perfect_predictions() {
        let y = [0, 1, 2, 0];
        let m = TrainingMetrics::evaluate(&y, &y, &names(), 10);
        assert_eq!(m.accuracy, 1.0);
        assert_eq!(m.test_samples, 4);
        assert_eq!(m.train_samples, 10);
        assert!(m.per_class.iter().all(|c| c.f1 == 1.0));
        assert_eq!(m.per_class[0].support, 2);
    }

    #[test]
    fn test_partial_predictions() {
        let m = TrainingMetrics::evaluate(&[0, 0, 1, 1], &[0, 1, 1, 1], &names(), 0);
        assert_eq!(m.accuracy, 0.75);
        assert_eq!(m.per_class[0].precision, 1.0);
        assert_eq!(m.per_class[0].recall, 0.5);
        assert!((m.per_class[1].precision - 2.0 / 3.0).abs() < 1e-12);
        // class "c" never seen nor predicted
        assert_eq!(m.per_class[2].f1, 0.0);
        assert_eq!(m.per_class[2].support, 0);
    }

    #[test]
    fn test_empty_partition() {
        let m = TrainingMetrics::evaluate(&[], &[], &names(), 5);
        assert_eq!(m.accuracy, 0.0);
        assert_eq!(m.per_class.len(), 3);
    }
}
