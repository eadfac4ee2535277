//! Stratified train/test split
//!
//! Rows are grouped by class and each group goes through
//! `aprender::model_selection::train_test_split` on its own, so every class
//! lands in both partitions in proportion to its size.

use std::collections::BTreeMap;

use aprender::model_selection;
use aprender::primitives::{Matrix, Vector};
use ndarray::{Array2, Axis};

use super::{to_matrix, DatasetError};

/// Output partitions, grouped by class
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: Matrix<f32>,
    pub x_test: Matrix<f32>,
    pub y_train: Vec<usize>,
    pub y_test: Vec<usize>,
}

/// Split `(x, y)` into train/test partitions preserving class proportions.
///
/// `test_size` is the held-out fraction in `(0, 1)`. Each class contributes
/// `round(test_size * members)` test rows and must keep at least one row on
/// each side. The same `random_state` always yields the same partitions.
pub fn train_test_split(
    x: &Array2<f64>,
    y: &[usize],
    test_size: f64,
    random_state: u64,
) -> Result<TrainTestSplit, DatasetError> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(DatasetError(format!("test_size must be in (0, 1), got {}", test_size)));
    }
    if y.len() != x.nrows() {
        return Err(DatasetError(format!("{} rows but {} labels", x.nrows(), y.len())));
    }

    let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (idx, &label) in y.iter().enumerate() {
        by_class.entry(label).or_default().push(idx);
    }

    let n_features = x.ncols();
    let (mut train_rows, mut test_rows) = (Vec::new(), Vec::new());
    let (mut y_train, mut y_test) = (Vec::new(), Vec::new());

    for (&label, rows) in &by_class {
        let members = to_matrix(x.select(Axis(0), rows).view())?;
        let labels = Vector::from_vec(vec![label as f32; rows.len()]);
        let seed = random_state.wrapping_add(label as u64);

        let (train, test, _, _) =
            model_selection::train_test_split(&members, &labels, test_size as f32, Some(seed))
                .map_err(|e| {
                    DatasetError(format!("class {} ({} rows): {}", label, rows.len(), e))
                })?;

        train_rows.extend_from_slice(train.as_slice());
        test_rows.extend_from_slice(test.as_slice());
        y_train.extend(std::iter::repeat(label).take(train.n_rows()));
        y_test.extend(std::iter::repeat(label).take(test.n_rows()));
    }

    let matrix = |rows: Vec<f32>, n: usize| {
        Matrix::from_vec(n, n_features, rows).map_err(|e| DatasetError(e.to_string()))
    };

    Ok(TrainTestSplit {
        x_train: matrix(train_rows, y_train.len())?,
        x_test: matrix(test_rows, y_test.len())?,
        y_train,
        y_test,
    })
}
