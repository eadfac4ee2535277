use ndarray::Array2;

use super::{shared, to_matrix, train_test_split, ReferenceDataset};
use crate::logic::features::FEATURE_COUNT;

#[test]
fn test_iris_shape() {
    let ds = ReferenceDataset::iris();
    assert_eq!(ds.n_samples(), 150);
    assert_eq!(ds.features().ncols(), FEATURE_COUNT);
    assert_eq!(ds.labels().len(), 150);
    assert_eq!(ds.class_counts(), [50, 50, 50]);
}

#[test]
fn test_iris_column_means() {
    let means = shared().column_means();
    let expected = [5.843333, 3.057333, 3.758, 1.199333];
    for (m, e) in means.iter().zip(expected.iter()) {
        assert!((m - e).abs() < 1e-5, "mean {} != {}", m, e);
    }
}

#[test]
fn test_iris_column_range() {
    let ds = shared();
    assert_eq!(ds.column_range(0), (4.3, 7.9));
    assert_eq!(ds.column_range(3), (0.1, 2.5));
}

#[test]
fn test_shared_is_same_instance() {
    let a = shared();
    let b = shared();
    assert!(std::sync::Arc::ptr_eq(&a, &b));
}

#[test]
fn test_reject_malformed_dataset() {
    assert!(ReferenceDataset::new(Array2::zeros((0, FEATURE_COUNT)), vec![]).is_err());
    assert!(ReferenceDataset::new(Array2::zeros((3, 2)), vec![0, 1, 2]).is_err());
    assert!(ReferenceDataset::new(Array2::zeros((3, FEATURE_COUNT)), vec![0, 1]).is_err());
    assert!(ReferenceDataset::new(Array2::zeros((2, FEATURE_COUNT)), vec![0, 7]).is_err());

    let mut nan = Array2::zeros((2, FEATURE_COUNT));
    nan[[1, 1]] = f64::NAN;
    assert!(ReferenceDataset::new(nan, vec![0, 1]).is_err());
}

#[test]
fn test_split_sizes_and_stratification() {
    let ds = shared();
    let split = train_test_split(ds.features(), ds.labels(), 0.2, 42).unwrap();

    assert_eq!(split.x_test.shape(), (30, FEATURE_COUNT));
    assert_eq!(split.x_train.shape(), (120, FEATURE_COUNT));
    assert_eq!(split.y_test.len(), 30);
    assert_eq!(split.y_train.len(), 120);

    for class in 0..3 {
        assert_eq!(split.y_test.iter().filter(|&&y| y == class).count(), 10);
        assert_eq!(split.y_train.iter().filter(|&&y| y == class).count(), 40);
    }
}

#[test]
fn test_split_is_deterministic() {
    let ds = shared();
    let a = train_test_split(ds.features(), ds.labels(), 0.2, 7).unwrap();
    let b = train_test_split(ds.features(), ds.labels(), 0.2, 7).unwrap();
    assert_eq!(a.x_test, b.x_test);
    assert_eq!(a.y_train, b.y_train);

    let c = train_test_split(ds.features(), ds.labels(), 0.2, 8).unwrap();
    assert_ne!(a.x_test, c.x_test);
}

#[test]
fn test_split_rows_keep_their_labels() {
    let ds = shared();
    let split = train_test_split(ds.features(), ds.labels(), 0.2, 42).unwrap();

    // petal_length separates setosa (< 2.0) from the other two classes
    for (row, &label) in split.x_test.as_slice().chunks(FEATURE_COUNT).zip(&split.y_test) {
        assert_eq!(row[2] < 2.0, label == 0, "row {:?} labelled {}", row, label);
    }
}

#[test]
fn test_to_matrix_is_row_major() {
    let x = Array2::from_shape_fn((2, 3), |(i, j)| (i * 3 + j) as f64);
    let m = to_matrix(x.view()).unwrap();
    assert_eq!(m.shape(), (2, 3));
    assert_eq!(m.get(1, 0), 3.0);
    assert_eq!(m.as_slice(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
}

#[test]
fn test_split_uneven_classes() {
    // 6 / 3 / 2 rows at 0.3 -> 2 + 1 + 1 test rows
    let x = Array2::from_shape_fn((11, FEATURE_COUNT), |(i, j)| (i * FEATURE_COUNT + j) as f64);
    let y = vec![0, 0, 0, 0, 0, 0, 1, 1, 1, 2, 2];
    let split = train_test_split(&x, &y, 0.3, 1).unwrap();

    assert_eq!(split.y_test.len(), 4);
    for class in 0..3 {
        assert!(split.y_train.contains(&class), "class {} missing from train", class);
    }
}

#[test]
fn test_split_rejects_bad_test_size() {
    let ds = shared();
    assert!(train_test_split(ds.features(), ds.labels(), 0.0, 42).is_err());
    assert!(train_test_split(ds.features(), ds.labels(), 1.0, 42).is_err());
    assert!(train_test_split(ds.features(), ds.labels(), f64::NAN, 42).is_err());
}

#[test]
fn test_split_rejects_class_too_small_to_split() {
    let x = Array2::zeros((5, FEATURE_COUNT));
    let y = vec![0, 0, 1, 1, 2];
    assert!(train_test_split(&x, &y, 0.4, 42).is_err());
}
