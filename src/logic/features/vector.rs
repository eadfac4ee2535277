//! Feature Vector - validated model input
//!
//! Raw request values are checked once here (arity, finiteness, sign) and
//! never coerced. Everything downstream works on `FeatureVector`.

use aprender::primitives::Matrix;
use serde::{Deserialize, Serialize};

use super::layout::{feature_index, FEATURE_COUNT, FEATURE_LAYOUT};

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Input rejected before reaching the model
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeError {
    WrongArity { expected: usize, actual: usize },
    NonFinite { feature: &'static str },
    Negative { feature: &'static str, value: f64 },
}

impl std::fmt::Display for ShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeError::WrongArity { expected, actual } => {
                write!(f, "Expected {} features, got {}", expected, actual)
            }
            ShapeError::NonFinite { feature } => {
                write!(f, "Feature '{}' is not a finite number", feature)
            }
            ShapeError::Negative { feature, value } => {
                write!(f, "Feature '{}' cannot be negative (got {})", feature, value)
            }
        }
    }
}

impl std::error::Error for ShapeError {}

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Exactly `FEATURE_COUNT` non-negative finite values, ordered as `FEATURE_LAYOUT`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Result<Self, ShapeError> {
        for (i, &value) in values.iter().enumerate() {
            let feature = FEATURE_LAYOUT[i];
            if !value.is_finite() {
                return Err(ShapeError::NonFinite { feature });
            }
            if value < 0.0 {
                return Err(ShapeError::Negative { feature, value });
            }
        }
        Ok(Self { values })
    }

    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        feature_index(name).and_then(|i| self.get(i))
    }

    /// Single-row `(1, FEATURE_COUNT)` matrix, the shape the classifier expects
    pub fn to_matrix(&self) -> Matrix<f32> {
        let mut row = Matrix::zeros(1, FEATURE_COUNT);
        for (j, &value) in self.values.iter().enumerate() {
            row.set(0, j, value as f32);
        }
        row
    }
}

impl TryFrom<&[f64]> for FeatureVector {
    type Error = ShapeError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        let array: [f64; FEATURE_COUNT] = values.try_into().map_err(|_| ShapeError::WrongArity {
            expected: FEATURE_COUNT,
            actual: values.len(),
        })?;
        Self::new(array)
    }
}

impl TryFrom<Vec<f64>> for FeatureVector {
    type Error = ShapeError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::try_from(values.as_slice())
    }
}

impl From<FeatureVector> for Vec<f64> {
    fn from(vector: FeatureVector) -> Self {
        vector.values.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_vector() {
        let v = FeatureVector::try_from(&[5.1, 3.5, 1.4, 0.2][..]).unwrap();
        assert_eq!(v.as_array(), &[5.1, 3.5, 1.4, 0.2]);
        assert_eq!(v.get_by_name("petal_length"), Some(1.4));
        assert_eq!(v.get(7), None);
    }

    #[test]
    fn test_zero_is_allowed() {
        assert!(FeatureVector::new([0.0; FEATURE_COUNT]).is_ok());
    }

    #[test]
    fn test_reject_wrong_arity() {
        let err = FeatureVector::try_from(vec![1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err, ShapeError::WrongArity { expected: 4, actual: 3 });

        let err = FeatureVector::try_from(vec![1.0; 5]).unwrap_err();
        assert_eq!(err, ShapeError::WrongArity { expected: 4, actual: 5 });
    }

    #[test]
    fn test_reject_negative() {
        let err = FeatureVector::new([5.1, -3.5, 1.4, 0.2]).unwrap_err();
        assert_eq!(err, ShapeError::Negative { feature: "sepal_width", value: -3.5 });
    }

    #[test]
    fn test_reject_non_finite() {
        let err = FeatureVector::new([5.1, 3.5, f64::NAN, 0.2]).unwrap_err();
        assert_eq!(err, ShapeError::NonFinite { feature: "petal_length" });
        assert!(FeatureVector::new([f64::INFINITY, 3.5, 1.4, 0.2]).is_err());
    }

    #[test]
    fn test_to_matrix_shape() {
        let v = FeatureVector::new([1.0, 2.0, 3.0, 4.5]).unwrap();
        let row = v.to_matrix();
        assert_eq!(row.shape(), (1, FEATURE_COUNT));
        assert_eq!(row.get(0, 3), 4.5);
    }

    #[test]
    fn test_serde_validates() {
        let v: FeatureVector = serde_json::from_str("[5.1, 3.5, 1.4, 0.2]").unwrap();
        assert_eq!(v.as_slice()[0], 5.1);
        assert!(serde_json::from_str::<FeatureVector>("[5.1, 3.5]").is_err());
    }
}
