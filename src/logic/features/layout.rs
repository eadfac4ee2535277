//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the feature schema.**
//! The model artifact, the reference dataset and the drift report all index
//! features positionally through `FEATURE_LAYOUT`.

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: &[&str] = &[
    "sepal_length",  // 0: cm
    "sepal_width",   // 1: cm
    "petal_length",  // 2: cm
    "petal_width",   // 3: cm
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 4;

/// Class labels in model output order
pub const TARGET_NAMES: &[&str] = &["setosa", "versicolor", "virginica"];

/// Total number of classes
pub const CLASS_COUNT: usize = 3;

// ============================================================================
// LOOKUP
// ============================================================================

/// Get feature index by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Get feature name by index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

/// Get class name by label
pub fn target_name(label: usize) -> Option<&'static str> {
    TARGET_NAMES.get(label).copied()
}

/// Owned feature names (artifact metadata)
pub fn feature_names() -> Vec<String> {
    FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect()
}

/// Owned class names (artifact metadata)
pub fn target_names() -> Vec<String> {
    TARGET_NAMES.iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_match_layout() {
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
        assert_eq!(TARGET_NAMES.len(), CLASS_COUNT);
    }

    #[test]
    fn test_feature_index() {
        assert_eq!(feature_index("sepal_length"), Some(0));
        assert_eq!(feature_index("petal_width"), Some(3));
        assert_eq!(feature_index("nonexistent"), None);
    }

    #[test]
    fn test_feature_and_target_names() {
        assert_eq!(feature_name(2), Some("petal_length"));
        assert_eq!(feature_name(4), None);
        assert_eq!(target_name(0), Some("setosa"));
        assert_eq!(target_name(3), None);
        assert_eq!(feature_names().len(), FEATURE_COUNT);
        assert_eq!(target_names()[2], "virginica");
    }
}
