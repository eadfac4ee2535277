//! Features Module - Feature schema & validated input
//!
//! `layout.rs` is the single source of truth for feature/class ordering.

pub mod layout;
pub mod vector;

// Re-export common types
pub use layout::{CLASS_COUNT, FEATURE_COUNT, FEATURE_LAYOUT, TARGET_NAMES};
pub use vector::{FeatureVector, ShapeError};
