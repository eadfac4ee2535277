use std::path::PathBuf;

use crate::logic::dataset::DatasetError;
use crate::logic::features::ShapeError;

#[derive(Debug)]
pub enum ModelError {
    /// Input vector rejected before inference
    Shape(ShapeError),
    /// `predict` with no live artifact
    NotLoaded,
    /// `save` with no live artifact
    NotTrained,
    /// `load` from a path that does not exist
    ArtifactNotFound(PathBuf),
    IoError(std::io::Error),
    SerializationError(serde_json::Error),
    /// Stored blob parsed but is structurally unusable
    InvalidArtifact(String),
    /// Malformed/empty dataset or bad hyper-parameters
    Training(String),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::Shape(e) => write!(f, "Invalid features: {}", e),
            ModelError::NotLoaded => write!(f, "Model is not loaded"),
            ModelError::NotTrained => write!(f, "Model is not trained"),
            ModelError::ArtifactNotFound(path) => {
                write!(f, "Model artifact not found: {}", path.display())
            }
            ModelError::IoError(e) => write!(f, "IO Error: {}", e),
            ModelError::SerializationError(e) => write!(f, "Serialization Error: {}", e),
            ModelError::InvalidArtifact(msg) => write!(f, "Invalid model artifact: {}", msg),
            ModelError::Training(msg) => write!(f, "Training failed: {}", msg),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Shape(e) => Some(e),
            ModelError::IoError(e) => Some(e),
            ModelError::SerializationError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ShapeError> for ModelError {
    fn from(err: ShapeError) -> Self {
        ModelError::Shape(err)
    }
}

impl From<std::io::Error> for ModelError {
    fn from(err: std::io::Error) -> Self {
        ModelError::IoError(err)
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::SerializationError(err)
    }
}

impl From<DatasetError> for ModelError {
    fn from(err: DatasetError) -> Self {
        ModelError::Training(err.0)
    }
}
