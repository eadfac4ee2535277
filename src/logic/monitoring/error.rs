#[derive(Debug)]
pub enum MonitorError {
    /// Fewer buffered records than a report needs
    InsufficientData { required: usize, actual: usize },
    IoError(std::io::Error),
    SerializationError(serde_json::Error),
}

impl std::fmt::Display for MonitorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonitorError::InsufficientData { required, actual } => write!(
                f,
                "Insufficient data for drift analysis: need at least {} predictions, have {}",
                required, actual
            ),
            MonitorError::IoError(e) => write!(f, "IO Error: {}", e),
            MonitorError::SerializationError(e) => write!(f, "Serialization Error: {}", e),
        }
    }
}

impl std::error::Error for MonitorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MonitorError::IoError(e) => Some(e),
            MonitorError::SerializationError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MonitorError {
    fn from(err: std::io::Error) -> Self {
        MonitorError::IoError(err)
    }
}

impl From<serde_json::Error> for MonitorError {
    fn from(err: serde_json::Error) -> Self {
        MonitorError::SerializationError(err)
    }
}
