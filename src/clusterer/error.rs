use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClusterError {
    #[error("Insufficient data: {points} points for k={k}")]
    InsufficientData { points: usize, k: usize },

    #[error("Invalid cluster count: {0} (must be at least 1)")]
    InvalidClusterCount(usize),

    #[error("Invalid domain: [{min}, {max}]")]
    InvalidDomain { min: f64, max: f64 },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Manual strategy requires user-selected centroids")]
    ManualSelectionRequired,
}
