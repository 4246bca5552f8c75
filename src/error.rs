//! Error types for the FX aggregator

use thiserror::Error;

/// Main error type for the FX aggregator
#[derive(Error, Debug)]
pub enum FxError {
    /// Network, DNS or timeout failure, or a body that is not structured data
    #[error("Transport error: {0}")]
    Transport(String),

    /// Well-formed response that signals failure
    #[error("API error (status {status:?}): {payload}")]
    Api { status: Option<u16>, payload: String },

    /// Expected column or file missing, or content unparsable
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    #[error("Insufficient data: required {required} observations, available {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl FxError {
    /// True for failures a caller may reasonably retry
    pub fn is_transport(&self) -> bool {
        matches!(self, FxError::Transport(_))
    }

    pub fn is_api(&self) -> bool {
        matches!(self, FxError::Api { .. })
    }
}

impl From<reqwest::Error> for FxError {
    fn from(e: reqwest::Error) -> Self {
        FxError::Transport(e.to_string())
    }
}

/// Result type alias for aggregator operations
pub type Result<T> = std::result::Result<T, FxError>;
