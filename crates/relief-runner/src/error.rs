//! Runner error types.

use std::path::PathBuf;

use relief_core::ReliefError;
use relief_dem::DemError;
use thiserror::Error;

/// Errors raised by configuration loading, tile discovery and output.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Dem(#[from] DemError),

    #[error(transparent)]
    Relief(#[from] ReliefError),
}

impl RunnerError {
    /// Short failure category, used as a metric label.
    pub fn reason(&self) -> &'static str {
        match self {
            RunnerError::Relief(ReliefError::DataUnavailable { .. }) => "unavailable",
            RunnerError::Relief(ReliefError::Decode { .. }) | RunnerError::Dem(_) => "decode",
            RunnerError::Io(_) | RunnerError::Json(_) => "io",
            _ => "other",
        }
    }
}

/// Result type for runner operations.
pub type Result<T> = std::result::Result<T, RunnerError>;
