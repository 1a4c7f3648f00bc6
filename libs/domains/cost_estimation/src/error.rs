use core_config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for cost estimation operations
pub type EstimationResult<T> = Result<T, EstimationError>;

/// Errors that can occur while estimating costs
#[derive(Debug, Error)]
pub enum EstimationError {
    /// Usage file could not be read
    #[error("Failed to read usage file '{path}': {source}")]
    UsageFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Usage file has an unexpected shape
    #[error("Invalid usage data: {0}")]
    UsageParse(String),

    /// Price catalog could not be loaded or queried
    #[error("Price catalog error: {0}")]
    PriceCatalog(String),

    /// Regex attribute filter could not be compiled
    #[error("Invalid filter '{filter}': {details}")]
    InvalidFilter { filter: String, details: String },

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
