//! Error types for result and configuration ingestion.

use thiserror::Error;

/// Errors that can occur while reading bytes or loading configuration.
///
/// None of these cross the aggregation boundary: result-file failures
/// degrade to "no data for this template" and configuration failures degrade
/// to empty collections.
#[derive(Debug, Error)]
pub enum IngestError {
    /// File or object not found.
    #[error("not found: {path}")]
    NotFound { path: String },

    /// Failed to read file or object.
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to deserialize a YAML configuration document.
    #[error("failed to parse YAML {path}: {message}")]
    Yaml { path: String, message: String },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
