//! Error types for model-level parsing.

use thiserror::Error;

/// Errors raised when user-facing text cannot be turned into a model value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// The year is not one of the known source ledgers.
    #[error("unsupported source year: {0}")]
    UnsupportedYear(i32),

    /// The region preference is not one of auto, destination, origin.
    #[error("unknown region preference '{0}' (expected auto, destination or origin)")]
    UnknownRegionPreference(String),
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
