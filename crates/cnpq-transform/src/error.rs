//! Error types for coercion and unification.

use thiserror::Error;

/// Errors that can occur while transforming ledger tables.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A table does not carry the canonical layout.
    #[error("table {table} does not match the canonical schema: {detail}")]
    SchemaMismatch { table: usize, detail: String },

    /// Nothing to unify.
    #[error("no tables to unify")]
    EmptyInput,

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;
