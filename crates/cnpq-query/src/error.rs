use thiserror::Error;

/// Errors raised by dataset queries.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The dataset lacks a column the query needs.
    #[error("required column missing: {name}")]
    MissingColumn { name: String },

    /// Neither region code column exists.
    #[error("no region column (SIGLA_UF_DESTINO / SIGLA_UF_ORIGEM) in dataset")]
    NoRegionColumn,

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for QueryError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;
