use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while persisting or loading datasets.
#[derive(Debug, Error)]
pub enum OutputError {
    /// File system operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    /// The build lacks support for a file format.
    #[error("{format} support is not enabled in this build")]
    FormatUnavailable { format: &'static str },

    /// Neither the Parquet nor the CSV dataset exists.
    #[error("no unified dataset in {dir}; run the build first")]
    DatasetNotFound { dir: PathBuf },
}

impl OutputError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<polars::prelude::PolarsError> for OutputError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OutputError>;
