//! Error types for ledger ingestion.

use std::path::PathBuf;

use cnpq_model::SourceYear;
use thiserror::Error;

/// Errors that can occur while discovering or reading ledgers.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not readable.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Ledger file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds maximum allowed size.
    #[error("file too large: {path} ({size} bytes, max {max_size} bytes)")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// One or more ledgers could not be located in the raw folder.
    #[error("expected ledgers not found in {dir}: {}", format_years(missing))]
    MissingSourceFiles {
        dir: PathBuf,
        missing: Vec<SourceYear>,
    },

    // === Parsing Errors ===
    /// CSV file has no content.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    /// No encoding/separator combination produced a plausible table.
    #[error("data unreadable: {path} ({})", attempts.join("; "))]
    DataUnreadable {
        path: PathBuf,
        /// One entry per attempted encoding describing why it was rejected.
        attempts: Vec<String>,
    },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

fn format_years(years: &[SourceYear]) -> String {
    years
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/raw/ledger.csv"),
        };
        assert_eq!(err.to_string(), "file not found: /raw/ledger.csv");
    }

    #[test]
    fn test_missing_files_lists_years() {
        let err = IngestError::MissingSourceFiles {
            dir: PathBuf::from("raw"),
            missing: vec![SourceYear::Y2022, SourceYear::Y2024],
        };
        assert_eq!(err.to_string(), "expected ledgers not found in raw: 2022, 2024");
    }

    #[test]
    fn test_unreadable_lists_attempts() {
        let err = IngestError::DataUnreadable {
            path: PathBuf::from("x.csv"),
            attempts: vec!["UTF-8: invalid byte sequence".into(), "windows-1252: 1 columns".into()],
        };
        assert_eq!(
            err.to_string(),
            "data unreadable: x.csv (UTF-8: invalid byte sequence; windows-1252: 1 columns)"
        );
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("test".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }
}
