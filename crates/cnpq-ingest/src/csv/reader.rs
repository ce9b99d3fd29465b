//! Tolerant CSV reading into a string-typed DataFrame.
//!
//! The ledgers disagree on encoding, separator and the number of banner rows
//! above the header. [`read_csv_flexible`] tries each configured encoding in
//! order and keeps the first decoding whose header looks like the ledger.

use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use polars::prelude::*;

use crate::error::{IngestError, Result};

use super::decode::{decode_with, default_encodings};
use super::header::normalize_headers;
use super::separator::sniff_separator;

/// Maximum file size for CSV loading (500 MB default).
pub const MAX_CSV_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Options for [`read_csv_flexible`].
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Number of non-empty records above the header row.
    pub header_row: usize,
    /// Forced separator; sniffed from the text when `None`.
    pub separator: Option<u8>,
    /// Encodings tried in order.
    pub encodings: Vec<&'static Encoding>,
    /// Header names that indicate a correct decoding.
    pub expected_columns: Vec<String>,
    /// Minimum number of `expected_columns` the header must contain.
    pub min_expected_columns: usize,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            header_row: 0,
            separator: None,
            encodings: default_encodings(),
            expected_columns: Vec::new(),
            min_expected_columns: 0,
        }
    }
}

impl ReadOptions {
    pub fn with_header_row(mut self, header_row: usize) -> Self {
        self.header_row = header_row;
        self
    }

    pub fn with_separator(mut self, separator: Option<u8>) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_expected_columns<I, S>(mut self, columns: I, min_present: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_columns = columns.into_iter().map(Into::into).collect();
        self.min_expected_columns = min_present;
        self
    }
}

/// A decoded ledger table plus how it was read.
#[derive(Debug, Clone)]
pub struct RawTable {
    /// All columns are `String`; blank cells are null.
    pub data: DataFrame,
    /// Name of the encoding that produced `data`.
    pub encoding: &'static str,
    pub separator: u8,
    pub header_row: usize,
    pub path: PathBuf,
}

/// Check file size before loading.
pub fn check_file_size(path: &Path, max_size: u64) -> Result<u64> {
    let metadata = std::fs::metadata(path).map_err(|e| io_error(path, e))?;
    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }
    Ok(metadata.len())
}

fn io_error(path: &Path, e: std::io::Error) -> IngestError {
    if e.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        }
    }
}

/// Reads a delimited file into a DataFrame of string columns.
///
/// Each encoding in `options.encodings` is tried in turn. An attempt is
/// rejected when the bytes are malformed for the encoding, when the file has
/// fewer records than the header offset, or when the header holds fewer than
/// `min_expected_columns` of the expected names. When every attempt is
/// rejected the error lists the reason for each.
pub fn read_csv_flexible(path: &Path, options: &ReadOptions) -> Result<RawTable> {
    check_file_size(path, MAX_CSV_FILE_SIZE)?;
    let bytes = std::fs::read(path).map_err(|e| io_error(path, e))?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    let mut attempts = Vec::with_capacity(options.encodings.len());
    for &encoding in &options.encodings {
        let Some(text) = decode_with(&bytes, encoding) else {
            tracing::debug!(path = %path.display(), encoding = encoding.name(), "malformed bytes");
            attempts.push(format!("{}: malformed byte sequence", encoding.name()));
            continue;
        };

        let separator = options
            .separator
            .unwrap_or_else(|| sniff_separator(&text, options.header_row));

        match parse_table(&text, separator, options) {
            Ok(data) => {
                if attempts.is_empty() {
                    tracing::debug!(path = %path.display(), encoding = encoding.name(), "decoded");
                } else {
                    tracing::warn!(
                        path = %path.display(),
                        encoding = encoding.name(),
                        rejected = attempts.len(),
                        "decoded with fallback encoding"
                    );
                }
                tracing::info!(
                    path = %path.display(),
                    encoding = encoding.name(),
                    separator = %char::from(separator).escape_default(),
                    rows = data.height(),
                    columns = data.width(),
                    "CSV read"
                );
                return Ok(RawTable {
                    data,
                    encoding: encoding.name(),
                    separator,
                    header_row: options.header_row,
                    path: path.to_path_buf(),
                });
            }
            Err(reason) => {
                tracing::debug!(path = %path.display(), encoding = encoding.name(), %reason, "attempt rejected");
                attempts.push(format!("{}: {reason}", encoding.name()));
            }
        }
    }

    Err(IngestError::DataUnreadable {
        path: path.to_path_buf(),
        attempts,
    })
}

/// Parse decoded text into a DataFrame, or explain why the result is implausible.
fn parse_table(text: &str, separator: u8, options: &ReadOptions) -> std::result::Result<DataFrame, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(separator)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| format!("malformed CSV: {e}"))?;
        if record.len() == 1 && record.get(0).is_some_and(str::is_empty) {
            continue;
        }
        records.push(record);
    }

    let Some(header) = records.get(options.header_row) else {
        return Err(format!(
            "{} records, header expected at record {}",
            records.len(),
            options.header_row
        ));
    };
    let names = normalize_headers(header.iter());

    let matched = options
        .expected_columns
        .iter()
        .filter(|expected| names.iter().any(|name| name == *expected))
        .count();
    if matched < options.min_expected_columns {
        return Err(format!(
            "{} columns, {matched} of {} expected names found",
            names.len(),
            options.min_expected_columns
        ));
    }

    let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
    let mut overflow_rows = 0usize;
    for record in &records[options.header_row + 1..] {
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        if record.len() > names.len() {
            overflow_rows += 1;
        }
        for (idx, column) in values.iter_mut().enumerate() {
            let cell = record
                .get(idx)
                .map(str::trim)
                .filter(|cell| !cell.is_empty())
                .map(str::to_string);
            column.push(cell);
        }
    }
    if overflow_rows > 0 {
        tracing::debug!(rows = overflow_rows, "extra trailing fields ignored");
    }

    let columns: Vec<Column> = names
        .iter()
        .zip(values)
        .map(|(name, column)| Column::new(name.as_str().into(), column))
        .collect();
    DataFrame::new(columns).map_err(|e| e.to_string())
}
