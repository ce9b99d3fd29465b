//! Per-year reader profiles.
//!
//! Each annual export has its own layout quirks. A [`ReaderProfile`] captures
//! them so the reader itself stays generic.

use std::path::Path;

use cnpq_model::{ColumnMapping, SourceYear};
use encoding_rs::Encoding;

use crate::csv::{RawTable, ReadOptions, default_encodings, read_csv_flexible};
use crate::error::Result;

/// Minimum number of mapping source headers a decoded header must contain.
pub const MIN_MAPPED_COLUMNS: usize = 3;

/// Layout of one annual ledger export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderProfile {
    pub year: SourceYear,
    /// Banner rows above the header.
    pub header_row: usize,
    /// Separator forced for this export; sniffed when `None`.
    pub separator: Option<u8>,
}

impl ReaderProfile {
    /// Profile for `year`.
    pub fn for_year(year: SourceYear) -> Self {
        let (header_row, separator) = match year {
            SourceYear::Y2022 => (5, None),
            SourceYear::Y2023 => (7, None),
            SourceYear::Y2024 => (0, Some(b';')),
        };
        Self {
            year,
            header_row,
            separator,
        }
    }

    /// Encodings tried for this export.
    pub fn encodings(&self) -> Vec<&'static Encoding> {
        default_encodings()
    }

    /// Reader options with the year's mapping as the plausibility check.
    pub fn read_options(&self) -> ReadOptions {
        ReadOptions {
            header_row: self.header_row,
            separator: self.separator,
            encodings: self.encodings(),
            ..ReadOptions::default()
        }
        .with_expected_columns(self.year.mapping().sources(), MIN_MAPPED_COLUMNS)
    }
}

/// Read the ledger of `year` at `path` using the year's profile.
pub fn read_year(year: SourceYear, path: &Path) -> Result<RawTable> {
    let profile = ReaderProfile::for_year(year);
    let _span = tracing::info_span!("read_year", year = %year, path = %path.display()).entered();
    read_csv_flexible(path, &profile.read_options())
}

/// Read a ledger with an explicit layout.
///
/// `mapping` supplies the header names used to judge whether a decoding is
/// plausible.
pub fn read_ledger(
    path: &Path,
    header_row: usize,
    separator: Option<u8>,
    mapping: &ColumnMapping,
) -> Result<RawTable> {
    let options = ReadOptions::default()
        .with_header_row(header_row)
        .with_separator(separator)
        .with_expected_columns(mapping.sources(), MIN_MAPPED_COLUMNS);
    read_csv_flexible(path, &options)
}
