//! Ledger ingestion utilities.
//!
//! This crate finds the three annual payment ledgers in a raw-data folder and
//! reads each one into a Polars DataFrame of string columns, absorbing the
//! differences between exports.
//!
//! # Features
//!
//! - **File discovery**: classify raw files by name into 2022/2023/2024 ledgers
//! - **Encoding fallback**: UTF-8 (with or without BOM), then Windows-1252
//! - **Separator detection**: sniff `,` `;` tab `|` unless a year forces one
//! - **Header offsets**: skip the banner rows some exports put above the header
//! - **Plausibility check**: reject tables that do not look like the ledger
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use cnpq_ingest::{discover_raw_files, read_year};
//!
//! let files = discover_raw_files(Path::new("data/raw"))?;
//! for (year, path) in files.iter() {
//!     let table = read_year(year, path)?;
//!     println!("{year}: {} rows via {}", table.data.height(), table.encoding);
//! }
//! ```

mod csv;
mod discovery;
mod error;
mod profile;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::{
    MAX_CSV_FILE_SIZE, RawTable, ReadOptions, SNIFF_CANDIDATES, check_file_size, decode_with,
    default_encodings, read_csv_flexible, sniff_separator,
};

// === File Discovery ===
pub use discovery::{RawFiles, discover_raw_files, list_files};

// === Year Readers ===
pub use profile::{MIN_MAPPED_COLUMNS, ReaderProfile, read_ledger, read_year};
