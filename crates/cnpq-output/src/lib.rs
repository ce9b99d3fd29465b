//! Persistence of the unified ledger.
//!
//! - [`write_unified_dataset`]: CSV (always) and Parquet (when the `parquet`
//!   feature is enabled) written through a temporary file and renamed into
//!   place
//! - [`save_year`] / [`load_year_if_exists`]: per-year Parquet cache of
//!   harmonized tables
//! - [`load_unified_dataset`]: reads the persisted dataset back, preferring
//!   Parquet and falling back to CSV

mod cache;
mod error;
mod export;
mod load;
mod paths;

pub use cache::{load_year_if_exists, save_year};
pub use error::{OutputError, Result};
pub use export::{ExportOutcome, ParquetStatus, write_unified_dataset};
pub use load::{LoadedDataset, load_unified_dataset};
pub use paths::{UNIFIED_BASENAME, unified_csv_path, unified_parquet_path, yearly_cache_path};

/// Whether this build can read and write Parquet.
pub const PARQUET_ENABLED: bool = cfg!(feature = "parquet");
