//! Per-year cache of harmonized tables.
//!
//! A harmonized year is saved as `cnpq_pagamentos_<year>.parquet` so later
//! runs can skip reading and coercing the raw export. The cache is Parquet
//! only; builds without the `parquet` feature never hit it.

use std::path::{Path, PathBuf};

use cnpq_model::SourceYear;
use polars::prelude::DataFrame;

use crate::error::Result;
use crate::paths::yearly_cache_path;

/// Save a harmonized year into `dir`.
#[cfg(feature = "parquet")]
pub fn save_year(df: &DataFrame, dir: &Path, year: SourceYear) -> Result<PathBuf> {
    use polars::prelude::{ParquetCompression, ParquetWriter};

    use crate::paths::write_atomically;

    let path = yearly_cache_path(dir, year);
    let mut data = df.clone();
    write_atomically(&path, |file| {
        ParquetWriter::new(file)
            .with_compression(ParquetCompression::Snappy)
            .finish(&mut data)?;
        Ok(())
    })?;
    tracing::info!(year = %year, path = %path.display(), rows = df.height(), "year cached");
    Ok(path)
}

/// Save a harmonized year into `dir`.
#[cfg(not(feature = "parquet"))]
pub fn save_year(_df: &DataFrame, _dir: &Path, _year: SourceYear) -> Result<PathBuf> {
    Err(crate::error::OutputError::FormatUnavailable { format: "Parquet" })
}

/// Load a cached year from `dir`, or `None` when no cache file exists.
#[cfg(feature = "parquet")]
pub fn load_year_if_exists(dir: &Path, year: SourceYear) -> Result<Option<DataFrame>> {
    use polars::prelude::{ParquetReader, SerReader};

    use crate::error::OutputError;

    let path = yearly_cache_path(dir, year);
    if !path.is_file() {
        return Ok(None);
    }
    let file = std::fs::File::open(&path).map_err(|e| OutputError::io(&path, e))?;
    let df = ParquetReader::new(file).finish()?;
    tracing::info!(year = %year, path = %path.display(), rows = df.height(), "year loaded from cache");
    Ok(Some(df))
}

/// Load a cached year from `dir`, or `None` when no cache file exists.
#[cfg(not(feature = "parquet"))]
pub fn load_year_if_exists(dir: &Path, year: SourceYear) -> Result<Option<DataFrame>> {
    let path = yearly_cache_path(dir, year);
    tracing::debug!(year = %year, path = %path.display(), "Parquet support not built; cache disabled");
    Ok(None)
}
