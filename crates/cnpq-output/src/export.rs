//! Unified dataset export.

use std::path::{Path, PathBuf};

use cnpq_model::columns::ANO_REFERENCIA;
use polars::prelude::{CsvWriter, DataFrame, SerWriter};

use crate::error::Result;
use crate::paths::{ensure_dir, unified_csv_path, unified_parquet_path, write_atomically};

/// What happened to the optional Parquet copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParquetStatus {
    Written(PathBuf),
    /// Writing failed; the CSV copy is still valid.
    Failed(String),
    /// The build has no Parquet support or it was not requested.
    Skipped,
}

/// Files produced by [`write_unified_dataset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub csv: PathBuf,
    pub parquet: ParquetStatus,
}

/// Move the reference-year column to the front, keeping the rest in order.
fn year_first(df: &DataFrame) -> Result<DataFrame> {
    let names = df.get_column_names_str();
    if names.first().is_none_or(|first| *first == ANO_REFERENCIA)
        || !names.contains(&ANO_REFERENCIA)
    {
        return Ok(df.clone());
    }
    let ordered: Vec<String> = std::iter::once(ANO_REFERENCIA)
        .chain(names.iter().copied().filter(|name| *name != ANO_REFERENCIA))
        .map(str::to_string)
        .collect();
    Ok(df.select(ordered)?)
}

/// Persist the unified dataset into `dir`.
///
/// The CSV file is mandatory and any failure writing it is returned. The
/// Parquet copy is attempted afterwards when `write_parquet` is set; its
/// failure is logged and reported in the outcome without failing the call.
pub fn write_unified_dataset(df: &DataFrame, dir: &Path, write_parquet: bool) -> Result<ExportOutcome> {
    ensure_dir(dir)?;
    let mut data = year_first(df)?;

    let csv = unified_csv_path(dir);
    write_atomically(&csv, |file| {
        CsvWriter::new(file).include_header(true).finish(&mut data)?;
        Ok(())
    })?;
    tracing::info!(path = %csv.display(), rows = data.height(), "CSV written");

    let parquet = if write_parquet {
        write_parquet_copy(&mut data, dir)
    } else {
        ParquetStatus::Skipped
    };
    if !matches!(parquet, ParquetStatus::Written(_)) {
        remove_stale_parquet(dir);
    }

    Ok(ExportOutcome { csv, parquet })
}

/// Drop a Parquet copy left by an earlier run so it cannot shadow the CSV
/// just written.
fn remove_stale_parquet(dir: &Path) {
    let path = unified_parquet_path(dir);
    match std::fs::remove_file(&path) {
        Ok(()) => tracing::info!(path = %path.display(), "stale Parquet copy removed"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "could not remove stale Parquet copy"),
    }
}

#[cfg(feature = "parquet")]
fn write_parquet_copy(data: &mut DataFrame, dir: &Path) -> ParquetStatus {
    use polars::prelude::{ParquetCompression, ParquetWriter};

    let path = unified_parquet_path(dir);
    let result = write_atomically(&path, |file| {
        ParquetWriter::new(file)
            .with_compression(ParquetCompression::Snappy)
            .finish(data)?;
        Ok(())
    });
    match result {
        Ok(()) => {
            tracing::info!(path = %path.display(), "Parquet written");
            ParquetStatus::Written(path)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Parquet export failed; CSV kept");
            ParquetStatus::Failed(e.to_string())
        }
    }
}

#[cfg(not(feature = "parquet"))]
fn write_parquet_copy(_data: &mut DataFrame, dir: &Path) -> ParquetStatus {
    tracing::debug!(path = %unified_parquet_path(dir).display(), "Parquet support not built; skipped");
    ParquetStatus::Skipped
}
