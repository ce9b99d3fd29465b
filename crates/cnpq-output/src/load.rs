//! Reading the persisted unified dataset back.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use cnpq_common::{column_string_values, parse_f64, parse_i64};
use cnpq_model::{ColumnKind, column_kind};
use polars::prelude::{Column, CsvReadOptions, DataFrame, DataType, NamedFrom, SerReader, Series};

use crate::error::{OutputError, Result};
use crate::paths::{unified_csv_path, unified_parquet_path};

/// A dataset read from disk and where it came from.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub data: DataFrame,
    pub path: PathBuf,
}

/// Load the unified dataset from `dir`.
///
/// The Parquet file is preferred unless it is older than the CSV file.
/// Otherwise the CSV file is read with every column as text and the canonical
/// types are restored.
pub fn load_unified_dataset(dir: &Path) -> Result<LoadedDataset> {
    let parquet = unified_parquet_path(dir);
    let csv = unified_csv_path(dir);
    if crate::PARQUET_ENABLED && parquet.is_file() && !is_older(&parquet, &csv) {
        let data = read_parquet(&parquet)?;
        tracing::info!(path = %parquet.display(), rows = data.height(), "dataset loaded");
        return Ok(LoadedDataset {
            data,
            path: parquet,
        });
    }

    if csv.is_file() {
        let raw = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(csv.clone()))?
            .finish()?;
        let data = restore_types(&raw)?;
        tracing::info!(path = %csv.display(), rows = data.height(), "dataset loaded from CSV fallback");
        return Ok(LoadedDataset { data, path: csv });
    }

    tracing::error!(dir = %dir.display(), "no unified dataset found");
    Err(OutputError::DatasetNotFound {
        dir: dir.to_path_buf(),
    })
}

/// True when both files exist and `a` was modified before `b`.
fn is_older(a: &Path, b: &Path) -> bool {
    let modified = |path: &Path| std::fs::metadata(path).and_then(|m| m.modified()).ok();
    match (modified(a), modified(b)) {
        (Some(a), Some(b)) => a < b,
        _ => false,
    }
}

#[cfg(feature = "parquet")]
fn read_parquet(path: &Path) -> Result<DataFrame> {
    use polars::prelude::ParquetReader;

    let file = std::fs::File::open(path).map_err(|e| OutputError::io(path, e))?;
    Ok(ParquetReader::new(file).finish()?)
}

#[cfg(not(feature = "parquet"))]
fn read_parquet(_path: &Path) -> Result<DataFrame> {
    Err(OutputError::FormatUnavailable { format: "Parquet" })
}

/// Rebuild canonical dtypes on an all-text frame as written by the exporter.
fn restore_types(df: &DataFrame) -> Result<DataFrame> {
    let mut columns = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        let name = column.name().clone();
        let values = column_string_values(column);
        let series = match column_kind(name.as_str()) {
            Some(ColumnKind::Year) => {
                let years: Vec<Option<i32>> = values
                    .iter()
                    .map(|v| v.as_deref().and_then(parse_i64).and_then(|y| i32::try_from(y).ok()))
                    .collect();
                Series::new(name, years)
            }
            Some(ColumnKind::Currency) => {
                let amounts: Vec<Option<f64>> =
                    values.iter().map(|v| v.as_deref().and_then(parse_f64)).collect();
                Series::new(name, amounts)
            }
            Some(ColumnKind::Date) => {
                let days: Vec<Option<i32>> = values
                    .iter()
                    .map(|v| {
                        v.as_deref()
                            .and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
                            .and_then(|d| {
                                i32::try_from(d.signed_duration_since(NaiveDate::default()).num_days()).ok()
                            })
                    })
                    .collect();
                Series::new(name, days).cast(&DataType::Date)?
            }
            _ => Series::new(name, values),
        };
        columns.push(Column::from(series));
    }
    Ok(DataFrame::new(columns)?)
}
