//! Output file naming and the write-then-rename helper.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use cnpq_model::SourceYear;

use crate::error::{OutputError, Result};

/// Base name of the unified dataset files.
pub const UNIFIED_BASENAME: &str = "cnpq_pagamentos_2022_2024";

pub fn unified_csv_path(dir: &Path) -> PathBuf {
    dir.join(format!("{UNIFIED_BASENAME}.csv"))
}

pub fn unified_parquet_path(dir: &Path) -> PathBuf {
    dir.join(format!("{UNIFIED_BASENAME}.parquet"))
}

/// Cache file for one harmonized year.
pub fn yearly_cache_path(dir: &Path, year: SourceYear) -> PathBuf {
    dir.join(format!("cnpq_pagamentos_{year}.parquet"))
}

/// Ensure an output directory exists.
pub(crate) fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| OutputError::io(dir, e))
}

/// Write `path` by filling a sibling temporary file and renaming it over
/// the destination, so readers never observe a half-written file.
pub(crate) fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_dir(parent)?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let result = File::create(&tmp_path)
        .map_err(|e| OutputError::io(&tmp_path, e))
        .and_then(|mut file| {
            write(&mut file)?;
            file.sync_all().map_err(|e| OutputError::io(&tmp_path, e))
        })
        .and_then(|()| fs::rename(&tmp_path, path).map_err(|e| OutputError::io(path, e)));

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}
