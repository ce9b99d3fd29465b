//! The end-to-end pipeline driver.

use std::path::Path;
use std::time::Instant;

use cnpq_ingest::discover_raw_files;
use cnpq_map::MappingReport;
use cnpq_model::{CANONICAL_COLUMNS, SourceYear};
use cnpq_output::{
    ExportOutcome, OutputError, load_year_if_exists, save_year, write_unified_dataset,
};
use cnpq_transform::{CoercionReport, UnifySummary, unify};
use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::{info, info_span, warn};

use crate::config::{FailurePolicy, PipelineConfig};
use crate::error::{HarmonizeError, PipelineError};
use crate::harmonize::{HarmonizedYear, harmonize_frame, harmonize_year};

/// How one year went.
#[derive(Debug, Clone, Serialize)]
pub struct YearOutcome {
    pub year: SourceYear,
    pub rows: usize,
    pub from_cache: bool,
    pub encoding: Option<&'static str>,
    pub coercion: CoercionReport,
    pub mapping: Option<MappingReport>,
}

impl From<&HarmonizedYear> for YearOutcome {
    fn from(year: &HarmonizedYear) -> Self {
        Self {
            year: year.year,
            rows: year.data.height(),
            from_cache: year.from_cache,
            encoding: year.encoding,
            coercion: year.coercion.clone(),
            mapping: year.mapping.clone(),
        }
    }
}

/// A year that could not be harmonized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearFailure {
    pub year: SourceYear,
    pub message: String,
}

impl From<&HarmonizeError> for YearFailure {
    fn from(err: &HarmonizeError) -> Self {
        Self {
            year: err.year(),
            message: err.to_string(),
        }
    }
}

/// Everything a pipeline run produced.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub years: Vec<YearOutcome>,
    /// Years skipped under [`FailurePolicy::Continue`].
    pub failures: Vec<YearFailure>,
    pub unified: UnifySummary,
    pub export: ExportOutcome,
    pub dataset: DataFrame,
}

impl PipelineResult {
    /// True when every source year made it into the dataset.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Discover, harmonize, unify and export the three ledgers.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineResult, PipelineError> {
    let run_start = Instant::now();
    let files = info_span!("discover", raw_dir = %config.raw_dir.display())
        .in_scope(|| discover_raw_files(&config.raw_dir))
        .map_err(PipelineError::Discovery)?;

    let cache_dir = config.cache_dir();
    let mut harmonized = Vec::new();
    let mut errors = Vec::new();
    for (year, path) in files.iter() {
        let result = info_span!("harmonize", year = %year)
            .in_scope(|| harmonize_cached(year, path, config, &cache_dir));
        match result {
            Ok(table) => harmonized.push(table),
            Err(err) => {
                tracing::error!(year = %year, error = %err, "year failed");
                match config.failure_policy {
                    FailurePolicy::Abort => return Err(err.into()),
                    FailurePolicy::Continue => errors.push(err),
                }
            }
        }
    }

    if harmonized.is_empty() {
        return Err(PipelineError::NoYears { failures: errors });
    }
    let failures: Vec<YearFailure> = errors.iter().map(YearFailure::from).collect();
    if !failures.is_empty() {
        warn!(
            failed = ?failures.iter().map(|f| f.year).collect::<Vec<_>>(),
            "unifying a partial set of years"
        );
    }

    let unified = info_span!("unify").in_scope(|| {
        let start = Instant::now();
        let tables: Vec<DataFrame> = harmonized.iter().map(|h| h.data.clone()).collect();
        let unified = unify(&tables).map_err(PipelineError::Unify)?;
        info!(
            rows = unified.data.height(),
            dropped_rows = unified.dropped_rows,
            duration_ms = start.elapsed().as_millis(),
            "unify complete"
        );
        Ok::<_, PipelineError>(unified)
    })?;

    let export = info_span!("export", output_dir = %config.output_dir.display()).in_scope(|| {
        let start = Instant::now();
        let outcome =
            write_unified_dataset(&unified.data, &config.output_dir, config.write_parquet)?;
        info!(
            csv = %outcome.csv.display(),
            duration_ms = start.elapsed().as_millis(),
            "export complete"
        );
        Ok::<_, PipelineError>(outcome)
    })?;

    info!(
        years = harmonized.len(),
        failed = failures.len(),
        rows = unified.data.height(),
        duration_ms = run_start.elapsed().as_millis(),
        "pipeline complete"
    );

    Ok(PipelineResult {
        years: harmonized.iter().map(YearOutcome::from).collect(),
        failures,
        unified: unified.summary(),
        export,
        dataset: unified.data,
    })
}

/// Harmonize `year`, going through the yearly cache when enabled.
///
/// A cache entry that cannot be read or is not in canonical layout is
/// ignored and the raw file is harmonized instead. Failing to write the
/// cache never fails the year.
fn harmonize_cached(
    year: SourceYear,
    path: &Path,
    config: &PipelineConfig,
    cache_dir: &Path,
) -> Result<HarmonizedYear, HarmonizeError> {
    if config.use_cache {
        match load_year_if_exists(cache_dir, year) {
            Ok(Some(cached)) if cached.get_column_names_str() == CANONICAL_COLUMNS => {
                let mut table = harmonize_frame(year, &cached)?;
                table.mapping = None;
                table.from_cache = true;
                return Ok(table);
            }
            Ok(Some(_)) => warn!(year = %year, "cached table is not canonical; ignoring"),
            Ok(None) => {}
            Err(e) => warn!(year = %year, error = %e, "cache read failed; ignoring"),
        }
    }

    let table = harmonize_year(year, path)?;

    if config.use_cache {
        match save_year(&table.data, cache_dir, year) {
            Ok(_) => {}
            Err(OutputError::FormatUnavailable { .. }) => {
                tracing::debug!(year = %year, "yearly cache unavailable in this build");
            }
            Err(e) => warn!(year = %year, error = %e, "cache write failed"),
        }
    }
    Ok(table)
}
