//! Serializable reports printed by the CLI.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use cnpq_core::{PipelineResult, YearFailure, YearOutcome};
use cnpq_model::SourceYear;
use cnpq_output::ParquetStatus;
use serde::Serialize;

/// Outcome of `build`, shaped for tables and `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub years: Vec<YearSummary>,
    pub failures: Vec<YearFailure>,
    pub rows: usize,
    pub dropped_rows: usize,
    pub rows_per_year: BTreeMap<i32, usize>,
    pub csv: PathBuf,
    pub parquet: Option<PathBuf>,
    pub parquet_error: Option<String>,
    pub complete: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct YearSummary {
    pub year: SourceYear,
    pub rows: usize,
    pub from_cache: bool,
    pub encoding: Option<&'static str>,
    /// Values that became null during coercion, per column; zero counts omitted.
    pub anomalies: BTreeMap<String, usize>,
    pub years_recognised: BTreeSet<i32>,
    pub unmapped_columns: Vec<String>,
}

impl YearSummary {
    pub fn total_anomalies(&self) -> usize {
        self.anomalies.values().sum()
    }
}

impl From<&YearOutcome> for YearSummary {
    fn from(outcome: &YearOutcome) -> Self {
        let anomalies = outcome
            .coercion
            .columns
            .iter()
            .map(|(name, diagnostics)| (name.clone(), diagnostics.anomalies()))
            .filter(|(_, count)| *count > 0)
            .collect();
        Self {
            year: outcome.year,
            rows: outcome.rows,
            from_cache: outcome.from_cache,
            encoding: outcome.encoding,
            anomalies,
            years_recognised: outcome.coercion.years.clone(),
            unmapped_columns: outcome
                .mapping
                .as_ref()
                .map(|mapping| mapping.dropped.clone())
                .unwrap_or_default(),
        }
    }
}

impl From<&PipelineResult> for BuildReport {
    fn from(result: &PipelineResult) -> Self {
        let (parquet, parquet_error) = match &result.export.parquet {
            ParquetStatus::Written(path) => (Some(path.clone()), None),
            ParquetStatus::Failed(message) => (None, Some(message.clone())),
            ParquetStatus::Skipped => (None, None),
        };
        Self {
            years: result.years.iter().map(YearSummary::from).collect(),
            failures: result.failures.clone(),
            rows: result.unified.rows,
            dropped_rows: result.unified.dropped_rows,
            rows_per_year: result.unified.rows_per_year.clone(),
            csv: result.export.csv.clone(),
            parquet,
            parquet_error,
            complete: result.is_complete(),
        }
    }
}
