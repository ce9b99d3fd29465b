//! Error types for harmonization and the pipeline driver.

use cnpq_ingest::IngestError;
use cnpq_map::MapError;
use cnpq_model::SourceYear;
use cnpq_output::OutputError;
use cnpq_transform::TransformError;
use thiserror::Error;

/// A single year failed to harmonize.
#[derive(Debug, Error)]
pub enum HarmonizeError {
    #[error("{year}: read failed: {source}")]
    Ingest {
        year: SourceYear,
        #[source]
        source: IngestError,
    },

    #[error("{year}: column mapping failed: {source}")]
    Map {
        year: SourceYear,
        #[source]
        source: MapError,
    },

    #[error("{year}: type coercion failed: {source}")]
    Transform {
        year: SourceYear,
        #[source]
        source: TransformError,
    },
}

impl HarmonizeError {
    /// The year that failed.
    pub fn year(&self) -> SourceYear {
        match self {
            Self::Ingest { year, .. } | Self::Map { year, .. } | Self::Transform { year, .. } => {
                *year
            }
        }
    }
}

/// The pipeline could not produce a unified dataset.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The raw ledgers could not be located.
    #[error("discovery failed: {0}")]
    Discovery(#[source] IngestError),

    /// A year failed under the abort policy.
    #[error("harmonization aborted: {0}")]
    Harmonize(#[from] HarmonizeError),

    /// Every year failed under the continue policy.
    #[error("no year could be harmonized ({} failures)", failures.len())]
    NoYears { failures: Vec<HarmonizeError> },

    #[error("unification failed: {0}")]
    Unify(#[source] TransformError),

    #[error("export failed: {0}")]
    Export(#[from] OutputError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn harmonize_error_names_the_year() {
        let err = HarmonizeError::Ingest {
            year: SourceYear::Y2023,
            source: IngestError::FileNotFound {
                path: PathBuf::from("x.csv"),
            },
        };
        assert_eq!(err.year(), SourceYear::Y2023);
        assert_eq!(err.to_string(), "2023: read failed: file not found: x.csv");
    }
}
