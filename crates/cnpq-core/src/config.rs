//! Pipeline configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// What the pipeline does when one year fails to harmonize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the run at the first failing year.
    #[default]
    Abort,
    /// Report the failure and unify the remaining years.
    Continue,
}

/// Runtime settings for [`run_pipeline`](crate::run_pipeline).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Folder holding the three raw ledgers.
    pub raw_dir: PathBuf,
    /// Folder receiving the unified dataset.
    pub output_dir: PathBuf,
    /// Yearly cache folder; `<output_dir>/yearly` when unset.
    pub cache_dir: Option<PathBuf>,
    pub use_cache: bool,
    pub write_parquet: bool,
    pub failure_policy: FailurePolicy,
}

impl PipelineConfig {
    pub fn new(raw_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
            output_dir: output_dir.into(),
            cache_dir: None,
            use_cache: true,
            write_parquet: true,
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(cache_dir.into());
        self
    }

    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn with_parquet(mut self, write_parquet: bool) -> Self {
        self.write_parquet = write_parquet;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Effective cache folder.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(|| default_cache_dir(&self.output_dir))
    }
}

fn default_cache_dir(output_dir: &Path) -> PathBuf {
    output_dir.join("yearly")
}
