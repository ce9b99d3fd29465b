//! Harmonization and the end-to-end ledger pipeline.
//!
//! [`harmonize_year`] turns one raw export into a canonical, typed table:
//! read with the year's profile, map columns, coerce values.
//! [`run_pipeline`] does that for every year, reuses the yearly cache,
//! unifies the years and exports the result.

mod config;
mod error;
mod harmonize;
mod pipeline;

pub use config::{FailurePolicy, PipelineConfig};
pub use error::{HarmonizeError, PipelineError};
pub use harmonize::{HarmonizedYear, harmonize_frame, harmonize_year};
pub use pipeline::{PipelineResult, YearFailure, YearOutcome, run_pipeline};
