//! Type coercion and unification of canonical ledger tables.
//!
//! - [`normalization`]: per-value parsers for currency, dates, text, region
//!   codes and reference years
//! - [`coerce_types`]: applies the parsers column by column and reports how
//!   many values became null
//! - [`unify`]: stacks the yearly tables, drops keyless rows and sorts

mod coerce;
mod error;
pub mod normalization;
mod unify;

pub use coerce::{CoercedFrame, CoercionReport, ColumnDiagnostics, coerce_types};
pub use error::{Result, TransformError};
pub use normalization::{
    DATE_FORMATS, extract_year, normalize_region, normalize_text, parse_currency, parse_date,
    parse_date_column,
};
pub use unify::{UnifiedDataset, UnifySummary, unify};
