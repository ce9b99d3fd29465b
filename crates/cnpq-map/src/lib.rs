//! Column normalization for annual ledgers.
//!
//! Every source year names its columns differently. [`normalize_columns`]
//! renames them through the year's [`ColumnMapping`](cnpq_model::ColumnMapping),
//! drops everything outside the canonical schema and lays the result out in
//! canonical order, creating all-null columns for fields the source lacks.

mod error;
mod normalize;

pub use error::{MapError, Result};
pub use normalize::{MappingReport, normalize_columns, normalize_columns_with_report};
