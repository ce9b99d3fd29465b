//! Shared utilities for the CNPq payments crates.
//!
//! Every stage of the pipeline reads cells without trusting their physical
//! type: a raw ledger is all strings, a coerced frame is typed, and a dataset
//! re-read from CSV has whatever Polars inferred. The helpers here give each
//! stage a single, type-agnostic view of a cell.

mod values;

pub use values::{
    any_to_f64, any_to_i64, any_to_string, any_to_string_non_empty, column_f64_values,
    column_i64_values, column_string_values, non_empty_count, parse_f64,
    parse_i64,
};
