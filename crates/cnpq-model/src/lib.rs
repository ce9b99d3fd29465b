//! Data model for the CNPq payments pipeline.
//!
//! This crate holds the pieces every other crate agrees on:
//!
//! - **Canonical schema**: the ordered field list every harmonized year is
//!   mapped into ([`CANONICAL_COLUMNS`]) and the semantic type of each field.
//! - **Source years**: the closed set of ledgers the pipeline knows how to read
//!   ([`SourceYear`]).
//! - **Column mappings**: one immutable rename table per source year
//!   ([`ColumnMapping`]).
//! - **Region selection**: the preference a consumer passes when aggregating by
//!   region ([`RegionPreference`], [`RegionColumn`]).

mod error;
mod mapping;
mod region;
mod schema;
mod year;

pub use error::{ModelError, Result};
pub use mapping::ColumnMapping;
pub use region::{RegionColumn, RegionPreference};
pub use schema::{
    CANONICAL_COLUMNS, ColumnKind, DATE_COLUMNS, FREE_TEXT_COLUMNS, KEY_COLUMNS, REGION_COLUMNS,
    UPPERCASE_COLUMNS, canonical_index, column_kind, columns, is_canonical,
};
pub use year::SourceYear;
