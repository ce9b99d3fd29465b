//! Read-only queries over the unified ledger.
//!
//! Nothing here mutates the dataset; every function reads the columns it
//! needs and returns plain Rust values ready for display or serialization.

mod accessor;
mod aggregate;
mod error;
mod notes;
mod view;

pub use accessor::{
    RegionMean, choose_region_column, list_available_years, mean_value_by_region, region_means,
};
pub use aggregate::{
    AreaLevel, CategoryMetric, CategoryValue, GroupTotal, YearCategoryMean, invest_by_category,
    time_mean_by_category, total_by_area, total_by_region,
};
pub use error::{QueryError, Result};
pub use notes::dataset_notes;
