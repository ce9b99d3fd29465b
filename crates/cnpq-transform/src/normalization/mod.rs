//! Value-level parsers.
//!
//! Every parser takes raw text and returns `None` for anything it cannot
//! interpret. None of them panic or return a sentinel such as `0.0`.

pub mod currency;
pub mod datetime;
pub mod region;
pub mod text;
pub mod year;

pub use currency::parse_currency;
pub use datetime::{DATE_FORMATS, parse_date, parse_date_column};
pub use region::normalize_region;
pub use text::normalize_text;
pub use year::extract_year;
