//! Reference-year extraction.

use std::sync::LazyLock;

use regex::Regex;

static FOUR_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{4}").expect("Invalid year regex"));

/// Returns the first four consecutive ASCII digits in `value` as a year.
///
/// # Examples
///
/// ```
/// use cnpq_transform::extract_year;
///
/// assert_eq!(extract_year("2022"), Some(2022));
/// assert_eq!(extract_year("Jan-Dez2022"), Some(2022));
/// assert_eq!(extract_year("sem ano"), None);
/// ```
pub fn extract_year(value: &str) -> Option<i32> {
    FOUR_DIGITS
        .find(value)
        .and_then(|m| m.as_str().parse().ok())
}
