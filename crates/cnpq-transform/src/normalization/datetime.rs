//! Date parsing for the process start/end columns.
//!
//! The ledgers write dates day-first (`05/03/2022`), ISO style
//! (`2022-03-05`) or with a trailing time. Only the calendar date is kept.

use chrono::{NaiveDate, NaiveDateTime};

/// Known layouts in priority order. The flag marks layouts with a time part.
pub const DATE_FORMATS: [(&str, bool); 8] = [
    ("%d/%m/%Y", false),
    ("%d/%m/%Y %H:%M:%S", true),
    ("%d/%m/%Y %H:%M", true),
    ("%Y-%m-%d", false),
    ("%Y-%m-%d %H:%M:%S", true),
    ("%Y-%m-%d %H:%M:%S%.f", true),
    ("%Y-%m-%dT%H:%M:%S", true),
    ("%d-%m-%Y", false),
];

fn parse_with(value: &str, format: &str, has_time: bool) -> Option<NaiveDate> {
    if has_time {
        NaiveDateTime::parse_from_str(value, format)
            .ok()
            .map(|dt| dt.date())
    } else {
        NaiveDate::parse_from_str(value, format).ok()
    }
}

/// Parse a single date, trying every known layout in order.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|(format, has_time)| parse_with(trimmed, format, *has_time))
}

/// Parse a whole column of dates.
///
/// The first layout that parses every non-null value is used for the whole
/// column, so one layout is never mixed with another that happens to accept
/// the same text differently. When no single layout fits, each value is
/// parsed on its own and values matching no layout become `None`.
///
/// Returns the parsed values and the layout chosen for the column, if any.
pub fn parse_date_column(values: &[Option<String>]) -> (Vec<Option<NaiveDate>>, Option<&'static str>) {
    let present: Vec<&str> = values.iter().flatten().map(String::as_str).map(str::trim).collect();
    if present.is_empty() {
        return (vec![None; values.len()], None);
    }

    let uniform = DATE_FORMATS.iter().find(|(format, has_time)| {
        present
            .iter()
            .all(|value| parse_with(value, format, *has_time).is_some())
    });

    match uniform {
        Some(&(format, has_time)) => {
            let parsed = values
                .iter()
                .map(|v| v.as_deref().and_then(|v| parse_with(v.trim(), format, has_time)))
                .collect();
            (parsed, Some(format))
        }
        None => {
            let parsed = values
                .iter()
                .map(|v| v.as_deref().and_then(parse_date))
                .collect();
            (parsed, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn day_first_is_preferred() {
        assert_eq!(parse_date("05/03/2022"), ymd(2022, 3, 5));
        assert_eq!(parse_date("2022-03-05"), ymd(2022, 3, 5));
        assert_eq!(parse_date("05/03/2022 14:30:00"), ymd(2022, 3, 5));
        assert_eq!(parse_date("2022-03-05T08:00:00"), ymd(2022, 3, 5));
        assert_eq!(parse_date("2022-03-05 08:00:00.000"), ymd(2022, 3, 5));
    }

    #[test]
    fn unparseable_is_none() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("31/02/2022"), None);
        assert_eq!(parse_date("ontem"), None);
    }

    #[test]
    fn column_uses_single_layout_when_possible() {
        let values = vec![
            Some("01/02/2022".to_string()),
            None,
            Some("28/12/2022".to_string()),
        ];
        let (parsed, format) = parse_date_column(&values);
        assert_eq!(format, Some("%d/%m/%Y"));
        assert_eq!(parsed, vec![ymd(2022, 2, 1), None, ymd(2022, 12, 28)]);
    }

    #[test]
    fn mixed_column_falls_back_per_value() {
        let values = vec![
            Some("01/02/2022".to_string()),
            Some("2022-02-03".to_string()),
            Some("sem data".to_string()),
        ];
        let (parsed, format) = parse_date_column(&values);
        assert_eq!(format, None);
        assert_eq!(parsed, vec![ymd(2022, 2, 1), ymd(2022, 2, 3), None]);
    }

    #[test]
    fn empty_column() {
        let (parsed, format) = parse_date_column(&[None, None]);
        assert_eq!(parsed, vec![None, None]);
        assert_eq!(format, None);
    }
}
