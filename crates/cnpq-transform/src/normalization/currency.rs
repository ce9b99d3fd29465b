//! Monetary text parsing for Brazilian and US conventions.

/// Parses a monetary amount such as `R$ 1.234,56`, `$ 8,100.00` or `600,00`.
///
/// Surrounding whitespace (including non-breaking spaces), quotes and the
/// `R$`/`$` symbols are removed first. The decimal separator is whichever of
/// `,` and `.` occurs last; the other one is a thousands separator. When only
/// one kind appears, a final group of exactly three digits marks it as a
/// thousands separator, otherwise it is the decimal point.
///
/// Returns `None` for blank input and for anything that is not a number
/// under either convention.
///
/// # Examples
///
/// ```
/// use cnpq_transform::parse_currency;
///
/// assert_eq!(parse_currency("R$ 1.234,56"), Some(1234.56));
/// assert_eq!(parse_currency("1,234.56"), Some(1234.56));
/// assert_eq!(parse_currency("600,00"), Some(600.0));
/// assert_eq!(parse_currency("1.500"), Some(1500.0));
/// assert_eq!(parse_currency("N/D"), None);
/// ```
pub fn parse_currency(raw: &str) -> Option<f64> {
    let without_symbol = raw.replace("R$", "");
    let cleaned: String = without_symbol
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '"' | '\'' | '$'))
        .collect();

    let (negative, body) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.') {
        return None;
    }

    let normalized = match (body.rfind(','), body.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => body.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => body.replace(',', ""),
        (Some(pos), None) => single_separator(body, pos, ',')?,
        (None, Some(pos)) => single_separator(body, pos, '.')?,
        (None, None) => body.to_string(),
    };

    let value: f64 = normalized.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Resolve a number that uses a single separator kind.
fn single_separator(body: &str, last: usize, sep: char) -> Option<String> {
    let trailing = body.len() - last - 1;
    let occurrences = body.matches(sep).count();
    if trailing == 3 {
        return Some(body.replace(sep, ""));
    }
    if occurrences > 1 {
        return None;
    }
    Some(body.replace(sep, "."))
}
