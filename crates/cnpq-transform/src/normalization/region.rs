//! Federative-unit (UF) code cleanup.

/// Length of a UF code.
const REGION_CODE_LEN: usize = 2;

/// Normalizes a UF code: upper-case ASCII letters only, at most two.
///
/// `" sp "`, `"S.P."` and `"sp-"` all become `"SP"`. Input without letters
/// yields `None`.
pub fn normalize_region(value: &str) -> Option<String> {
    let code: String = value
        .chars()
        .map(|c| c.to_ascii_uppercase())
        .filter(char::is_ascii_uppercase)
        .take(REGION_CODE_LEN)
        .collect();
    if code.is_empty() { None } else { Some(code) }
}
