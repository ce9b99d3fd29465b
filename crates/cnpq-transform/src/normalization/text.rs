//! Categorical text cleanup.

/// Trims `value`, optionally upper-casing it. Blank input yields `None`.
pub fn normalize_text(value: &str, uppercase: bool) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if uppercase {
        Some(trimmed.to_uppercase())
    } else {
        Some(trimmed.to_string())
    }
}
