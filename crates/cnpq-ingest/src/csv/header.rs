//! Header cell normalization.

/// Normalizes a header cell: strips a stray BOM, trims, and collapses
/// internal whitespace runs to a single space.
pub fn normalize_header(value: &str) -> String {
    let value = value.trim_start_matches('\u{feff}');
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes a whole header row.
///
/// Blank names become `Unnamed: <index>` and repeated names get a `.<n>`
/// suffix so every column name is unique.
pub fn normalize_headers<'a>(cells: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for (idx, cell) in cells.into_iter().enumerate() {
        let mut name = normalize_header(cell);
        if name.is_empty() {
            name = format!("Unnamed: {idx}");
        }
        if names.contains(&name) {
            let base = name;
            let mut n = 1;
            loop {
                let candidate = format!("{base}.{n}");
                if !names.contains(&candidate) {
                    name = candidate;
                    break;
                }
                n += 1;
            }
        }
        names.push(name);
    }
    names
}
