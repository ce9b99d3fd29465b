use std::collections::BTreeMap;

use cnpq_model::{CANONICAL_COLUMNS, ColumnMapping, is_canonical};
use polars::prelude::{Column, DataFrame, DataType};
use serde::Serialize;

use crate::error::Result;

/// What happened to each source column during normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MappingReport {
    /// Canonical field -> source column that filled it.
    pub mapped: BTreeMap<String, String>,
    /// Source columns outside the canonical schema.
    pub dropped: Vec<String>,
    /// Source columns whose canonical target was already filled.
    pub duplicates: Vec<String>,
    /// Canonical fields created as all-null.
    pub missing: Vec<String>,
}

/// Rename, filter and reorder `df` to the canonical schema.
pub fn normalize_columns(df: &DataFrame, mapping: &ColumnMapping) -> Result<DataFrame> {
    normalize_columns_with_report(df, mapping).map(|(data, _)| data)
}

/// Same as [`normalize_columns`] and also reports the column decisions.
///
/// Source names are trimmed before lookup. A name already in the canonical
/// schema maps to itself, so normalizing an already canonical table is a
/// no-op. When two source columns map to the same field the first one in
/// source order wins. Column values and dtypes are never touched.
pub fn normalize_columns_with_report(
    df: &DataFrame,
    mapping: &ColumnMapping,
) -> Result<(DataFrame, MappingReport)> {
    let mut report = MappingReport::default();
    let mut by_target: BTreeMap<&str, &Column> = BTreeMap::new();

    for column in df.get_columns() {
        let source = column.name().as_str();
        let trimmed = source.trim();
        let target = mapping
            .target(trimmed)
            .or_else(|| is_canonical(trimmed).then_some(trimmed));
        let Some(target) = target else {
            report.dropped.push(source.to_string());
            continue;
        };
        if by_target.contains_key(target) {
            report.duplicates.push(source.to_string());
            continue;
        }
        report.mapped.insert(target.to_string(), source.to_string());
        by_target.insert(target, column);
    }

    let height = df.height();
    let mut columns = Vec::with_capacity(CANONICAL_COLUMNS.len());
    for name in CANONICAL_COLUMNS {
        match by_target.get(name) {
            Some(column) => columns.push((*column).clone().with_name(name.into())),
            None => {
                report.missing.push(name.to_string());
                columns.push(Column::full_null(name.into(), height, &DataType::String));
            }
        }
    }

    if !report.dropped.is_empty() {
        tracing::debug!(columns = ?report.dropped, "unmapped source columns dropped");
    }
    if !report.duplicates.is_empty() {
        tracing::warn!(columns = ?report.duplicates, "duplicate source columns ignored");
    }
    tracing::debug!(
        mapped = report.mapped.len(),
        missing = report.missing.len(),
        "columns normalized"
    );

    let data = DataFrame::new(columns)?;
    Ok((data, report))
}
