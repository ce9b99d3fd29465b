//! Multi-year unification.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use cnpq_common::{column_i64_values, column_string_values};
use cnpq_model::{CANONICAL_COLUMNS, KEY_COLUMNS};
use polars::prelude::{DataFrame, IdxCa, IdxSize};
use serde::Serialize;

use crate::error::{Result, TransformError};

/// The stacked, filtered and sorted multi-year table.
#[derive(Debug, Clone)]
pub struct UnifiedDataset {
    pub data: DataFrame,
    /// Rows removed because both key fields were empty.
    pub dropped_rows: usize,
    /// Row count per reference year; rows without a year are not counted.
    pub rows_per_year: BTreeMap<i32, usize>,
}

/// Summary of a [`UnifiedDataset`] for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnifySummary {
    pub rows: usize,
    pub dropped_rows: usize,
    pub rows_per_year: BTreeMap<i32, usize>,
}

impl UnifiedDataset {
    pub fn summary(&self) -> UnifySummary {
        UnifySummary {
            rows: self.data.height(),
            dropped_rows: self.dropped_rows,
            rows_per_year: self.rows_per_year.clone(),
        }
    }
}

/// Check that `df` has exactly the canonical columns in canonical order.
fn check_layout(index: usize, df: &DataFrame) -> Result<()> {
    let names = df.get_column_names_str();
    if names != CANONICAL_COLUMNS {
        return Err(TransformError::SchemaMismatch {
            table: index,
            detail: format!("expected {} canonical columns, found [{}]", CANONICAL_COLUMNS.len(), names.join(", ")),
        });
    }
    Ok(())
}

/// Check that `df` has the same dtypes as `first`.
fn check_dtypes(index: usize, first: &DataFrame, df: &DataFrame) -> Result<()> {
    for (expected, found) in first.get_columns().iter().zip(df.get_columns()) {
        if expected.dtype() != found.dtype() {
            return Err(TransformError::SchemaMismatch {
                table: index,
                detail: format!(
                    "column {} has type {}, expected {}",
                    found.name(),
                    found.dtype(),
                    expected.dtype()
                ),
            });
        }
    }
    Ok(())
}

/// Null-last ordering for optional sort keys.
fn cmp_nulls_last<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stack coerced canonical tables into one sorted dataset.
///
/// Every table must carry the canonical columns in canonical order with the
/// same dtypes. Rows whose process identifier and reference year are both
/// empty are removed; a row with either key is kept. The result is sorted by
/// reference year, then process identifier, both ascending with nulls last.
/// The sort is stable, so rows with equal keys keep their input order.
pub fn unify(tables: &[DataFrame]) -> Result<UnifiedDataset> {
    let Some((first, rest)) = tables.split_first() else {
        return Err(TransformError::EmptyInput);
    };
    check_layout(0, first)?;

    let mut stacked = first.clone();
    for (offset, table) in rest.iter().enumerate() {
        let index = offset + 1;
        check_layout(index, table)?;
        check_dtypes(index, first, table)?;
        stacked.vstack_mut(table)?;
    }

    let [process_key, year_key] = KEY_COLUMNS;
    let processes = column_string_values(stacked.column(process_key)?);
    let years = column_i64_values(stacked.column(year_key)?);

    let keep: Vec<bool> = processes
        .iter()
        .zip(&years)
        .map(|(process, year)| process.is_some() || year.is_some())
        .collect();
    let dropped_rows = keep.iter().filter(|kept| !**kept).count();

    let mut order: Vec<usize> = (0..stacked.height()).filter(|&idx| keep[idx]).collect();
    order.sort_by(|&a, &b| {
        cmp_nulls_last(&years[a], &years[b]).then_with(|| cmp_nulls_last(&processes[a], &processes[b]))
    });

    let mut rows_per_year = BTreeMap::new();
    for &idx in &order {
        if let Some(year) = years[idx].and_then(|y| i32::try_from(y).ok()) {
            *rows_per_year.entry(year).or_insert(0) += 1;
        }
    }

    let indices: Vec<IdxSize> = order.iter().map(|&idx| idx as IdxSize).collect();
    let data = stacked.take(&IdxCa::from_vec("idx".into(), indices))?;

    tracing::info!(
        tables = tables.len(),
        rows = data.height(),
        dropped_rows,
        "tables unified"
    );

    Ok(UnifiedDataset {
        data,
        dropped_rows,
        rows_per_year,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn nulls_sort_last() {
        let mut keys = vec![None, Some(2), Some(1), None];
        keys.sort_by(cmp_nulls_last);
        assert_eq!(keys, vec![Some(1), Some(2), None, None]);
    }

    #[test]
    fn rejects_non_canonical_layout() {
        let df = df! { "PROCESSO" => ["1"] }.unwrap();
        assert!(matches!(
            unify(&[df]),
            Err(TransformError::SchemaMismatch { table: 0, .. })
        ));
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(unify(&[]), Err(TransformError::EmptyInput)));
    }
}
