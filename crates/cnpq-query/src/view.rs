//! Column extraction shared by the queries.

use std::collections::BTreeMap;

use cnpq_common::{column_f64_values, column_i64_values, column_string_values};
use cnpq_model::columns::{ANO_REFERENCIA, VALOR_PAGO};
use polars::prelude::DataFrame;

use crate::error::{QueryError, Result};

pub(crate) fn require<'a>(df: &'a DataFrame, name: &str) -> Result<&'a polars::prelude::Column> {
    df.column(name).map_err(|_| QueryError::MissingColumn {
        name: name.to_string(),
    })
}

pub(crate) fn strings(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    require(df, name).map(column_string_values)
}

pub(crate) fn amounts(df: &DataFrame) -> Result<Vec<Option<f64>>> {
    require(df, VALOR_PAGO).map(column_f64_values)
}

pub(crate) fn years(df: &DataFrame) -> Result<Vec<Option<i64>>> {
    require(df, ANO_REFERENCIA).map(column_i64_values)
}

/// Row mask for an optional year filter. Without a filter every row passes.
pub(crate) fn year_mask(df: &DataFrame, year: Option<i32>) -> Result<Vec<bool>> {
    match year {
        None => Ok(vec![true; df.height()]),
        Some(year) => Ok(years(df)?
            .into_iter()
            .map(|y| y == Some(i64::from(year)))
            .collect()),
    }
}

/// Running sum/count for one group.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Acc {
    pub sum: f64,
    /// Rows with a value.
    pub values: usize,
    /// All rows of the group.
    pub rows: usize,
}

impl Acc {
    pub fn push(&mut self, value: Option<f64>) {
        self.rows += 1;
        if let Some(value) = value {
            self.sum += value;
            self.values += 1;
        }
    }

    pub fn mean(&self) -> Option<f64> {
        (self.values > 0).then(|| self.sum / self.values as f64)
    }
}

/// Group `values` by `keys` over rows where `mask` holds; null keys are skipped.
pub(crate) fn group_by_key(
    keys: &[Option<String>],
    values: &[Option<f64>],
    mask: &[bool],
) -> BTreeMap<String, Acc> {
    let mut groups: BTreeMap<String, Acc> = BTreeMap::new();
    for ((key, value), keep) in keys.iter().zip(values).zip(mask) {
        if !keep {
            continue;
        }
        if let Some(key) = key {
            groups.entry(key.clone()).or_default().push(*value);
        }
    }
    groups
}
