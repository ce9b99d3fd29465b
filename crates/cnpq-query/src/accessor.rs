//! Dataset accessor: available years, region column choice, mean by region.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use cnpq_common::non_empty_count;
use cnpq_model::{RegionColumn, RegionPreference};
use cnpq_transform::normalize_region;
use polars::prelude::DataFrame;
use serde::Serialize;

use crate::error::{QueryError, Result};
use crate::view::{amounts, group_by_key, strings, year_mask, years};

/// Mean payment of one region code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionMean {
    pub region: String,
    /// `None` when no row of the region carries a payment value.
    pub mean: Option<f64>,
    /// Rows of the region in the selected year, with or without a value.
    pub rows: usize,
}

/// Distinct non-null reference years, ascending.
///
/// A dataset without the year column has no years.
pub fn list_available_years(df: &DataFrame) -> BTreeSet<i32> {
    let Ok(values) = years(df) else {
        return BTreeSet::new();
    };
    let found: BTreeSet<i32> = values
        .into_iter()
        .flatten()
        .filter_map(|y| i32::try_from(y).ok())
        .collect();
    tracing::debug!(years = ?found, "years available");
    found
}

/// Pick the region code column to group by.
///
/// An explicit preference wins when its column exists and otherwise falls
/// back to the automatic rule. `Auto` picks the column with more non-null
/// codes; equal coverage goes to the destination column.
pub fn choose_region_column(df: &DataFrame, preference: RegionPreference) -> Result<RegionColumn> {
    let destination = non_empty_count(df, RegionColumn::Destination.column_name());
    let origin = non_empty_count(df, RegionColumn::Origin.column_name());

    let forced = match preference {
        RegionPreference::Destination if destination.is_some() => Some(RegionColumn::Destination),
        RegionPreference::Origin if origin.is_some() => Some(RegionColumn::Origin),
        _ => None,
    };
    if let Some(column) = forced {
        return Ok(column);
    }

    let chosen = match (destination, origin) {
        (Some(nd), Some(no)) if nd >= no => RegionColumn::Destination,
        (Some(_), Some(_)) | (None, Some(_)) => RegionColumn::Origin,
        (Some(_), None) => RegionColumn::Destination,
        (None, None) => return Err(QueryError::NoRegionColumn),
    };
    tracing::debug!(
        ?preference,
        destination_coverage = destination,
        origin_coverage = origin,
        chosen = %chosen,
        "region column chosen"
    );
    Ok(chosen)
}

/// Mean payment per region code for `year`, highest mean first.
///
/// Region codes are normalized again (letters only, upper-case, two
/// characters) before grouping. Rows without a code are left out. A code
/// whose rows carry no payment value is kept with no mean and sorts last.
/// Equal means keep ascending code order.
pub fn region_means(
    df: &DataFrame,
    year: i32,
    preference: RegionPreference,
) -> Result<Vec<RegionMean>> {
    let mask = year_mask(df, Some(year))?;
    let values = amounts(df)?;
    let column = choose_region_column(df, preference)?;
    let codes: Vec<Option<String>> = strings(df, column.column_name())?
        .into_iter()
        .map(|code| code.as_deref().and_then(normalize_region))
        .collect();

    let mut means: Vec<RegionMean> = group_by_key(&codes, &values, &mask)
        .into_iter()
        .map(|(region, acc)| RegionMean {
            region,
            mean: acc.mean(),
            rows: acc.rows,
        })
        .collect();
    means.sort_by(|a, b| match (a.mean, b.mean) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    tracing::debug!(year, column = %column, regions = means.len(), "region means computed");
    Ok(means)
}

/// [`region_means`] as a map from region code to mean; codes without a mean
/// are omitted.
pub fn mean_value_by_region(
    df: &DataFrame,
    year: i32,
    preference: RegionPreference,
) -> Result<BTreeMap<String, f64>> {
    Ok(region_means(df, year, preference)?
        .into_iter()
        .filter_map(|m| m.mean.map(|mean| (m.region, mean)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cnpq_model::columns;
    use polars::prelude::*;

    fn coverage_frame(destination: usize, origin: usize) -> DataFrame {
        let dest: Vec<Option<&str>> = (0..10).map(|i| (i < destination).then_some("SP")).collect();
        let orig: Vec<Option<&str>> = (0..10).map(|i| (i < origin).then_some("RJ")).collect();
        df! {
            columns::SIGLA_UF_DESTINO => dest,
            columns::SIGLA_UF_ORIGEM => orig,
        }
        .unwrap()
    }

    #[test]
    fn auto_prefers_better_coverage() {
        let df = coverage_frame(9, 4);
        assert_eq!(
            choose_region_column(&df, RegionPreference::Auto).unwrap(),
            RegionColumn::Destination
        );
        let df = coverage_frame(4, 9);
        assert_eq!(
            choose_region_column(&df, RegionPreference::Auto).unwrap(),
            RegionColumn::Origin
        );
    }

    #[test]
    fn auto_tie_goes_to_destination() {
        let df = coverage_frame(5, 5);
        assert_eq!(
            choose_region_column(&df, RegionPreference::Auto).unwrap(),
            RegionColumn::Destination
        );
    }

    #[test]
    fn explicit_preference_ignores_coverage() {
        let df = coverage_frame(9, 1);
        assert_eq!(
            choose_region_column(&df, RegionPreference::Origin).unwrap(),
            RegionColumn::Origin
        );
    }

    #[test]
    fn missing_preferred_column_falls_back() {
        let df = df! { columns::SIGLA_UF_ORIGEM => ["SP"] }.unwrap();
        assert_eq!(
            choose_region_column(&df, RegionPreference::Destination).unwrap(),
            RegionColumn::Origin
        );
        let empty = df! { "X" => [1] }.unwrap();
        assert!(matches!(
            choose_region_column(&empty, RegionPreference::Auto),
            Err(QueryError::NoRegionColumn)
        ));
    }

    #[test]
    fn years_are_distinct_and_sorted() {
        let df = df! { columns::ANO_REFERENCIA => [Some(2024i32), None, Some(2022), Some(2024)] }.unwrap();
        assert_eq!(list_available_years(&df), BTreeSet::from([2022, 2024]));
        assert!(list_available_years(&DataFrame::empty()).is_empty());
    }
}
