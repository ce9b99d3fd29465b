//! Grouped totals and means behind the dashboard views.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use cnpq_common::non_empty_count;
use cnpq_model::columns::{
    AREA, BENEFICIARIO, GRANDE_AREA, MODALIDADE, PROCESSO, REGIAO_DESTINO, SIGLA_UF_DESTINO,
    SIGLA_UF_ORIGEM, SUBAREA,
};
use polars::prelude::DataFrame;
use serde::Serialize;

use crate::error::{QueryError, Result};
use crate::view::{Acc, amounts, group_by_key, strings, year_mask, years};

/// Beneficiary placeholders used by the source for anonymized records.
const CENSORED_BENEFICIARIES: [&str; 2] = ["XXXX", "XXX XXX XXX"];

// === Result rows ===

/// Sum of payments for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub key: String,
    pub total: f64,
    pub rows: usize,
}

/// Category metric value and the size of the population behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryValue {
    pub category: String,
    pub value: f64,
    /// Rows for `Sum`, distinct beneficiaries or processes for the means.
    pub base: usize,
}

/// Mean payment of one category in one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearCategoryMean {
    pub year: i32,
    pub category: String,
    pub mean: f64,
}

// === Selectors ===

/// Knowledge-area hierarchy level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum AreaLevel {
    GrandeArea,
    #[default]
    Area,
    Subarea,
}

impl AreaLevel {
    pub fn column_name(self) -> &'static str {
        match self {
            Self::GrandeArea => GRANDE_AREA,
            Self::Area => AREA,
            Self::Subarea => SUBAREA,
        }
    }
}

impl FromStr for AreaLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "grande-area" => Ok(Self::GrandeArea),
            "area" => Ok(Self::Area),
            "subarea" => Ok(Self::Subarea),
            other => Err(format!("unknown area level: {other}")),
        }
    }
}

impl fmt::Display for AreaLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::GrandeArea => "grande-area",
            Self::Area => "area",
            Self::Subarea => "subarea",
        })
    }
}

/// How payments are summarized per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum CategoryMetric {
    /// Plain sum of payments.
    #[default]
    Sum,
    /// Mean of each beneficiary's total.
    PerBeneficiaryMean,
    /// Mean of each process's total.
    PerProcessMean,
}

impl FromStr for CategoryMetric {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "sum" => Ok(Self::Sum),
            "per-beneficiary" | "per-beneficiary-mean" => Ok(Self::PerBeneficiaryMean),
            "per-process" | "per-process-mean" => Ok(Self::PerProcessMean),
            other => Err(format!("unknown category metric: {other}")),
        }
    }
}

impl fmt::Display for CategoryMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sum => "sum",
            Self::PerBeneficiaryMean => "per-beneficiary",
            Self::PerProcessMean => "per-process",
        })
    }
}

// === Aggregations ===

fn into_totals(groups: BTreeMap<String, Acc>) -> Vec<GroupTotal> {
    let mut totals: Vec<GroupTotal> = groups
        .into_iter()
        .map(|(key, acc)| GroupTotal {
            key,
            total: acc.sum,
            rows: acc.rows,
        })
        .collect();
    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals
}

/// Sum of payments per macro-region, highest first.
///
/// Groups by `REGIAO_DESTINO`. When that column is absent or entirely empty
/// the state code is used instead, destination first unless
/// `prefer_destination` is off or the destination column is missing.
pub fn total_by_region(
    df: &DataFrame,
    year: Option<i32>,
    prefer_destination: bool,
) -> Result<Vec<GroupTotal>> {
    let has_values = |name: &str| non_empty_count(df, name).is_some_and(|n| n > 0);
    let column = if has_values(REGIAO_DESTINO) {
        REGIAO_DESTINO
    } else if prefer_destination && df.column(SIGLA_UF_DESTINO).is_ok() {
        SIGLA_UF_DESTINO
    } else if df.column(SIGLA_UF_ORIGEM).is_ok() {
        SIGLA_UF_ORIGEM
    } else if df.column(SIGLA_UF_DESTINO).is_ok() {
        SIGLA_UF_DESTINO
    } else {
        return Err(QueryError::NoRegionColumn);
    };

    let mask = year_mask(df, year)?;
    let keys = strings(df, column)?;
    let values = amounts(df)?;
    let totals = into_totals(group_by_key(&keys, &values, &mask));
    tracing::debug!(column, ?year, groups = totals.len(), "totals by region");
    Ok(totals)
}

/// Sum of payments per knowledge area at `level`, highest first.
pub fn total_by_area(
    df: &DataFrame,
    year: Option<i32>,
    level: AreaLevel,
) -> Result<Vec<GroupTotal>> {
    let mask = year_mask(df, year)?;
    let keys = strings(df, level.column_name())?;
    let values = amounts(df)?;
    Ok(into_totals(group_by_key(&keys, &values, &mask)))
}

/// Payment metric per funding category (`MODALIDADE`), highest first.
///
/// The per-entity means first total each beneficiary (or process) inside a
/// category, then average those totals. Anonymized beneficiaries are left
/// out of the per-beneficiary metric.
pub fn invest_by_category(
    df: &DataFrame,
    year: Option<i32>,
    metric: CategoryMetric,
) -> Result<Vec<CategoryValue>> {
    let mask = year_mask(df, year)?;
    let categories = strings(df, MODALIDADE)?;
    let values = amounts(df)?;

    let mut out: Vec<CategoryValue> = match metric {
        CategoryMetric::Sum => group_by_key(&categories, &values, &mask)
            .into_iter()
            .map(|(category, acc)| CategoryValue {
                category,
                value: acc.sum,
                base: acc.rows,
            })
            .collect(),
        CategoryMetric::PerBeneficiaryMean => {
            let names = strings(df, BENEFICIARIO)?;
            let mask: Vec<bool> = mask
                .iter()
                .zip(&names)
                .map(|(keep, name)| {
                    *keep
                        && !name
                            .as_deref()
                            .is_some_and(|n| CENSORED_BENEFICIARIES.contains(&n))
                })
                .collect();
            per_entity_means(&categories, &names, &values, &mask)
        }
        CategoryMetric::PerProcessMean => {
            let processes = strings(df, PROCESSO)?;
            per_entity_means(&categories, &processes, &values, &mask)
        }
    };
    out.sort_by(|a, b| b.value.total_cmp(&a.value));
    tracing::debug!(%metric, ?year, categories = out.len(), "category metric computed");
    Ok(out)
}

fn per_entity_means(
    categories: &[Option<String>],
    entities: &[Option<String>],
    values: &[Option<f64>],
    mask: &[bool],
) -> Vec<CategoryValue> {
    let mut totals: BTreeMap<(String, String), f64> = BTreeMap::new();
    for (((category, entity), value), keep) in categories.iter().zip(entities).zip(values).zip(mask) {
        if !keep {
            continue;
        }
        if let (Some(category), Some(entity)) = (category, entity) {
            *totals.entry((category.clone(), entity.clone())).or_default() += value.unwrap_or(0.0);
        }
    }

    let mut per_category: BTreeMap<String, Acc> = BTreeMap::new();
    for ((category, _), total) in totals {
        per_category.entry(category).or_default().push(Some(total));
    }
    per_category
        .into_iter()
        .filter_map(|(category, acc)| {
            acc.mean().map(|value| CategoryValue {
                category,
                value,
                base: acc.values,
            })
        })
        .collect()
}

/// Mean payment per (year, category), ordered by year then category.
///
/// Rows without a year or category are skipped, as are groups with no
/// payment values.
pub fn time_mean_by_category(df: &DataFrame) -> Result<Vec<YearCategoryMean>> {
    let years = years(df)?;
    let categories = strings(df, MODALIDADE)?;
    let values = amounts(df)?;

    let mut groups: BTreeMap<(i32, String), Acc> = BTreeMap::new();
    for ((year, category), value) in years.iter().zip(&categories).zip(&values) {
        let Some(year) = year.and_then(|y| i32::try_from(y).ok()) else {
            continue;
        };
        if let Some(category) = category {
            groups
                .entry((year, category.clone()))
                .or_default()
                .push(*value);
        }
    }

    let out: Vec<YearCategoryMean> = groups
        .into_iter()
        .filter_map(|((year, category), acc)| {
            acc.mean().map(|mean| YearCategoryMean {
                year,
                category,
                mean,
            })
        })
        .collect();
    let span: BTreeSet<i32> = out.iter().map(|m| m.year).collect();
    tracing::debug!(years = ?span, series = out.len(), "category trend computed");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cnpq_model::columns::{ANO_REFERENCIA, VALOR_PAGO};
    use polars::prelude::*;

    fn ledger() -> DataFrame {
        df! {
            ANO_REFERENCIA => [Some(2023i32), Some(2023), Some(2023), Some(2024), Some(2024)],
            PROCESSO => [Some("P1"), Some("P1"), Some("P2"), Some("P3"), None],
            BENEFICIARIO => [Some("Ana"), Some("Ana"), Some("XXXX"), Some("Bia"), Some("Caio")],
            MODALIDADE => [Some("PQ"), Some("PQ"), Some("PQ"), Some("IC"), Some("PQ")],
            GRANDE_AREA => [Some("EXATAS"), Some("EXATAS"), Some("HUMANAS"), None, Some("HUMANAS")],
            REGIAO_DESTINO => [Some("SUDESTE"), Some("SUDESTE"), Some("NORTE"), Some("NORTE"), None],
            SIGLA_UF_DESTINO => [Some("SP"), Some("SP"), Some("AM"), Some("PA"), Some("RJ")],
            VALOR_PAGO => [Some(100.0), Some(50.0), Some(400.0), Some(10.0), Some(30.0)],
        }
        .unwrap()
    }

    #[test]
    fn region_totals_use_macro_region() {
        let totals = total_by_region(&ledger(), Some(2023), true).unwrap();
        let keys: Vec<&str> = totals.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, ["NORTE", "SUDESTE"]);
        assert_eq!(totals[0].total, 400.0);
        assert_eq!(totals[1].rows, 2);
    }

    #[test]
    fn region_totals_fall_back_to_state_code() {
        let mut df = ledger();
        df.replace(
            REGIAO_DESTINO,
            Series::full_null(REGIAO_DESTINO.into(), 5, &DataType::String),
        )
        .unwrap();
        let totals = total_by_region(&df, None, true).unwrap();
        assert_eq!(totals[0].key, "AM");
        assert_eq!(totals.len(), 4);
    }

    #[test]
    fn area_totals_skip_missing_keys() {
        let totals = total_by_area(&ledger(), None, AreaLevel::GrandeArea).unwrap();
        assert_eq!(
            totals,
            vec![
                GroupTotal { key: "HUMANAS".into(), total: 430.0, rows: 2 },
                GroupTotal { key: "EXATAS".into(), total: 150.0, rows: 2 },
            ]
        );
    }

    #[test]
    fn per_beneficiary_excludes_censored_names() {
        let out = invest_by_category(&ledger(), Some(2023), CategoryMetric::PerBeneficiaryMean)
            .unwrap();
        assert_eq!(
            out,
            vec![CategoryValue { category: "PQ".into(), value: 150.0, base: 1 }]
        );
    }

    #[test]
    fn per_process_mean_totals_each_process() {
        let out =
            invest_by_category(&ledger(), Some(2023), CategoryMetric::PerProcessMean).unwrap();
        assert_eq!(
            out,
            vec![CategoryValue { category: "PQ".into(), value: 275.0, base: 2 }]
        );
    }

    #[test]
    fn trend_is_ordered_by_year_then_category() {
        let out = time_mean_by_category(&ledger()).unwrap();
        let keys: Vec<(i32, &str)> = out.iter().map(|m| (m.year, m.category.as_str())).collect();
        assert_eq!(keys, [(2023, "PQ"), (2024, "IC"), (2024, "PQ")]);
        assert_eq!(out[0].mean, 550.0 / 3.0);
    }

    #[test]
    fn selectors_parse_cli_spellings() {
        assert_eq!("grande-area".parse::<AreaLevel>().unwrap(), AreaLevel::GrandeArea);
        assert_eq!("SUBAREA".parse::<AreaLevel>().unwrap(), AreaLevel::Subarea);
        assert_eq!(
            "per-beneficiary".parse::<CategoryMetric>().unwrap(),
            CategoryMetric::PerBeneficiaryMean
        );
        assert!("median".parse::<CategoryMetric>().is_err());
    }
}
