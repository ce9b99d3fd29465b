use std::collections::BTreeMap;

use cnpq_model::columns::{ANO_REFERENCIA, SIGLA_UF_DESTINO, SIGLA_UF_ORIGEM, VALOR_PAGO};
use cnpq_model::{RegionColumn, RegionPreference};
use cnpq_query::{choose_region_column, list_available_years, mean_value_by_region, region_means};
use polars::prelude::*;

fn ledger() -> DataFrame {
    df! {
        ANO_REFERENCIA => [2023i32, 2023, 2023, 2023, 2024],
        SIGLA_UF_DESTINO => [Some("SP"), Some("sp "), Some("RJ"), None, Some("SP")],
        SIGLA_UF_ORIGEM => [None::<&str>, None, None, None, Some("MG")],
        VALOR_PAGO => [100.0, 300.0, 50.0, 999.0, 7.0],
    }
    .unwrap()
}

#[test]
fn mean_by_region_excludes_missing_codes() {
    let means = mean_value_by_region(&ledger(), 2023, RegionPreference::Destination).unwrap();
    assert_eq!(
        means,
        BTreeMap::from([("RJ".to_string(), 50.0), ("SP".to_string(), 200.0)])
    );
}

#[test]
fn region_means_are_sorted_by_mean() {
    let means = region_means(&ledger(), 2023, RegionPreference::Auto).unwrap();
    insta::assert_json_snapshot!(means, @r#"
    [
      {
        "region": "SP",
        "mean": 200.0,
        "rows": 2
      },
      {
        "region": "RJ",
        "mean": 50.0,
        "rows": 1
      }
    ]
    "#);
}

#[test]
fn region_without_values_is_kept_last() {
    let df = df! {
        ANO_REFERENCIA => [2022i32, 2022, 2022, 2022],
        SIGLA_UF_DESTINO => [Some("AM"), Some("AM"), Some("BA"), Some("CE")],
        VALOR_PAGO => [None, None, Some(10.0), Some(30.0)],
    }
    .unwrap();

    let means = region_means(&df, 2022, RegionPreference::Destination).unwrap();
    let order: Vec<(&str, Option<f64>, usize)> = means
        .iter()
        .map(|m| (m.region.as_str(), m.mean, m.rows))
        .collect();
    assert_eq!(
        order,
        [("CE", Some(30.0), 1), ("BA", Some(10.0), 1), ("AM", None, 2)]
    );

    let map = mean_value_by_region(&df, 2022, RegionPreference::Destination).unwrap();
    assert!(!map.contains_key("AM"));
    assert_eq!(map.len(), 2);
}

#[test]
fn year_without_rows_yields_empty_map() {
    let means = mean_value_by_region(&ledger(), 2019, RegionPreference::Auto).unwrap();
    assert!(means.is_empty());
}

#[test]
fn auto_choice_follows_coverage() {
    let df = ledger();
    assert_eq!(
        choose_region_column(&df, RegionPreference::Auto).unwrap(),
        RegionColumn::Destination
    );
    let means = mean_value_by_region(&df, 2024, RegionPreference::Origin).unwrap();
    assert_eq!(means, BTreeMap::from([("MG".to_string(), 7.0)]));
}

#[test]
fn available_years_are_distinct() {
    assert_eq!(
        list_available_years(&ledger()).into_iter().collect::<Vec<_>>(),
        [2023, 2024]
    );
}
