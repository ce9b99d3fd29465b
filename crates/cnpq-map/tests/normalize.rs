use cnpq_map::{normalize_columns, normalize_columns_with_report};
use cnpq_model::{CANONICAL_COLUMNS, SourceYear, columns};
use polars::prelude::*;

fn ledger_2023() -> DataFrame {
    df! {
        "VALOR_PAGO" => ["10,00", "20,00"],
        "NU_CPF" => ["aaa", "bbb"],
        "PROCESSO" => ["2", "1"],
        "REGIAO" => ["Sul", "Norte"],
        "COLUNA_NOVA" => ["?", "?"],
        "ANO_REFERENCIA" => ["2023", "2023"],
    }
    .expect("frame")
}

#[test]
fn applying_twice_is_idempotent() {
    let mapping = SourceYear::Y2023.mapping();
    let once = normalize_columns(&ledger_2023(), mapping).expect("first pass");
    let twice = normalize_columns(&once, mapping).expect("second pass");

    assert!(once.equals_missing(&twice));
    assert_eq!(once.get_column_names_str(), twice.get_column_names_str());
}

#[test]
fn year_mapping_renames_year_specific_headers() {
    let (out, report) =
        normalize_columns_with_report(&ledger_2023(), SourceYear::Y2023.mapping()).expect("normalize");

    assert_eq!(out.get_column_names_str(), CANONICAL_COLUMNS.to_vec());
    assert_eq!(report.mapped.get(columns::CPF_HASH).map(String::as_str), Some("NU_CPF"));
    assert_eq!(
        report.mapped.get(columns::REGIAO_DESTINO).map(String::as_str),
        Some("REGIAO")
    );
    insta::assert_snapshot!(report.dropped.join(","), @"COLUNA_NOVA");
}

#[test]
fn output_is_deterministic_regardless_of_source_order() {
    let mapping = SourceYear::Y2023.mapping();
    let original = ledger_2023();
    let reversed_names: Vec<_> = original
        .get_column_names_str()
        .into_iter()
        .rev()
        .map(ToString::to_string)
        .collect();
    let reversed = original.select(reversed_names).expect("select");

    let a = normalize_columns(&original, mapping).expect("a");
    let b = normalize_columns(&reversed, mapping).expect("b");
    assert!(a.equals_missing(&b));
}
