use std::fs;
use std::path::Path;

use cnpq_core::{FailurePolicy, PipelineConfig, PipelineError, run_pipeline};
use cnpq_model::{CANONICAL_COLUMNS, SourceYear, columns};
use encoding_rs::WINDOWS_1252;
use polars::prelude::DataFrame;
use tempfile::TempDir;

const RAW_2022: &str = "\
Relatório de Pagamentos CNPq
Conselho Nacional de Desenvolvimento Científico e Tecnológico
Exercício 2022
Valores em reais
Fonte: SIAFI
Ano Referência;Processo;Beneficiário;Sigla UF Origem;Sigla UF Destino;Data Início Processo;Valor Pago;Modalidade;UO
2022;B-200;Maria;SP;sp;01/03/2022;\"R$ 1.234,56\";pq;20501
2022;A-100;José;RJ;RJ;15/03/2022;N/D;GD;20501
Jan-Dez2022;C-300;Ana;;MG;20/04/2022;600,00;pq;20501
;;Fulano;;SP;;10,00;pq;
";

const RAW_2023: &str = "\
banner 1
banner 2
banner 3
banner 4
banner 5
banner 6
banner 7
ANO_REFERENCIA,PROCESSO,BENEFICIARIO,NU_CPF,SIGLA_UF_DESTINO,DATA_INICIO_PROCESSO,VALOR_PAGO,MODALIDADE,REGIAO
2023,Z-1,Carlos,***1***,BA,2023-01-10,\"8,100.00\",PQ,Nordeste
2023,A-2,Bia,***2***,SP,2023-02-11,abc,IC,Sudeste
";

const RAW_2024: &str = "\
ANO_REFERENCIA;PROCESSO;BENEFICIARIO;CPF ANONIMIZADO;SIGLA_UF_DESTINO;DATA_INICIO_PROCESSO;VALOR_PAGO;MODALIDADE
2024;M-5;Davi;***3***;PR;05/06/2024;1500,00;GD
2024;M-4;Eva;***4***;PR;06/06/2024;--;GD
";

fn write_raw(dir: &Path, raw_2023: &str) {
    let (latin1, _, had_errors) = WINDOWS_1252.encode(RAW_2022);
    assert!(!had_errors);
    fs::write(dir.join("Relatorio_Pagamentos_2022.csv"), latin1).expect("write 2022");
    fs::write(dir.join("dados-de-pagamento-2023-pda.csv"), raw_2023).expect("write 2023");
    fs::write(dir.join("pagamentos_20250204.csv"), RAW_2024).expect("write 2024");
}

fn strings(df: &DataFrame, column: &str) -> Vec<Option<String>> {
    df.column(column)
        .expect("column")
        .str()
        .expect("str")
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

fn floats(df: &DataFrame, column: &str) -> Vec<Option<f64>> {
    df.column(column)
        .expect("column")
        .f64()
        .expect("f64")
        .into_iter()
        .collect()
}

fn years(df: &DataFrame) -> Vec<Option<i32>> {
    df.column(columns::ANO_REFERENCIA)
        .expect("column")
        .i32()
        .expect("i32")
        .into_iter()
        .collect()
}

#[test]
fn harmonizes_and_unifies_three_years() {
    let raw = TempDir::new().expect("raw dir");
    let out = TempDir::new().expect("out dir");
    write_raw(raw.path(), RAW_2023);

    let config = PipelineConfig::new(raw.path(), out.path());
    let result = run_pipeline(&config).expect("pipeline");

    assert!(result.is_complete());
    assert_eq!(result.years.len(), 3);
    assert_eq!(result.unified.dropped_rows, 1);

    let df = &result.dataset;
    assert_eq!(df.get_column_names_str(), CANONICAL_COLUMNS.to_vec());
    assert_eq!(
        years(df),
        vec![Some(2022), Some(2022), Some(2022), Some(2023), Some(2023), Some(2024), Some(2024)]
    );
    let ids: Vec<_> = strings(df, columns::PROCESSO).into_iter().flatten().collect();
    assert_eq!(ids, vec!["A-100", "B-200", "C-300", "A-2", "Z-1", "M-4", "M-5"]);
    assert_eq!(
        floats(df, columns::VALOR_PAGO),
        vec![None, Some(1234.56), Some(600.0), None, Some(8100.0), None, Some(1500.0)]
    );
    assert_eq!(
        strings(df, columns::BENEFICIARIO)[0].as_deref(),
        Some("José")
    );
    assert_eq!(strings(df, columns::SIGLA_UF_DESTINO)[1].as_deref(), Some("SP"));
    assert_eq!(strings(df, columns::MODALIDADE)[1].as_deref(), Some("PQ"));
    assert_eq!(strings(df, columns::CPF_HASH)[3].as_deref(), Some("***2***"));
    assert_eq!(strings(df, columns::REGIAO_DESTINO)[3].as_deref(), Some("SUDESTE"));
    assert_eq!(strings(df, columns::UO)[5], None);

    let y2022 = &result.years[0];
    assert_eq!(y2022.year, SourceYear::Y2022);
    assert_eq!(y2022.encoding, Some("windows-1252"));
    assert_eq!(y2022.coercion.columns[columns::VALOR_PAGO].anomalies(), 1);

    assert!(result.export.csv.is_file());
}

#[test]
fn second_run_reuses_yearly_cache() {
    let raw = TempDir::new().expect("raw dir");
    let out = TempDir::new().expect("out dir");
    write_raw(raw.path(), RAW_2023);
    let config = PipelineConfig::new(raw.path(), out.path());

    let first = run_pipeline(&config).expect("first run");
    let second = run_pipeline(&config).expect("second run");

    assert!(first.years.iter().all(|y| !y.from_cache));
    assert!(second.years.iter().all(|y| y.from_cache));
    assert!(first.dataset.equals_missing(&second.dataset));

    let uncached = run_pipeline(&config.clone().with_cache(false)).expect("uncached run");
    assert!(uncached.years.iter().all(|y| !y.from_cache));
}

#[test]
fn unreadable_year_aborts_by_default() {
    let raw = TempDir::new().expect("raw dir");
    let out = TempDir::new().expect("out dir");
    write_raw(raw.path(), "only,one\nshort,file\n");

    let config = PipelineConfig::new(raw.path(), out.path()).with_cache(false);
    match run_pipeline(&config) {
        Err(PipelineError::Harmonize(err)) => assert_eq!(err.year(), SourceYear::Y2023),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn unreadable_year_is_reported_when_continuing() {
    let raw = TempDir::new().expect("raw dir");
    let out = TempDir::new().expect("out dir");
    write_raw(raw.path(), "only,one\nshort,file\n");

    let config = PipelineConfig::new(raw.path(), out.path())
        .with_cache(false)
        .with_parquet(false)
        .with_failure_policy(FailurePolicy::Continue);
    let result = run_pipeline(&config).expect("partial pipeline");

    assert!(!result.is_complete());
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].year, SourceYear::Y2023);
    assert!(result.failures[0].message.contains("data unreadable"));
    assert_eq!(result.years.len(), 2);
    assert_eq!(result.unified.rows_per_year.keys().copied().collect::<Vec<_>>(), vec![2022, 2024]);
}

#[test]
fn missing_raw_files_fail_discovery() {
    let raw = TempDir::new().expect("raw dir");
    let out = TempDir::new().expect("out dir");
    let config = PipelineConfig::new(raw.path(), out.path());
    assert!(matches!(run_pipeline(&config), Err(PipelineError::Discovery(_))));
}
