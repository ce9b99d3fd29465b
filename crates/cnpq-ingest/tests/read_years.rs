use std::fs;
use std::path::{Path, PathBuf};

use cnpq_ingest::{IngestError, discover_raw_files, read_ledger, read_year};
use cnpq_model::SourceYear;
use encoding_rs::WINDOWS_1252;
use polars::prelude::AnyValue;
use tempfile::TempDir;

fn write_latin1(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let (bytes, _, had_errors) = WINDOWS_1252.encode(contents);
    assert!(!had_errors, "fixture must be representable in windows-1252");
    let path = dir.join(name);
    fs::write(&path, bytes).expect("write file");
    path
}

fn write_utf8(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write file");
    path
}

fn string_at(df: &polars::prelude::DataFrame, column: &str, idx: usize) -> Option<String> {
    match df.column(column).expect("column").get(idx).expect("row") {
        AnyValue::Null => None,
        AnyValue::String(s) => Some(s.to_string()),
        AnyValue::StringOwned(s) => Some(s.to_string()),
        other => panic!("unexpected value {other:?}"),
    }
}

const LEDGER_2022: &str = "\
Relatório de Pagamentos
Conselho Nacional de Desenvolvimento Científico e Tecnológico
Período: 2022

Fonte: CNPq
Emitido em 10/01/2023
Ano Referência;Processo;Beneficiário;Sigla UF Destino;Região Destino;Valor Pago
2022;100/2022-1;Maria José;SP;Sudeste;\"1.234,56\"
2022;101/2022-9; João ;rj;Sudeste;200
";

const LEDGER_2024: &str = "\
ANO_REFERENCIA;PROCESSO;BENEFICIARIO;CPF ANONIMIZADO;SIGLA_UF_DESTINO;REGIAO;VALOR_PAGO
2024;300/2024-0;Ana;***123***;MG;Sudeste;1500,00
";

#[test]
fn reads_latin1_ledger_with_banner_rows() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_latin1(dir.path(), "Relatorio_2022.csv", LEDGER_2022);

    let table = read_year(SourceYear::Y2022, &path).expect("read 2022");

    assert_eq!(table.encoding, "windows-1252");
    assert_eq!(table.separator, b';');
    assert_eq!(table.data.height(), 2);
    assert_eq!(
        string_at(&table.data, "Beneficiário", 1).as_deref(),
        Some("João")
    );
    assert_eq!(
        string_at(&table.data, "Valor Pago", 0).as_deref(),
        Some("1.234,56")
    );
}

#[test]
fn reads_utf8_ledger_with_forced_separator() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_utf8(dir.path(), "pagamentos_20250204.csv", LEDGER_2024);

    let table = read_year(SourceYear::Y2024, &path).expect("read 2024");

    assert_eq!(table.encoding, "UTF-8");
    assert_eq!(table.data.width(), 7);
    assert_eq!(
        string_at(&table.data, "CPF ANONIMIZADO", 0).as_deref(),
        Some("***123***")
    );
}

#[test]
fn wrong_profile_is_unreadable() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_utf8(dir.path(), "pagamentos_20250204.csv", LEDGER_2024);

    // The 2023 profile expects seven banner rows this file does not have.
    let result = read_year(SourceYear::Y2023, &path);
    assert!(matches!(result, Err(IngestError::DataUnreadable { .. })));
}

#[test]
fn discovers_and_reads_every_year() {
    let dir = TempDir::new().expect("temp dir");
    write_latin1(dir.path(), "Relatorio_2022.csv", LEDGER_2022);
    write_utf8(
        dir.path(),
        "dados-de-pagamento-2023-pda.csv",
        &format!("{}{}", "banner\n".repeat(7), "ANO_REFERENCIA,PROCESSO,NU_CPF,VALOR_PAGO\n2023,200/2023-5,abc,\"99,90\"\n"),
    );
    write_utf8(dir.path(), "pagamentos_20250204.csv", LEDGER_2024);

    let files = discover_raw_files(dir.path()).expect("discover");
    for (year, path) in files.iter() {
        let table = read_year(year, path).expect("read year");
        assert!(table.data.height() >= 1, "{year} has rows");
    }
}

#[test]
fn explicit_layout_reads_any_offset() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_utf8(
        dir.path(),
        "ledger.csv",
        "Extrato\n\nGerado em 2023\nANO_REFERENCIA,PROCESSO,NU_CPF,VALOR_PAGO\n2023,200/2023-5,abc,\"99,90\"\n",
    );
    let mapping = SourceYear::Y2023.mapping();

    let table = read_ledger(&path, 2, None, mapping).expect("read ledger");
    assert_eq!(table.header_row, 2);
    assert_eq!(table.separator, b',');
    assert_eq!(table.data.height(), 1);
    assert_eq!(string_at(&table.data, "VALOR_PAGO", 0).as_deref(), Some("99,90"));

    let forced = read_ledger(&path, 2, Some(b';'), mapping);
    assert!(matches!(forced, Err(IngestError::DataUnreadable { .. })));
}
