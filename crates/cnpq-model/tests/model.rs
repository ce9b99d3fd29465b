//! Integration tests for the canonical schema contract.

use cnpq_model::{CANONICAL_COLUMNS, ModelError, RegionPreference, SourceYear, columns};

#[test]
fn canonical_header_line_is_stable() {
    insta::assert_snapshot!(
        CANONICAL_COLUMNS.join(","),
        @"ANO_REFERENCIA,PROCESSO,DATA_INICIO_PROCESSO,DATA_TERMINO_PROCESSO,BENEFICIARIO,CPF_HASH,LINHA_FOMENTO,MODALIDADE,CATEGORIA_NIVEL,NOME_CHAMADA,PROGRAMA_CNPQ,GRANDE_AREA,AREA,SUBAREA,INSTITUICAO_ORIGEM,SIGLA_UF_ORIGEM,PAIS_ORIGEM,INSTITUICAO_DESTINO,SIGLA_INSTITUICAO_DESTINO,SIGLA_INSTITUICAO_MACRO,CIDADE_DESTINO,SIGLA_UF_DESTINO,REGIAO_DESTINO,PAIS_DESTINO,TITULO_PROJETO,PALAVRA_CHAVE,UO,NATUREZA_DESPESA,VALOR_PAGO"
    );
}

#[test]
fn every_year_maps_the_key_fields() {
    for year in SourceYear::ALL {
        let mapping = year.mapping();
        let targets: Vec<&str> = mapping.iter().map(|(_, target)| target).collect();
        assert!(targets.contains(&columns::ANO_REFERENCIA), "{year}");
        assert!(targets.contains(&columns::PROCESSO), "{year}");
        assert!(targets.contains(&columns::VALOR_PAGO), "{year}");
    }
}

#[test]
fn error_messages() {
    insta::assert_snapshot!(
        ModelError::UnsupportedYear(2019).to_string(),
        @"unsupported source year: 2019"
    );
    let err = "sideways".parse::<RegionPreference>().unwrap_err();
    assert_eq!(
        err.to_string(),
        "unknown region preference 'sideways' (expected auto, destination or origin)"
    );
}

#[test]
fn preference_serializes() {
    let json = serde_json::to_string(&RegionPreference::Destination).unwrap();
    assert_eq!(json, "\"Destination\"");
    let year: SourceYear = serde_json::from_str("\"Y2023\"").unwrap();
    assert_eq!(year, SourceYear::Y2023);
}
