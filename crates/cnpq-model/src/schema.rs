//! The canonical schema shared by all source years.
//!
//! The order of [`CANONICAL_COLUMNS`] is the output contract of the pipeline:
//! every harmonized table, the unified dataset and the persisted files carry
//! exactly these fields in exactly this order, with `ANO_REFERENCIA` first.

/// Canonical column names.
pub mod columns {
    pub const ANO_REFERENCIA: &str = "ANO_REFERENCIA";
    pub const PROCESSO: &str = "PROCESSO";
    pub const DATA_INICIO_PROCESSO: &str = "DATA_INICIO_PROCESSO";
    pub const DATA_TERMINO_PROCESSO: &str = "DATA_TERMINO_PROCESSO";
    pub const BENEFICIARIO: &str = "BENEFICIARIO";
    pub const CPF_HASH: &str = "CPF_HASH";
    pub const LINHA_FOMENTO: &str = "LINHA_FOMENTO";
    pub const MODALIDADE: &str = "MODALIDADE";
    pub const CATEGORIA_NIVEL: &str = "CATEGORIA_NIVEL";
    pub const NOME_CHAMADA: &str = "NOME_CHAMADA";
    pub const PROGRAMA_CNPQ: &str = "PROGRAMA_CNPQ";
    pub const GRANDE_AREA: &str = "GRANDE_AREA";
    pub const AREA: &str = "AREA";
    pub const SUBAREA: &str = "SUBAREA";
    pub const INSTITUICAO_ORIGEM: &str = "INSTITUICAO_ORIGEM";
    pub const SIGLA_UF_ORIGEM: &str = "SIGLA_UF_ORIGEM";
    pub const PAIS_ORIGEM: &str = "PAIS_ORIGEM";
    pub const INSTITUICAO_DESTINO: &str = "INSTITUICAO_DESTINO";
    pub const SIGLA_INSTITUICAO_DESTINO: &str = "SIGLA_INSTITUICAO_DESTINO";
    pub const SIGLA_INSTITUICAO_MACRO: &str = "SIGLA_INSTITUICAO_MACRO";
    pub const CIDADE_DESTINO: &str = "CIDADE_DESTINO";
    pub const SIGLA_UF_DESTINO: &str = "SIGLA_UF_DESTINO";
    pub const REGIAO_DESTINO: &str = "REGIAO_DESTINO";
    pub const PAIS_DESTINO: &str = "PAIS_DESTINO";
    pub const TITULO_PROJETO: &str = "TITULO_PROJETO";
    pub const PALAVRA_CHAVE: &str = "PALAVRA_CHAVE";
    pub const UO: &str = "UO";
    pub const NATUREZA_DESPESA: &str = "NATUREZA_DESPESA";
    pub const VALOR_PAGO: &str = "VALOR_PAGO";
}

use columns::{
    ANO_REFERENCIA, AREA, BENEFICIARIO, CATEGORIA_NIVEL, CIDADE_DESTINO, CPF_HASH,
    DATA_INICIO_PROCESSO, DATA_TERMINO_PROCESSO, GRANDE_AREA, INSTITUICAO_DESTINO,
    INSTITUICAO_ORIGEM, LINHA_FOMENTO, MODALIDADE, NATUREZA_DESPESA, NOME_CHAMADA, PAIS_DESTINO,
    PAIS_ORIGEM, PALAVRA_CHAVE, PROCESSO, PROGRAMA_CNPQ, REGIAO_DESTINO, SIGLA_INSTITUICAO_DESTINO,
    SIGLA_INSTITUICAO_MACRO, SIGLA_UF_DESTINO, SIGLA_UF_ORIGEM, SUBAREA, TITULO_PROJETO, UO,
    VALOR_PAGO,
};

/// Canonical field order. `UO` and `NATUREZA_DESPESA` only exist in the 2022
/// ledger and `CPF_HASH` only in 2023/2024; they stay in the schema for every
/// year and are all-null where the source lacks them.
pub const CANONICAL_COLUMNS: [&str; 29] = [
    ANO_REFERENCIA,
    PROCESSO,
    DATA_INICIO_PROCESSO,
    DATA_TERMINO_PROCESSO,
    BENEFICIARIO,
    CPF_HASH,
    LINHA_FOMENTO,
    MODALIDADE,
    CATEGORIA_NIVEL,
    NOME_CHAMADA,
    PROGRAMA_CNPQ,
    GRANDE_AREA,
    AREA,
    SUBAREA,
    INSTITUICAO_ORIGEM,
    SIGLA_UF_ORIGEM,
    PAIS_ORIGEM,
    INSTITUICAO_DESTINO,
    SIGLA_INSTITUICAO_DESTINO,
    SIGLA_INSTITUICAO_MACRO,
    CIDADE_DESTINO,
    SIGLA_UF_DESTINO,
    REGIAO_DESTINO,
    PAIS_DESTINO,
    TITULO_PROJETO,
    PALAVRA_CHAVE,
    UO,
    NATUREZA_DESPESA,
    VALOR_PAGO,
];

/// Identifying keys. A row is dropped during unification only when both are empty.
pub const KEY_COLUMNS: [&str; 2] = [PROCESSO, ANO_REFERENCIA];

/// Columns coerced to calendar dates.
pub const DATE_COLUMNS: [&str; 2] = [DATA_INICIO_PROCESSO, DATA_TERMINO_PROCESSO];

/// Two-letter region code columns.
pub const REGION_COLUMNS: [&str; 2] = [SIGLA_UF_DESTINO, SIGLA_UF_ORIGEM];

/// Free-text columns: trimmed but case preserved.
pub const FREE_TEXT_COLUMNS: [&str; 3] = [BENEFICIARIO, TITULO_PROJETO, PALAVRA_CHAVE];

/// Categorical columns: trimmed and upper-cased to absorb casing drift across years.
pub const UPPERCASE_COLUMNS: [&str; 20] = [
    PROCESSO,
    CPF_HASH,
    LINHA_FOMENTO,
    MODALIDADE,
    CATEGORIA_NIVEL,
    NOME_CHAMADA,
    PROGRAMA_CNPQ,
    GRANDE_AREA,
    AREA,
    SUBAREA,
    INSTITUICAO_ORIGEM,
    PAIS_ORIGEM,
    INSTITUICAO_DESTINO,
    SIGLA_INSTITUICAO_DESTINO,
    SIGLA_INSTITUICAO_MACRO,
    CIDADE_DESTINO,
    REGIAO_DESTINO,
    PAIS_DESTINO,
    UO,
    NATUREZA_DESPESA,
];

/// How a canonical column is coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Reference year, extracted from any text holding a 4-digit run.
    Year,
    /// Calendar date parsed from day/month/year or year-month-day text.
    Date,
    /// Monetary amount in Brazilian or US notation.
    Currency,
    /// Region code: letters only, upper-cased, two characters.
    Region,
    /// Categorical text: trimmed and upper-cased.
    Uppercase,
    /// Free text: trimmed only.
    FreeText,
}

/// Returns how the given canonical column is coerced, or `None` for names
/// outside the canonical schema.
pub fn column_kind(name: &str) -> Option<ColumnKind> {
    if name == ANO_REFERENCIA {
        Some(ColumnKind::Year)
    } else if name == VALOR_PAGO {
        Some(ColumnKind::Currency)
    } else if DATE_COLUMNS.contains(&name) {
        Some(ColumnKind::Date)
    } else if REGION_COLUMNS.contains(&name) {
        Some(ColumnKind::Region)
    } else if FREE_TEXT_COLUMNS.contains(&name) {
        Some(ColumnKind::FreeText)
    } else if UPPERCASE_COLUMNS.contains(&name) {
        Some(ColumnKind::Uppercase)
    } else {
        None
    }
}

/// Returns true if `name` is part of the canonical schema.
pub fn is_canonical(name: &str) -> bool {
    canonical_index(name).is_some()
}

/// Position of `name` in the canonical order.
pub fn canonical_index(name: &str) -> Option<usize> {
    CANONICAL_COLUMNS.iter().position(|column| *column == name)
}
