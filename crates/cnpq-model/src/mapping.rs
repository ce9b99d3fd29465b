//! Per-year rename tables from source headers to canonical names.
//!
//! The tables are pure configuration: they are built once on first use and
//! shared for the lifetime of the process.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::schema::columns;
use crate::year::SourceYear;

/// Mapping from original column name to canonical field name.
///
/// Canonical fields missing from a mapping are simply absent for that year
/// (they become all-null columns); source columns missing from it are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    entries: BTreeMap<String, String>,
}

impl ColumnMapping {
    /// Builds a mapping from `(source, canonical)` pairs. Later pairs win.
    pub fn from_pairs<I, S, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(source, target)| (source.into(), target.into()))
                .collect(),
        }
    }

    /// The static mapping for a source year.
    pub fn for_year(year: SourceYear) -> &'static ColumnMapping {
        match year {
            SourceYear::Y2022 => &MAP_2022,
            SourceYear::Y2023 => &MAP_2023,
            SourceYear::Y2024 => &MAP_2024,
        }
    }

    /// Canonical name for a source header.
    pub fn target(&self, source: &str) -> Option<&str> {
        self.entries.get(source).map(String::as_str)
    }

    /// Source headers this mapping knows about.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates `(source, canonical)` pairs in source-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(source, target)| (source.as_str(), target.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 2022 ledger: human-readable Portuguese headers.
static MAP_2022: LazyLock<ColumnMapping> = LazyLock::new(|| {
    ColumnMapping::from_pairs([
        ("Ano Referência", columns::ANO_REFERENCIA),
        ("Processo", columns::PROCESSO),
        ("Data Início Processo", columns::DATA_INICIO_PROCESSO),
        ("Data Término Processo", columns::DATA_TERMINO_PROCESSO),
        ("Beneficiário", columns::BENEFICIARIO),
        ("Linha de Fomento", columns::LINHA_FOMENTO),
        ("Modalidade", columns::MODALIDADE),
        ("Categoria/Nível", columns::CATEGORIA_NIVEL),
        ("Nome Chamada", columns::NOME_CHAMADA),
        ("Programa CNPq", columns::PROGRAMA_CNPQ),
        ("Grande Área", columns::GRANDE_AREA),
        ("Área", columns::AREA),
        ("Subárea", columns::SUBAREA),
        ("Instituição Origem", columns::INSTITUICAO_ORIGEM),
        ("Sigla UF Origem", columns::SIGLA_UF_ORIGEM),
        ("País Origem", columns::PAIS_ORIGEM),
        ("Instituição Destino", columns::INSTITUICAO_DESTINO),
        ("Sigla Instituição Destino", columns::SIGLA_INSTITUICAO_DESTINO),
        ("Sigla Instituição Macro", columns::SIGLA_INSTITUICAO_MACRO),
        ("Cidade Destino", columns::CIDADE_DESTINO),
        ("Sigla UF Destino", columns::SIGLA_UF_DESTINO),
        ("Região Destino", columns::REGIAO_DESTINO),
        ("País Destino", columns::PAIS_DESTINO),
        ("Título do Projeto", columns::TITULO_PROJETO),
        ("Palavra Chave", columns::PALAVRA_CHAVE),
        ("UO", columns::UO),
        ("Natureza de Despesa", columns::NATUREZA_DESPESA),
        ("Valor Pago", columns::VALOR_PAGO),
    ])
});

/// Headers shared verbatim by the 2023 and 2024 exports.
const SHARED_UPPER_HEADERS: [&str; 24] = [
    columns::ANO_REFERENCIA,
    columns::PROCESSO,
    columns::DATA_INICIO_PROCESSO,
    columns::DATA_TERMINO_PROCESSO,
    columns::BENEFICIARIO,
    columns::LINHA_FOMENTO,
    columns::MODALIDADE,
    columns::CATEGORIA_NIVEL,
    columns::NOME_CHAMADA,
    columns::PROGRAMA_CNPQ,
    columns::GRANDE_AREA,
    columns::AREA,
    columns::SUBAREA,
    columns::INSTITUICAO_ORIGEM,
    columns::SIGLA_UF_ORIGEM,
    columns::PAIS_ORIGEM,
    columns::INSTITUICAO_DESTINO,
    columns::SIGLA_INSTITUICAO_DESTINO,
    columns::SIGLA_INSTITUICAO_MACRO,
    columns::CIDADE_DESTINO,
    columns::SIGLA_UF_DESTINO,
    columns::PAIS_DESTINO,
    columns::TITULO_PROJETO,
    columns::PALAVRA_CHAVE,
];

fn upper_header_mapping(cpf_header: &str) -> ColumnMapping {
    let identity = SHARED_UPPER_HEADERS.iter().map(|name| (*name, *name));
    let renamed = [
        (cpf_header, columns::CPF_HASH),
        ("REGIAO", columns::REGIAO_DESTINO),
        (columns::VALOR_PAGO, columns::VALOR_PAGO),
    ];
    ColumnMapping::from_pairs(identity.chain(renamed))
}

/// 2023 ledger: upper-case headers, CPF as `NU_CPF`.
static MAP_2023: LazyLock<ColumnMapping> = LazyLock::new(|| upper_header_mapping("NU_CPF"));

/// 2024 ledger: upper-case headers, CPF as `CPF ANONIMIZADO`.
static MAP_2024: LazyLock<ColumnMapping> =
    LazyLock::new(|| upper_header_mapping("CPF ANONIMIZADO"));
