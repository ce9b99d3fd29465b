//! Per-year harmonization: read, map, coerce.

use std::path::Path;
use std::time::Instant;

use cnpq_ingest::read_year;
use cnpq_map::{MappingReport, normalize_columns_with_report};
use cnpq_model::SourceYear;
use cnpq_transform::{CoercionReport, coerce_types};
use polars::prelude::DataFrame;

use crate::error::HarmonizeError;

/// A canonical, typed table for one source year.
#[derive(Debug, Clone)]
pub struct HarmonizedYear {
    pub year: SourceYear,
    pub data: DataFrame,
    pub coercion: CoercionReport,
    /// Column decisions; `None` when the table came from the cache.
    pub mapping: Option<MappingReport>,
    /// Encoding the raw file was decoded with; `None` for cached tables.
    pub encoding: Option<&'static str>,
    pub from_cache: bool,
}

/// Read, map and coerce the raw ledger of `year`.
pub fn harmonize_year(year: SourceYear, path: &Path) -> Result<HarmonizedYear, HarmonizeError> {
    let start = Instant::now();
    let raw = read_year(year, path).map_err(|source| HarmonizeError::Ingest { year, source })?;
    let mut harmonized = harmonize_frame(year, &raw.data)?;
    harmonized.encoding = Some(raw.encoding);

    tracing::info!(
        year = %year,
        rows = harmonized.data.height(),
        encoding = raw.encoding,
        anomalies = harmonized.coercion.total_anomalies(),
        duration_ms = start.elapsed().as_millis(),
        "year harmonized"
    );
    Ok(harmonized)
}

/// Map and coerce an already loaded table of `year`.
pub fn harmonize_frame(year: SourceYear, raw: &DataFrame) -> Result<HarmonizedYear, HarmonizeError> {
    let (mapped, mapping) = normalize_columns_with_report(raw, year.mapping())
        .map_err(|source| HarmonizeError::Map { year, source })?;
    let coerced = coerce_types(&mapped).map_err(|source| HarmonizeError::Transform { year, source })?;

    for (column, diagnostics) in &coerced.report.columns {
        if diagnostics.anomalies() > 0 {
            tracing::debug!(
                year = %year,
                column = %column,
                nonnull_before = diagnostics.non_null_before,
                nonnull_after = diagnostics.non_null_after,
                "coercion anomalies"
            );
        }
    }
    if !coerced.report.years.is_empty() {
        tracing::info!(year = %year, years = ?coerced.report.years, "reference years recognized");
    }

    Ok(HarmonizedYear {
        year,
        data: coerced.data,
        coercion: coerced.report,
        mapping: Some(mapping),
        encoding: None,
        from_cache: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cnpq_model::{CANONICAL_COLUMNS, columns};
    use polars::prelude::*;

    #[test]
    fn frame_is_canonical_and_typed() {
        let raw = df! {
            "Processo" => ["10/2022"],
            "Ano Referência" => ["2022"],
            "Valor Pago" => ["R$ 1.000,00"],
            "Sigla UF Destino" => ["sp"],
            "Ignorada" => ["?"],
        }
        .unwrap();

        let harmonized = harmonize_frame(SourceYear::Y2022, &raw).unwrap();

        assert_eq!(harmonized.data.get_column_names_str(), CANONICAL_COLUMNS.to_vec());
        assert_eq!(
            harmonized.data.column(columns::VALOR_PAGO).unwrap().get(0).unwrap(),
            AnyValue::Float64(1000.0)
        );
        assert_eq!(
            harmonized.data.column(columns::SIGLA_UF_DESTINO).unwrap().get(0).unwrap(),
            AnyValue::String("SP")
        );
        let mapping = harmonized.mapping.unwrap();
        assert_eq!(mapping.dropped, vec!["Ignorada"]);
    }
}
