//! Column-by-column type coercion.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use cnpq_common::column_string_values;
use cnpq_model::{ColumnKind, column_kind};
use polars::prelude::{Column, DataFrame, DataType, NamedFrom, Series};
use serde::Serialize;

use crate::error::Result;
use crate::normalization::{
    extract_year, normalize_region, normalize_text, parse_currency, parse_date_column,
};

/// Non-null counts of one column around coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnDiagnostics {
    pub non_null_before: usize,
    pub non_null_after: usize,
}

impl ColumnDiagnostics {
    /// Values that were present but could not be coerced.
    pub fn anomalies(&self) -> usize {
        self.non_null_before.saturating_sub(self.non_null_after)
    }
}

/// Diagnostics gathered by [`coerce_types`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoercionReport {
    /// Per coerced column.
    pub columns: BTreeMap<String, ColumnDiagnostics>,
    /// Distinct reference years found.
    pub years: BTreeSet<i32>,
    /// Date layout used for each date column that parsed uniformly.
    pub date_formats: BTreeMap<String, String>,
}

impl CoercionReport {
    /// Total values turned to null across all columns.
    pub fn total_anomalies(&self) -> usize {
        self.columns.values().map(ColumnDiagnostics::anomalies).sum()
    }
}

/// A coerced table plus its diagnostics.
#[derive(Debug, Clone)]
pub struct CoercedFrame {
    pub data: DataFrame,
    pub report: CoercionReport,
}

/// Coerce every canonical column of `df` to its target type.
///
/// | kind        | result                                  |
/// |-------------|-----------------------------------------|
/// | year        | `Int32` from the first four-digit run   |
/// | date        | `Date`                                  |
/// | currency    | `Float64`                               |
/// | region      | two-letter upper-case `String`          |
/// | uppercase   | trimmed upper-case `String`             |
/// | free text   | trimmed `String`                        |
///
/// Columns outside the canonical schema pass through untouched. Column order
/// and row count never change. Columns that already have their target type
/// are left as they are, so coercing twice is harmless.
pub fn coerce_types(df: &DataFrame) -> Result<CoercedFrame> {
    let mut report = CoercionReport::default();
    let mut columns = Vec::with_capacity(df.width());

    for column in df.get_columns() {
        let name = column.name().to_string();
        let Some(kind) = column_kind(&name) else {
            columns.push(column.clone());
            continue;
        };
        let values = column_string_values(column);
        let coerced = coerce_column(column, &values, kind, &mut report)?;
        let diagnostics = ColumnDiagnostics {
            non_null_before: values.iter().flatten().count(),
            non_null_after: coerced.len() - coerced.null_count(),
        };
        if diagnostics.anomalies() > 0 {
            tracing::debug!(column = %name, anomalies = diagnostics.anomalies(), "values coerced to null");
        }
        report.columns.insert(name, diagnostics);
        columns.push(coerced);
    }

    tracing::debug!(
        years = ?report.years,
        anomalies = report.total_anomalies(),
        "types coerced"
    );

    let data = DataFrame::new(columns)?;
    Ok(CoercedFrame { data, report })
}

fn coerce_column(
    column: &Column,
    values: &[Option<String>],
    kind: ColumnKind,
    report: &mut CoercionReport,
) -> Result<Column> {
    let name = column.name().clone();
    let target = match kind {
        ColumnKind::Year => DataType::Int32,
        ColumnKind::Date => DataType::Date,
        ColumnKind::Currency => DataType::Float64,
        ColumnKind::Region | ColumnKind::Uppercase | ColumnKind::FreeText => DataType::String,
    };

    if kind == ColumnKind::Year && column.dtype() == &target {
        report
            .years
            .extend(column.i32()?.into_iter().flatten());
        return Ok(column.clone());
    }
    if matches!(kind, ColumnKind::Date | ColumnKind::Currency) && column.dtype() == &target {
        return Ok(column.clone());
    }

    let series = match kind {
        ColumnKind::Year => {
            let years: Vec<Option<i32>> = values
                .iter()
                .map(|v| v.as_deref().and_then(extract_year))
                .collect();
            report.years.extend(years.iter().flatten());
            Series::new(name, years)
        }
        ColumnKind::Date => {
            let (dates, format) = parse_date_column(values);
            if let Some(format) = format {
                report
                    .date_formats
                    .insert(name.to_string(), format.to_string());
            }
            let days: Vec<Option<i32>> = dates.into_iter().map(|d| d.and_then(days_since_epoch)).collect();
            Series::new(name, days).cast(&DataType::Date)?
        }
        ColumnKind::Currency => {
            let amounts: Vec<Option<f64>> = values
                .iter()
                .map(|v| v.as_deref().and_then(parse_currency))
                .collect();
            Series::new(name, amounts)
        }
        ColumnKind::Region => {
            let codes: Vec<Option<String>> = values
                .iter()
                .map(|v| v.as_deref().and_then(normalize_region))
                .collect();
            Series::new(name, codes)
        }
        ColumnKind::Uppercase | ColumnKind::FreeText => {
            let uppercase = kind == ColumnKind::Uppercase;
            let texts: Vec<Option<String>> = values
                .iter()
                .map(|v| v.as_deref().and_then(|v| normalize_text(v, uppercase)))
                .collect();
            Series::new(name, texts)
        }
    };
    Ok(Column::from(series))
}

fn days_since_epoch(date: NaiveDate) -> Option<i32> {
    i32::try_from(date.signed_duration_since(NaiveDate::default()).num_days()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cnpq_model::columns;
    use polars::prelude::*;

    fn raw() -> DataFrame {
        df! {
            columns::ANO_REFERENCIA => [Some("2022"), Some("Jan-Dez2022"), Some("?")],
            columns::DATA_INICIO_PROCESSO => [Some("01/03/2022"), None, Some("15/07/2022")],
            columns::BENEFICIARIO => [Some(" Maria "), Some("joão"), None],
            columns::MODALIDADE => [Some(" pq "), Some(""), Some("GD")],
            columns::SIGLA_UF_DESTINO => [Some(" sp"), Some("rj"), Some("--")],
            columns::VALOR_PAGO => [Some("1.234,56"), Some("N/D"), Some("10")],
            "EXTRA" => [Some("x"), Some("y"), Some("z")],
        }
        .unwrap()
    }

    #[test]
    fn coerces_each_kind() {
        let CoercedFrame { data, report } = coerce_types(&raw()).unwrap();

        assert_eq!(data.column(columns::ANO_REFERENCIA).unwrap().dtype(), &DataType::Int32);
        assert_eq!(data.column(columns::DATA_INICIO_PROCESSO).unwrap().dtype(), &DataType::Date);
        assert_eq!(data.column(columns::VALOR_PAGO).unwrap().dtype(), &DataType::Float64);
        assert_eq!(data.column(columns::SIGLA_UF_DESTINO).unwrap().get(0).unwrap(), AnyValue::String("SP"));
        assert_eq!(data.column(columns::MODALIDADE).unwrap().get(0).unwrap(), AnyValue::String("PQ"));
        assert_eq!(data.column(columns::MODALIDADE).unwrap().get(1).unwrap(), AnyValue::Null);
        assert_eq!(data.column(columns::BENEFICIARIO).unwrap().get(1).unwrap(), AnyValue::String("joão"));
        assert_eq!(data.column(columns::VALOR_PAGO).unwrap().get(0).unwrap(), AnyValue::Float64(1234.56));
        assert_eq!(data.column("EXTRA").unwrap().get(2).unwrap(), AnyValue::String("z"));

        assert_eq!(report.years, BTreeSet::from([2022]));
        assert_eq!(report.columns[columns::VALOR_PAGO].anomalies(), 1);
        assert_eq!(report.columns[columns::ANO_REFERENCIA].anomalies(), 1);
        assert_eq!(report.columns[columns::SIGLA_UF_DESTINO].anomalies(), 1);
        assert_eq!(report.date_formats[columns::DATA_INICIO_PROCESSO], "%d/%m/%Y");
    }

    #[test]
    fn keeps_order_and_height() {
        let input = raw();
        let out = coerce_types(&input).unwrap().data;
        assert_eq!(out.get_column_names(), input.get_column_names());
        assert_eq!(out.height(), input.height());
    }

    #[test]
    fn coercing_twice_is_stable() {
        let once = coerce_types(&raw()).unwrap();
        let twice = coerce_types(&once.data).unwrap();
        assert!(once.data.equals_missing(&twice.data));
        assert_eq!(twice.report.years, once.report.years);
        assert_eq!(twice.report.total_anomalies(), 0);
    }

    #[test]
    fn date_values_are_calendar_days() {
        let out = coerce_types(&raw()).unwrap().data;
        let value = out.column(columns::DATA_INICIO_PROCESSO).unwrap().get(0).unwrap();
        let expected = NaiveDate::from_ymd_opt(2022, 3, 1).unwrap();
        assert_eq!(value, AnyValue::Date(days_since_epoch(expected).unwrap()));
    }
}
