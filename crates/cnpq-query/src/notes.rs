use cnpq_model::columns::{ANO_REFERENCIA, SIGLA_UF_DESTINO, SIGLA_UF_ORIGEM, VALOR_PAGO};
use polars::prelude::DataFrame;

use crate::accessor::list_available_years;

/// Human-readable warnings about gaps that make the dataset unfit for analysis.
pub fn dataset_notes(df: &DataFrame) -> Vec<String> {
    let mut notes = Vec::new();

    match df.column(VALOR_PAGO) {
        Err(_) => notes.push(format!("Column '{VALOR_PAGO}' is missing from the dataset.")),
        Ok(column) if column.null_count() == column.len() => notes.push(format!(
            "Every '{VALOR_PAGO}' value is empty; check the currency conversion."
        )),
        Ok(_) => {}
    }

    if df.column(ANO_REFERENCIA).is_err() {
        notes.push(format!("Column '{ANO_REFERENCIA}' is missing from the dataset."));
    } else if list_available_years(df).is_empty() {
        notes.push(format!("No valid '{ANO_REFERENCIA}' found."));
    }

    if df.column(SIGLA_UF_DESTINO).is_err() && df.column(SIGLA_UF_ORIGEM).is_err() {
        notes.push(format!(
            "Region columns are missing ({SIGLA_UF_DESTINO} / {SIGLA_UF_ORIGEM})."
        ));
    }

    for note in &notes {
        tracing::warn!(note = %note, "dataset note");
    }
    notes
}
