use std::collections::BTreeSet;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use cnpq_cli::types::{BuildReport, YearSummary};
use cnpq_query::{CategoryValue, GroupTotal, RegionMean, YearCategoryMean};

pub fn print_build_summary(report: &BuildReport) {
    println!("CSV: {}", report.csv.display());
    match (&report.parquet, &report.parquet_error) {
        (Some(path), _) => println!("Parquet: {}", path.display()),
        (None, Some(error)) => println!("Parquet: not written ({error})"),
        (None, None) => println!("Parquet: skipped"),
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Year"),
        header_cell("Source"),
        header_cell("Encoding"),
        header_cell("Rows"),
        header_cell("Anomalies"),
        header_cell("Years recognised"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    let mut total_rows = 0usize;
    let mut total_anomalies = 0usize;
    for year in &report.years {
        total_rows += year.rows;
        total_anomalies += year.total_anomalies();
        table.add_row(vec![
            Cell::new(year.year)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            source_cell(year),
            Cell::new(year.encoding.unwrap_or("-")),
            Cell::new(year.rows),
            count_cell(year.total_anomalies(), Color::Yellow),
            Cell::new(join_years(&year.years_recognised)),
        ]);
    }
    for failure in &report.failures {
        table.add_row(vec![
            Cell::new(failure.year)
                .fg(Color::Red)
                .add_attribute(Attribute::Bold),
            Cell::new("FAILED").fg(Color::Red),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        count_cell(total_anomalies, Color::Yellow).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
    println!(
        "Unified: {} rows ({} dropped without process and year)",
        report.rows, report.dropped_rows
    );
    print_anomaly_table(report);
    if !report.failures.is_empty() {
        eprintln!("Errors:");
        for failure in &report.failures {
            eprintln!("- {}: {}", failure.year, failure.message);
        }
    }
}

fn print_anomaly_table(report: &BuildReport) {
    let rows: Vec<(&YearSummary, &String, usize)> = report
        .years
        .iter()
        .flat_map(|year| {
            year.anomalies
                .iter()
                .map(move |(column, count)| (year, column, *count))
        })
        .collect();
    if rows.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Year"),
        header_cell("Column"),
        header_cell("Values nulled"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for (year, column, count) in rows {
        table.add_row(vec![
            Cell::new(year.year),
            Cell::new(column),
            count_cell(count, Color::Yellow),
        ]);
    }
    println!();
    println!("Coercion anomalies:");
    println!("{table}");
}

pub fn print_years(years: &BTreeSet<i32>) {
    if years.is_empty() {
        println!("No reference years found.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Reference year")]);
    apply_table_style(&mut table);
    for year in years {
        table.add_row(vec![Cell::new(year)]);
    }
    println!("{table}");
}

pub fn print_region_means(year: i32, means: &[RegionMean]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Region"),
        header_cell("Mean paid"),
        header_cell("Rows"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for mean in means {
        table.add_row(vec![
            Cell::new(&mean.region).add_attribute(Attribute::Bold),
            mean.mean.map_or_else(|| dim_cell("-"), |m| Cell::new(money(m))),
            Cell::new(mean.rows),
        ]);
    }
    println!("Year: {year}");
    println!("{table}");
}

pub fn print_totals(label: &str, totals: &[GroupTotal]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell(label),
        header_cell("Total paid"),
        header_cell("Rows"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for total in totals {
        table.add_row(vec![
            Cell::new(&total.key),
            Cell::new(money(total.total)),
            Cell::new(total.rows),
        ]);
    }
    println!("{table}");
}

pub fn print_categories(metric: &str, values: &[CategoryValue]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Category"),
        header_cell(metric),
        header_cell("Base"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for value in values {
        table.add_row(vec![
            Cell::new(&value.category),
            Cell::new(money(value.value)),
            Cell::new(value.base),
        ]);
    }
    println!("{table}");
}

pub fn print_trend(series: &[YearCategoryMean]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Year"),
        header_cell("Category"),
        header_cell("Mean paid"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for point in series {
        table.add_row(vec![
            Cell::new(point.year),
            Cell::new(&point.category),
            Cell::new(money(point.mean)),
        ]);
    }
    println!("{table}");
}

pub fn print_notes(notes: &[String]) {
    if notes.is_empty() {
        println!("No issues found.");
        return;
    }
    for note in notes {
        println!("- {note}");
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn source_cell(year: &YearSummary) -> Cell {
    if year.from_cache {
        Cell::new("cache").fg(Color::DarkGrey)
    } else {
        Cell::new("raw").fg(Color::Green)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn join_years(years: &BTreeSet<i32>) -> String {
    if years.is_empty() {
        return "-".to_string();
    }
    years
        .iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Two decimals with `.` thousands grouping and `,` decimals, as the ledgers print money.
fn money(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((&formatted, "00"));
    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}R$ {grouped},{frac_part}")
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_uses_brazilian_grouping() {
        assert_eq!(money(1234.5), "R$ 1.234,50");
        assert_eq!(money(999.0), "R$ 999,00");
        assert_eq!(money(1_000_000.0), "R$ 1.000.000,00");
        assert_eq!(money(-12.5), "-R$ 12,50");
    }
}
