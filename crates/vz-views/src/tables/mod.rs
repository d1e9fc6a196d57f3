//! Text table display

use anyhow::Result;
use arrow::util::pretty::pretty_format_batches;
use vz_core::Table;

use crate::chart::ValidatedChart;

/// Default number of rows shown by a table display
pub const DEFAULT_TABLE_ROWS: usize = 10;

/// Pretty-print the first `rows` rows of a table
pub fn format_rows(table: &Table, rows: usize) -> Result<String> {
    let batch = table.head(rows).to_record_batch()?;
    Ok(pretty_format_batches(&[batch])?.to_string())
}

/// Render a validated table-display chart as terminal text
pub fn render_text(chart: &ValidatedChart) -> Result<String> {
    let rows = chart.row_limit.unwrap_or(DEFAULT_TABLE_ROWS);
    let mut out = String::new();

    for table in &chart.tables {
        out.push_str(&format!("{} ({})\n", chart.title, table.name()));
        out.push_str(&format_rows(table, rows)?);
        out.push_str(&format!(
            "\nShowing {} of {} rows\n",
            rows.min(table.row_count()),
            table.row_count()
        ));
    }

    Ok(out)
}
