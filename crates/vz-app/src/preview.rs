//! Data previews printed after loading

use anyhow::Result;
use vz_core::Table;
use vz_data::{FileDescriptor, SchemaDetector};
use vz_views::tables::format_rows;

pub fn file_info(descriptor: &FileDescriptor) -> String {
    format!(
        "File Info:\n   Name: {}\n   Size: {:.2} KB\n   Type: {}",
        descriptor.name,
        descriptor.size_kb(),
        descriptor.format.label()
    )
}

/// First rows, shape and typed column list of a table
pub fn render_preview(table: &Table, rows: usize) -> Result<String> {
    let mut out = format!("Data Preview ({}, first {} rows):\n", table.name(), rows);
    out.push_str(&format_rows(table, rows)?);
    out.push_str(&format!(
        "\nShape: {} rows x {} columns\nColumns:",
        table.row_count(),
        table.column_count()
    ));

    for summary in SchemaDetector::new().summarize(table) {
        out.push_str(&format!(
            "\n  - {} ({}, {} nulls, {} distinct",
            summary.name, summary.column_type, summary.null_count, summary.distinct_count
        ));
        if !summary.sample_values.is_empty() {
            out.push_str(&format!(", e.g. {}", summary.sample_values.join(", ")));
        }
        out.push(')');
    }

    Ok(out)
}
