//! Format handlers producing a uniform [`Table`]

pub mod csv_source;
pub mod delimiter;
pub mod excel_source;
pub mod json_source;

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info};
use vz_core::{Table, TableOrigin, Value};

use crate::config::LoadOptions;
use crate::format::{FileDescriptor, SupportedFormat};
use crate::schema::SchemaDetector;
use crate::DataError;

/// Header and rows read by a format handler, before typing
#[derive(Debug, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub delimiter: Option<char>,
    pub sheet: Option<String>,
}

/// Load a classified file into a typed table
pub fn load(descriptor: &FileDescriptor, options: &LoadOptions) -> Result<Table, DataError> {
    let path = descriptor.path.as_path();
    if descriptor.size_bytes > options.max_file_size_bytes() {
        return Err(DataError::malformed(
            path,
            format!(
                "file is {:.1} MB, larger than the {} MB limit",
                descriptor.size_bytes as f64 / (1024.0 * 1024.0),
                options.max_file_size_mb
            ),
        ));
    }

    info!("Loading {} as {}", descriptor.name, descriptor.format);

    let raw = match descriptor.format {
        SupportedFormat::Csv => csv_source::read(path, b',', options),
        SupportedFormat::Xlsx | SupportedFormat::Xls => excel_source::read(path, options),
        SupportedFormat::Json => json_source::read(path, options),
        SupportedFormat::Txt => delimiter::sniff_file(path, options.sniff_lines)
            .and_then(|delimiter| csv_source::read(path, delimiter, options)),
    }
    .map_err(|e| e.with_path(path))?;

    let table = build_table(descriptor, raw)?;
    info!(
        "Loaded {}: {} rows x {} columns",
        table.name(),
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}

/// Classify and load in one step
pub fn load_path(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Table, DataError> {
    let descriptor = FileDescriptor::open(path)?;
    load(&descriptor, options)
}

fn build_table(descriptor: &FileDescriptor, raw: RawTable) -> Result<Table, DataError> {
    let path = descriptor.path.as_path();
    if raw.headers.is_empty() {
        return Err(DataError::malformed(path, "no header row"));
    }
    if raw.rows.is_empty() {
        return Err(DataError::malformed(path, "no data rows"));
    }

    let mut origin = TableOrigin::new(path, descriptor.format.label());
    if let Some(delimiter) = raw.delimiter {
        origin = origin.with_delimiter(delimiter);
    }
    if let Some(sheet) = raw.sheet {
        origin = origin.with_sheet(sheet);
    }

    let headers = normalize_headers(raw.headers);
    let (columns, rows) = SchemaDetector::new().detect(headers, raw.rows);

    Table::new(descriptor.name.clone(), origin, columns, rows)
        .map_err(|e| DataError::malformed(path, e.to_string()))
}

/// Trim headers, name blank ones `column_<n>` and suffix duplicates `.1`, `.2`, ...
pub fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut taken = HashSet::with_capacity(raw.len());
    let mut headers = Vec::with_capacity(raw.len());

    for (idx, header) in raw.into_iter().enumerate() {
        let trimmed = header.trim();
        let base = if trimmed.is_empty() {
            format!("column_{}", idx + 1)
        } else {
            trimmed.to_string()
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while taken.contains(&name) {
            name = format!("{base}.{suffix}");
            suffix += 1;
        }
        if name != base {
            debug!("Renamed duplicate header '{}' to '{}'", base, name);
        }

        taken.insert(name.clone());
        headers.push(name);
    }

    headers
}

/// Pad a short row with nulls up to `width`
pub(crate) fn pad_row(row: &mut Vec<Value>, width: usize) {
    if row.len() < width {
        row.resize(width, Value::Null);
    }
}

/// Turn a text cell into a value, honoring the null tokens
pub(crate) fn text_cell(text: &str, options: &LoadOptions) -> Value {
    if options.null_config.is_null(text) {
        Value::Null
    } else {
        Value::Text(text.to_string())
    }
}
