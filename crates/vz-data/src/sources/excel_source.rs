//! XLSX/XLS reader backed by calamine

use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType, Reader};
use chrono::Timelike;
use tracing::debug;
use vz_core::Value;

use super::{pad_row, text_cell, RawTable};
use crate::config::LoadOptions;
use crate::DataError;

/// Read the first worksheet; its first row is the header
pub fn read(path: &Path, options: &LoadOptions) -> Result<RawTable, DataError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| DataError::malformed(path, "workbook has no worksheets"))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DataError::malformed(path, "workbook has no worksheets"))??;
    debug!("Reading sheet '{}' of {}", sheet, path.display());

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| DataError::malformed(path, format!("sheet '{sheet}' is empty")))?;
    let headers: Vec<String> = header.iter().map(header_text).collect();
    let width = headers.len();

    let rows = rows
        .map(|cells| {
            let mut row: Vec<Value> = cells.iter().map(|cell| cell_value(cell, options)).collect();
            pad_row(&mut row, width);
            row
        })
        .collect();

    Ok(RawTable {
        headers,
        rows,
        delimiter: None,
        sheet: Some(sheet),
    })
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.as_string().unwrap_or_else(|| other.to_string()),
    }
}

fn cell_value(cell: &Data, options: &LoadOptions) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::Int(i) => Value::Number(*i as f64),
        Data::Float(f) => Value::Number(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) => text_cell(s, options),
        Data::DateTimeIso(s) | Data::DurationIso(s) => text_cell(s, options),
        Data::DateTime(_) => match cell.as_datetime() {
            Some(dt) if dt.num_seconds_from_midnight() == 0 && dt.nanosecond() == 0 => {
                Value::Text(dt.format("%Y-%m-%d").to_string())
            }
            Some(dt) => Value::Text(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Value::Text(cell.to_string()),
        },
    }
}
