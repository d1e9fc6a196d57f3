//! JSON reader for record arrays and columnar objects

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use indexmap::IndexSet;
use serde_json::{Map, Value as JsonValue};
use tracing::debug;
use vz_core::Value;

use super::{text_cell, RawTable};
use crate::config::LoadOptions;
use crate::DataError;

/// Read `[{..}, {..}]` or `{"col": [..], ..}`
pub fn read(path: &Path, options: &LoadOptions) -> Result<RawTable, DataError> {
    let file = File::open(path)?;
    let document: JsonValue = serde_json::from_reader(BufReader::new(file))?;

    match document {
        JsonValue::Array(items) => read_records(path, items, options),
        JsonValue::Object(object) => read_columns(path, object, options),
        _ => Err(DataError::malformed(
            path,
            "expected an array of objects or an object of arrays",
        )),
    }
}

fn read_records(
    path: &Path,
    items: Vec<JsonValue>,
    options: &LoadOptions,
) -> Result<RawTable, DataError> {
    if items.is_empty() {
        return Err(DataError::malformed(path, "array is empty"));
    }

    let mut records = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        match item {
            JsonValue::Object(record) => records.push(record),
            _ => {
                return Err(DataError::malformed(
                    path,
                    format!("element {idx} is not an object"),
                ))
            }
        }
    }

    let keys: IndexSet<String> = records
        .iter()
        .flat_map(|record| record.keys().cloned())
        .collect();
    if keys.is_empty() {
        return Err(DataError::malformed(path, "records have no fields"));
    }
    debug!("JSON records with {} distinct keys", keys.len());

    let rows = records
        .iter()
        .map(|record| {
            keys.iter()
                .map(|key| record.get(key).map_or(Value::Null, |v| json_cell(v, options)))
                .collect()
        })
        .collect();

    Ok(RawTable {
        headers: keys.into_iter().collect(),
        rows,
        delimiter: None,
        sheet: None,
    })
}

fn read_columns(
    path: &Path,
    object: Map<String, JsonValue>,
    options: &LoadOptions,
) -> Result<RawTable, DataError> {
    if object.is_empty() {
        return Err(DataError::malformed(path, "object is empty"));
    }

    let mut headers = Vec::with_capacity(object.len());
    let mut columns = Vec::with_capacity(object.len());
    for (key, value) in object {
        match value {
            JsonValue::Array(values) => {
                headers.push(key);
                columns.push(values);
            }
            _ => {
                return Err(DataError::malformed(
                    path,
                    format!("field '{key}' is not an array"),
                ))
            }
        }
    }

    let length = columns[0].len();
    if let Some(idx) = columns.iter().position(|c| c.len() != length) {
        return Err(DataError::malformed(
            path,
            format!(
                "column '{}' has {} values, expected {}",
                headers[idx],
                columns[idx].len(),
                length
            ),
        ));
    }

    let rows = (0..length)
        .map(|row| {
            columns
                .iter()
                .map(|column| json_cell(&column[row], options))
                .collect()
        })
        .collect();

    Ok(RawTable {
        headers,
        rows,
        delimiter: None,
        sheet: None,
    })
}

fn json_cell(value: &JsonValue, options: &LoadOptions) -> Value {
    match value {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
        JsonValue::String(s) => text_cell(s, options),
        // Nested values are kept as their JSON text
        nested => Value::Text(nested.to_string()),
    }
}
