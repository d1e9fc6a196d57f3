//! Delimited text reader shared by CSV and TXT files

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;
use vz_core::Value;

use super::{pad_row, text_cell, RawTable};
use crate::config::LoadOptions;
use crate::DataError;

/// Read a delimited file whose first record is the header
pub fn read(path: &Path, delimiter: u8, options: &LoadOptions) -> Result<RawTable, DataError> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(delimiter)
        .from_reader(BufReader::new(file));

    let mut records = reader.records();
    let header = loop {
        match records.next() {
            Some(record) => {
                let record = record?;
                if !is_blank(&record) {
                    break record;
                }
            }
            None => return Err(DataError::malformed(path, "file is empty")),
        }
    };

    let headers: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            if idx == 0 {
                field.trim_start_matches('\u{feff}').to_string()
            } else {
                field.to_string()
            }
        })
        .collect();
    let width = headers.len();

    let mut rows = Vec::new();
    let mut padded = 0usize;
    for record in records {
        let record = record?;
        if is_blank(&record) {
            continue;
        }
        if record.len() > width {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(DataError::malformed(
                path,
                format!(
                    "line {} has {} fields, expected at most {}",
                    line,
                    record.len(),
                    width
                ),
            ));
        }

        let mut row: Vec<Value> = record.iter().map(|field| text_cell(field, options)).collect();
        if row.len() < width {
            padded += 1;
            pad_row(&mut row, width);
        }
        rows.push(row);
    }

    if padded > 0 {
        debug!("Padded {} short rows in {}", padded, path.display());
    }

    Ok(RawTable {
        headers,
        rows,
        delimiter: Some(char::from(delimiter)),
        sheet: None,
    })
}

fn is_blank(record: &StringRecord) -> bool {
    record.len() == 1 && record.get(0).map_or(true, str::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn read_str(contents: &str) -> Result<RawTable, DataError> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, contents).unwrap();
        read(&path, b',', &LoadOptions::default())
    }

    #[test]
    fn test_reads_header_and_rows() {
        let raw = read_str("Date,Sales\n2024-01,100\n2024-02,150\n").unwrap();
        assert_eq!(raw.headers, vec!["Date", "Sales"]);
        assert_eq!(raw.rows.len(), 2);
        assert_eq!(raw.rows[1][1], Value::Text("150".into()));
        assert_eq!(raw.delimiter, Some(','));
    }

    #[test]
    fn test_short_rows_padded_with_nulls() {
        let raw = read_str("a,b,c\n1,2,3\n4\n").unwrap();
        assert_eq!(
            raw.rows[1],
            vec![Value::Text("4".into()), Value::Null, Value::Null]
        );
    }

    #[test]
    fn test_long_rows_rejected() {
        let err = read_str("a,b\n1,2\n3,4,5\n").unwrap_err();
        match err {
            DataError::MalformedData { reason, .. } => assert!(reason.contains("line 3"), "{reason}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_file_rejected() {
        assert!(matches!(
            read_str(""),
            Err(DataError::MalformedData { .. })
        ));
    }

    #[test]
    fn test_null_tokens_and_trimming() {
        let raw = read_str("name,score\n  Ann , NA\nBob,-\n\n\"Cy, Jr\",7\n").unwrap();
        assert_eq!(raw.rows.len(), 3);
        assert_eq!(raw.rows[0], vec![Value::Text("Ann".into()), Value::Null]);
        assert_eq!(raw.rows[1][1], Value::Null);
        assert_eq!(raw.rows[2][0], Value::Text("Cy, Jr".into()));
    }

    #[test]
    fn test_header_only_has_no_rows() {
        let raw = read_str("a,b\n").unwrap();
        assert!(raw.rows.is_empty());
    }
}
