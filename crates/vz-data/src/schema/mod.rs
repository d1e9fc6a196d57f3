//! Column type inference and column summaries

use ahash::AHashSet;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use vz_core::datetime::looks_like_datetime;
use vz_core::{Column, ColumnType, Table, Value};

static NUMERIC_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("numeric pattern is valid"));

/// Whether text reads as a plain decimal number that fits in an f64
pub fn is_numeric_text(value: &str) -> bool {
    let value = value.trim();
    NUMERIC_PATTERN.is_match(value) && value.parse::<f64>().is_ok_and(f64::is_finite)
}

/// Infer the type of one column from its values
pub fn infer_column_type<'a>(values: impl IntoIterator<Item = &'a Value>) -> ColumnType {
    let mut seen_any = false;
    let mut is_numeric = true;
    let mut is_datetime = true;

    for value in values {
        match value {
            Value::Null => continue,
            Value::Number(_) => {
                is_datetime = false;
            }
            Value::Text(text) => {
                if is_numeric && !is_numeric_text(text) {
                    is_numeric = false;
                }
                if is_datetime && !looks_like_datetime(text) {
                    is_datetime = false;
                }
            }
            Value::Bool(_) => {
                is_numeric = false;
                is_datetime = false;
            }
        }
        seen_any = true;

        if !is_numeric && !is_datetime {
            break;
        }
    }

    if !seen_any {
        ColumnType::Categorical
    } else if is_numeric {
        ColumnType::Numeric
    } else if is_datetime {
        ColumnType::Datetime
    } else {
        ColumnType::Categorical
    }
}

/// Detects column types over fully built rows and summarizes tables
pub struct SchemaDetector {
    sample_size: usize,
}

/// Preview statistics about a column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub column_type: ColumnType,
    pub null_count: usize,
    pub distinct_count: usize,
    pub sample_values: Vec<String>,
}

impl SchemaDetector {
    /// Create a new schema detector
    pub fn new() -> Self {
        Self { sample_size: 3 }
    }

    /// Set how many sample values each summary keeps
    pub fn with_sample_size(mut self, size: usize) -> Self {
        self.sample_size = size;
        self
    }

    /// Type every column and convert numeric text in numeric columns
    pub fn detect(&self, names: Vec<String>, mut rows: Vec<Vec<Value>>) -> (Vec<Column>, Vec<Vec<Value>>) {
        let mut columns = Vec::with_capacity(names.len());

        for (col_idx, name) in names.into_iter().enumerate() {
            let column_type = infer_column_type(rows.iter().filter_map(|row| row.get(col_idx)));
            debug!("Column '{}' inferred as {}", name, column_type);

            if column_type == ColumnType::Numeric {
                for row in rows.iter_mut() {
                    if let Some(cell) = row.get_mut(col_idx) {
                        Self::coerce_number(cell);
                    }
                }
            }

            columns.push(Column::new(name, column_type));
        }

        (columns, rows)
    }

    fn coerce_number(cell: &mut Value) {
        if let Value::Text(text) = cell {
            if let Ok(number) = text.trim().parse::<f64>() {
                *cell = Value::Number(number);
            }
        }
    }

    /// Summaries for every column of a table, in column order
    pub fn summarize(&self, table: &Table) -> Vec<ColumnSummary> {
        table
            .columns()
            .iter()
            .enumerate()
            .map(|(col_idx, column)| self.summarize_column(table, col_idx, column))
            .collect()
    }

    fn summarize_column(&self, table: &Table, col_idx: usize, column: &Column) -> ColumnSummary {
        let mut null_count = 0;
        let mut distinct = AHashSet::new();
        let mut sample_values = Vec::new();

        for row in table.rows() {
            let value = &row[col_idx];
            if value.is_null() {
                null_count += 1;
                continue;
            }
            let text = value.to_string();
            if sample_values.len() < self.sample_size && !sample_values.contains(&text) {
                sample_values.push(text.clone());
            }
            distinct.insert(text);
        }

        ColumnSummary {
            name: column.name.clone(),
            column_type: column.column_type,
            null_count,
            distinct_count: distinct.len(),
            sample_values,
        }
    }
}

impl Default for SchemaDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vz_core::TableOrigin;

    fn text(values: &[&str]) -> Vec<Value> {
        values.iter().map(|v| Value::Text(v.to_string())).collect()
    }

    #[test]
    fn test_numeric_pattern() {
        assert!(is_numeric_text("100"));
        assert!(is_numeric_text("-3.25"));
        assert!(is_numeric_text(" 42 "));
        assert!(!is_numeric_text("1e5"));
        assert!(!is_numeric_text("+1"));
        assert!(!is_numeric_text(".5"));
        assert!(!is_numeric_text("1,000"));
        // Matches the pattern but overflows to infinity
        assert!(!is_numeric_text(&"9".repeat(400)));
    }

    #[test]
    fn test_single_non_numeric_value_makes_column_non_numeric() {
        assert_eq!(infer_column_type(&text(&["1", "2", "3"])), ColumnType::Numeric);
        assert_eq!(
            infer_column_type(&text(&["1", "2", "three"])),
            ColumnType::Categorical
        );
    }

    #[test]
    fn test_nulls_are_ignored() {
        let values = vec![Value::Null, Value::Text("5".into()), Value::Null];
        assert_eq!(infer_column_type(&values), ColumnType::Numeric);
        assert_eq!(
            infer_column_type(&[Value::Null, Value::Null]),
            ColumnType::Categorical
        );
    }

    #[test]
    fn test_datetime_and_bool_columns() {
        assert_eq!(
            infer_column_type(&text(&["2024-01", "2024-02"])),
            ColumnType::Datetime
        );
        assert_eq!(
            infer_column_type(&text(&["2024-01-05", "05/01/2024"])),
            ColumnType::Datetime
        );
        assert_eq!(
            infer_column_type(&[Value::Bool(true), Value::Bool(false)]),
            ColumnType::Categorical
        );
        assert_eq!(
            infer_column_type(&[Value::Number(1.0), Value::Text("2".into())]),
            ColumnType::Numeric
        );
    }

    #[test]
    fn test_detect_converts_numeric_text() {
        let (columns, rows) = SchemaDetector::new().detect(
            vec!["Name".into(), "Sales".into()],
            vec![text(&["a", "10"]), vec![Value::Text("b".into()), Value::Null]],
        );
        assert_eq!(columns[0].column_type, ColumnType::Categorical);
        assert_eq!(columns[1].column_type, ColumnType::Numeric);
        assert_eq!(rows[0][1], Value::Number(10.0));
        assert_eq!(rows[0][0], Value::Text("a".into()));
        assert_eq!(rows[1][1], Value::Null);
    }

    #[test]
    fn test_summarize() {
        let detector = SchemaDetector::new().with_sample_size(2);
        let (columns, rows) = detector.detect(
            vec!["Region".into()],
            vec![
                text(&["North"]),
                text(&["South"]),
                text(&["North"]),
                vec![Value::Null],
                text(&["East"]),
            ],
        );
        let table = Table::new("t", TableOrigin::default(), columns, rows).unwrap();
        let summary = &detector.summarize(&table)[0];
        assert_eq!(summary.null_count, 1);
        assert_eq!(summary.distinct_count, 3);
        assert_eq!(summary.sample_values, vec!["North", "South"]);
    }
}
