//! Series extraction shared by the plot implementations

pub mod colors;

use std::fmt::Display;
use std::ops::Range;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use arrow::array::{Array, Float64Array};
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;
use indexmap::{IndexMap, IndexSet};
use vz_core::{ColumnType, Table};

use crate::chart::{ColumnRole, ValidatedChart};

/// Nullable numeric values of a Float64 column
pub fn extract_numeric_values(batch: &RecordBatch, column: &str) -> Result<Vec<Option<f64>>> {
    let array = batch
        .column_by_name(column)
        .with_context(|| format!("column '{column}' not found"))?;
    let values = array
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| anyhow!("column '{column}' is not numeric"))?;

    Ok((0..values.len())
        .map(|i| if values.is_null(i) { None } else { Some(values.value(i)) })
        .collect())
}

/// Display labels of any column; nulls become `None`
pub fn extract_labels(batch: &RecordBatch, column: &str) -> Result<Vec<Option<String>>> {
    let array = batch
        .column_by_name(column)
        .with_context(|| format!("column '{column}' not found"))?;

    (0..array.len())
        .map(|i| {
            if array.is_null(i) {
                Ok(None)
            } else {
                array_value_to_string(array, i).map(Some).map_err(Into::into)
            }
        })
        .collect()
}

/// Named points ready to be drawn
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

/// Points of every series plus the label axis used for non-numeric X columns
#[derive(Debug, Clone, PartialEq)]
pub struct XySeries {
    pub series: Vec<Series>,
    pub x_labels: Option<Vec<String>>,
}

/// Map a drawing error into `anyhow`
pub fn plot_error(error: impl Display) -> anyhow::Error {
    anyhow!("{error}")
}

/// Split the X/Y columns of a chart into series
///
/// Comparison charts get one series per table; otherwise series follow the
/// category column when one is mapped. Rows with a null Y (or a null numeric
/// X) are skipped. With `labels_only` every X value is placed on a label axis.
pub fn collect_xy_series(chart: &ValidatedChart, labels_only: bool) -> Result<XySeries> {
    let x_col = chart.column(ColumnRole::X).context("chart has no X column")?;
    let y_col = chart.column(ColumnRole::Y).context("chart has no Y column")?;
    let category = chart.column(ColumnRole::Category);

    let numeric_x = !labels_only
        && chart
            .tables
            .iter()
            .all(|t| t.column_type(x_col) == Some(ColumnType::Numeric));

    let mut labels: IndexSet<String> = IndexSet::new();
    let mut grouped: IndexMap<String, Vec<(f64, f64)>> = IndexMap::new();

    let table_labels = table_labels(&chart.tables);
    for (table, label) in chart.tables.iter().zip(&table_labels) {
        let batch = table.to_record_batch()?;
        let ys = extract_numeric_values(&batch, y_col)?;
        let xs: Vec<Option<f64>> = if numeric_x {
            extract_numeric_values(&batch, x_col)?
        } else {
            extract_labels(&batch, x_col)?
                .into_iter()
                .map(|label| {
                    let label = label.unwrap_or_else(|| "null".to_string());
                    Some(labels.insert_full(label).0 as f64)
                })
                .collect()
        };
        let categories = match category {
            Some(column) => Some(extract_labels(&batch, column)?),
            None => None,
        };

        for (row, (x, y)) in xs.into_iter().zip(ys).enumerate() {
            let (Some(x), Some(y)) = (x, y) else {
                continue;
            };
            if !x.is_finite() || !y.is_finite() {
                continue;
            }
            let name = series_name(chart, label, y_col, categories.as_ref().map(|c| &c[row]));
            grouped.entry(name).or_default().push((x, y));
        }
    }

    Ok(XySeries {
        series: grouped
            .into_iter()
            .map(|(name, points)| Series { name, points })
            .collect(),
        x_labels: if numeric_x {
            None
        } else {
            Some(labels.into_iter().collect())
        },
    })
}

/// Legend label per table: the file name, or the full path when names repeat
fn table_labels(tables: &[Arc<Table>]) -> Vec<String> {
    let names: Vec<&str> = tables.iter().map(|t| t.name()).collect();
    tables
        .iter()
        .map(|table| {
            if names.iter().filter(|&&name| name == table.name()).count() > 1 {
                table.path().display().to_string()
            } else {
                table.name().to_string()
            }
        })
        .collect()
}

fn series_name(
    chart: &ValidatedChart,
    table_label: &str,
    y_col: &str,
    category: Option<&Option<String>>,
) -> String {
    let category = category.map(|c| c.as_deref().unwrap_or("null"));
    match (chart.comparison, category) {
        (true, Some(category)) => format!("{table_label} / {category}"),
        (true, None) => table_label.to_string(),
        (false, Some(category)) => category.to_string(),
        (false, None) => y_col.to_string(),
    }
}

/// Largest axis bound; keeps the width of any axis range finite
pub const AXIS_LIMIT: f64 = f64::MAX / 2.0;

/// Range covering `values` with a small margin, never empty
pub fn padded_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    if (max - min).abs() < f64::EPSILON {
        return (min - 1.0)..(max + 1.0);
    }
    // Scaled before subtracting so extreme spans stay finite
    let margin = max * 0.05 - min * 0.05;
    (min - margin).max(-AXIS_LIMIT)..(max + margin).min(AXIS_LIMIT)
}

/// Label for a tick on a label axis, blank between slots
pub fn slot_label(labels: &[String], position: f64) -> String {
    let rounded = position.round();
    if (position - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartKind, ChartRequest};
    use crate::mapping::validate;
    use vz_core::{Column, TableOrigin, Value};

    fn table(name: &str, rows: &[(&str, &str, Option<f64>)]) -> Arc<Table> {
        Arc::new(
            Table::new(
                name,
                TableOrigin::new(name, "CSV"),
                vec![
                    Column::new("Month", ColumnType::Categorical),
                    Column::new("Region", ColumnType::Categorical),
                    Column::new("Sales", ColumnType::Numeric),
                ],
                rows.iter()
                    .map(|(m, r, s)| {
                        vec![
                            Value::Text(m.to_string()),
                            Value::Text(r.to_string()),
                            s.map_or(Value::Null, Value::Number),
                        ]
                    })
                    .collect(),
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_series_by_category() {
        let t = table(
            "a.csv",
            &[("Jan", "N", Some(1.0)), ("Jan", "S", Some(2.0)), ("Feb", "N", None)],
        );
        let chart = validate(
            &ChartRequest::new(ChartKind::Line, t)
                .with_role(ColumnRole::X, "Month")
                .with_role(ColumnRole::Y, "Sales")
                .with_role(ColumnRole::Category, "Region"),
        )
        .unwrap();

        let xy = collect_xy_series(&chart, false).unwrap();
        assert_eq!(xy.x_labels, Some(vec!["Jan".to_string(), "Feb".to_string()]));
        assert_eq!(xy.series.len(), 2);
        assert_eq!(xy.series[0].name, "N");
        assert_eq!(xy.series[0].points, vec![(0.0, 1.0)]);
    }

    #[test]
    fn test_comparison_series_per_table() {
        let a = table("a.csv", &[("Jan", "N", Some(1.0))]);
        let b = table("b.csv", &[("Feb", "N", Some(3.0))]);
        let chart = validate(
            &ChartRequest::comparison(ChartKind::Line, vec![a, b])
                .with_role(ColumnRole::X, "Month")
                .with_role(ColumnRole::Y, "Sales"),
        )
        .unwrap();

        let xy = collect_xy_series(&chart, false).unwrap();
        let names: Vec<&str> = xy.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a.csv", "b.csv"]);
        assert_eq!(xy.series[1].points, vec![(1.0, 3.0)]);
    }

    #[test]
    fn test_comparison_same_file_name_in_two_folders() {
        let north = Arc::new(
            Table::new(
                "sales.csv",
                TableOrigin::new("north/sales.csv", "CSV"),
                table("sales.csv", &[]).columns().to_vec(),
                vec![vec![
                    Value::Text("Jan".into()),
                    Value::Text("N".into()),
                    Value::Number(1.0),
                ]],
            )
            .unwrap(),
        );
        let south = Arc::new(
            Table::new(
                "sales.csv",
                TableOrigin::new("south/sales.csv", "CSV"),
                north.columns().to_vec(),
                vec![vec![
                    Value::Text("Jan".into()),
                    Value::Text("S".into()),
                    Value::Number(f64::INFINITY),
                ], vec![
                    Value::Text("Feb".into()),
                    Value::Text("S".into()),
                    Value::Number(2.0),
                ]],
            )
            .unwrap(),
        );
        let chart = validate(
            &ChartRequest::comparison(ChartKind::Bar, vec![north, south])
                .with_role(ColumnRole::X, "Month")
                .with_role(ColumnRole::Y, "Sales"),
        )
        .unwrap();

        let xy = collect_xy_series(&chart, true).unwrap();
        let names: Vec<&str> = xy.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["north/sales.csv", "south/sales.csv"]);
        // The infinite row is dropped
        assert_eq!(xy.series[1].points, vec![(1.0, 2.0)]);
    }

    #[test]
    fn test_padded_range() {
        assert_eq!(padded_range(Vec::new()), 0.0..1.0);
        assert_eq!(padded_range(vec![5.0]), 4.0..6.0);
        let range = padded_range(vec![0.0, 10.0]);
        assert!(range.start < 0.0 && range.end > 10.0);
        let wide = padded_range(vec![-f64::MAX, f64::MAX]);
        assert!((wide.end - wide.start).is_finite());
    }

    #[test]
    fn test_slot_label() {
        let labels = vec!["a".to_string(), "b".to_string()];
        assert_eq!(slot_label(&labels, 1.0), "b");
        assert_eq!(slot_label(&labels, 0.5), "");
        assert_eq!(slot_label(&labels, 7.0), "");
    }
}
