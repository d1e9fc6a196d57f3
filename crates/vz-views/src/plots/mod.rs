//! Chart rendering

pub mod bar;
pub mod histogram;
pub mod line;

// Utilities
pub mod utils;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::info;

use crate::chart::{ChartKind, ColumnRole, ValidatedChart};
use crate::export::{sanitize_file_component, ExportOptions, CHART_EXTENSION};
use crate::tables;

pub use bar::draw_bar;
pub use histogram::draw_histogram;
pub use line::draw_line;

/// What a render produced
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutput {
    /// A chart file written to disk
    File(PathBuf),
    /// Text meant for the terminal
    Text(String),
}

/// Draws validated charts
pub trait ChartRenderer {
    fn render(&mut self, chart: &ValidatedChart) -> Result<RenderOutput>;
}

/// Renders charts to SVG files with plotters
pub struct PlottersRenderer {
    options: ExportOptions,
    written: HashSet<PathBuf>,
}

impl PlottersRenderer {
    pub fn new(options: ExportOptions) -> Self {
        Self {
            options,
            written: HashSet::new(),
        }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// File name for a chart, without directory
    pub fn file_name(chart: &ValidatedChart) -> String {
        let column = |role| sanitize_file_component(chart.column(role).unwrap_or_default());
        let stem = if chart.comparison {
            format!("comparison_{}", column(ColumnRole::Y))
        } else {
            match chart.kind {
                ChartKind::Line => {
                    format!("line_chart_{}_{}", column(ColumnRole::X), column(ColumnRole::Y))
                }
                ChartKind::Bar => {
                    format!("bar_chart_{}_{}", column(ColumnRole::X), column(ColumnRole::Y))
                }
                ChartKind::Histogram => format!("histogram_{}", column(ColumnRole::Value)),
                ChartKind::Table => format!("table_{}", sanitize_file_component(&chart.title)),
            }
        };
        format!("{stem}.{CHART_EXTENSION}")
    }

    /// Output path that does not overwrite a chart written earlier in this session
    fn output_path(&mut self, chart: &ValidatedChart) -> PathBuf {
        let name = Self::file_name(chart);
        let stem = name.trim_end_matches(&format!(".{CHART_EXTENSION}")).to_string();
        let mut path = self.options.output_dir.join(&name);
        let mut counter = 2;
        while self.written.contains(&path) {
            path = self
                .options
                .output_dir
                .join(format!("{stem}_{counter}.{CHART_EXTENSION}"));
            counter += 1;
        }
        self.written.insert(path.clone());
        path
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, chart: &ValidatedChart) -> Result<()> {
        match chart.kind {
            ChartKind::Line => draw_line(root, chart, &utils::collect_xy_series(chart, false)?),
            ChartKind::Bar => draw_bar(root, chart, &utils::collect_xy_series(chart, true)?),
            ChartKind::Histogram => {
                let column = chart
                    .column(ColumnRole::Value)
                    .context("histogram has no value column")?;
                let mut values = Vec::new();
                for table in &chart.tables {
                    let batch = table.to_record_batch()?;
                    values.extend(utils::extract_numeric_values(&batch, column)?.into_iter().flatten());
                }
                draw_histogram(root, chart, &values, self.options.histogram_bins)
            }
            ChartKind::Table => Ok(()),
        }
    }

    fn write_file(&self, path: &Path, chart: &ValidatedChart) -> Result<()> {
        let root = SVGBackend::new(path, (self.options.width, self.options.height))
            .into_drawing_area();
        self.draw(&root, chart)
    }
}

impl Default for PlottersRenderer {
    fn default() -> Self {
        Self::new(ExportOptions::default())
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(&mut self, chart: &ValidatedChart) -> Result<RenderOutput> {
        if chart.kind == ChartKind::Table {
            return tables::render_text(chart).map(RenderOutput::Text);
        }

        fs::create_dir_all(&self.options.output_dir).with_context(|| {
            format!(
                "Failed to create output directory {}",
                self.options.output_dir.display()
            )
        })?;

        let path = self.output_path(chart);
        self.write_file(&path, chart)
            .with_context(|| format!("Failed to render {}", path.display()))?;

        info!("{} saved as {}", chart.kind, path.display());
        Ok(RenderOutput::File(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartRequest;
    use crate::mapping::validate;
    use std::sync::Arc;
    use tempfile::tempdir;
    use vz_core::{Column, ColumnType, Table, TableOrigin, Value};

    fn sales(name: &str) -> Arc<Table> {
        Arc::new(
            Table::new(
                name,
                TableOrigin::new(name, "CSV"),
                vec![
                    Column::new("Date", ColumnType::Datetime),
                    Column::new("Sales (USD)", ColumnType::Numeric),
                ],
                vec![
                    vec![Value::Text("2024-01".into()), Value::Number(100.0)],
                    vec![Value::Text("2024-02".into()), Value::Number(150.0)],
                    vec![Value::Text("2024-03".into()), Value::Null],
                ],
            )
            .unwrap(),
        )
    }

    fn renderer(dir: &Path) -> PlottersRenderer {
        PlottersRenderer::new(ExportOptions {
            output_dir: dir.to_path_buf(),
            ..ExportOptions::default()
        })
    }

    #[test]
    fn test_file_names() {
        let line = validate(
            &ChartRequest::new(ChartKind::Line, sales("a.csv"))
                .with_role(ColumnRole::X, "Date")
                .with_role(ColumnRole::Y, "Sales (USD)"),
        )
        .unwrap();
        assert_eq!(
            PlottersRenderer::file_name(&line),
            "line_chart_Date_Sales__USD_.svg"
        );

        let histogram = validate(
            &ChartRequest::new(ChartKind::Histogram, sales("a.csv"))
                .with_role(ColumnRole::Value, "Sales (USD)"),
        )
        .unwrap();
        assert_eq!(
            PlottersRenderer::file_name(&histogram),
            "histogram_Sales__USD_.svg"
        );

        let comparison = validate(
            &ChartRequest::comparison(ChartKind::Line, vec![sales("a.csv"), sales("b.csv")])
                .with_role(ColumnRole::X, "Date")
                .with_role(ColumnRole::Y, "Sales (USD)"),
        )
        .unwrap();
        assert_eq!(
            PlottersRenderer::file_name(&comparison),
            "comparison_Sales__USD_.svg"
        );
    }

    #[test]
    fn test_render_svg_files() {
        let dir = tempdir().unwrap();
        let mut renderer = renderer(dir.path());

        for kind in [ChartKind::Line, ChartKind::Bar] {
            let chart = validate(
                &ChartRequest::new(kind, sales("a.csv"))
                    .with_role(ColumnRole::X, "Date")
                    .with_role(ColumnRole::Y, "Sales (USD)"),
            )
            .unwrap();
            match renderer.render(&chart).unwrap() {
                RenderOutput::File(path) => {
                    let svg = fs::read_to_string(&path).unwrap();
                    assert!(svg.contains("<svg"));
                }
                other => panic!("unexpected output: {other:?}"),
            }
        }

        let histogram = validate(
            &ChartRequest::new(ChartKind::Histogram, sales("a.csv"))
                .with_role(ColumnRole::Value, "Sales (USD)"),
        )
        .unwrap();
        assert!(matches!(
            renderer.render(&histogram).unwrap(),
            RenderOutput::File(_)
        ));
    }

    #[test]
    fn test_infinite_values_do_not_stall_rendering() {
        let dir = tempdir().unwrap();
        let mut renderer = renderer(dir.path());
        let table = Arc::new(
            Table::new(
                "extreme.csv",
                TableOrigin::new("extreme.csv", "CSV"),
                vec![
                    Column::new("Label", ColumnType::Categorical),
                    Column::new("Amount", ColumnType::Numeric),
                ],
                vec![
                    vec![Value::Text("a".into()), Value::Number(1.0)],
                    vec![Value::Text("b".into()), Value::Number(f64::INFINITY)],
                    vec![Value::Text("c".into()), Value::Number(1e300)],
                ],
            )
            .unwrap(),
        );

        let histogram = validate(
            &ChartRequest::new(ChartKind::Histogram, table.clone()).with_role(ColumnRole::Value, "Amount"),
        )
        .unwrap();
        assert!(matches!(renderer.render(&histogram).unwrap(), RenderOutput::File(_)));

        for kind in [ChartKind::Line, ChartKind::Bar] {
            let chart = validate(
                &ChartRequest::new(kind, table.clone())
                    .with_role(ColumnRole::X, "Label")
                    .with_role(ColumnRole::Y, "Amount"),
            )
            .unwrap();
            assert!(matches!(renderer.render(&chart).unwrap(), RenderOutput::File(_)));
        }
    }

    #[test]
    fn test_repeated_chart_gets_new_file() {
        let dir = tempdir().unwrap();
        let mut renderer = renderer(dir.path());
        let chart = validate(
            &ChartRequest::new(ChartKind::Line, sales("a.csv"))
                .with_role(ColumnRole::X, "Date")
                .with_role(ColumnRole::Y, "Sales (USD)"),
        )
        .unwrap();

        let first = renderer.render(&chart).unwrap();
        let second = renderer.render(&chart).unwrap();
        assert_ne!(first, second);
        assert_eq!(
            second,
            RenderOutput::File(dir.path().join("line_chart_Date_Sales__USD__2.svg"))
        );
    }

    #[test]
    fn test_table_renders_text() {
        let chart = validate(&ChartRequest::new(ChartKind::Table, sales("a.csv")).with_row_limit(2)).unwrap();
        match PlottersRenderer::default().render(&chart).unwrap() {
            RenderOutput::Text(text) => {
                assert!(text.contains("Data Table"));
                assert!(text.contains("Sales (USD)"));
            }
            other => panic!("unexpected output: {other:?}"),
        }
    }
}
