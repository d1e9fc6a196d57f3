//! Chart kinds, column roles and chart requests

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vz_core::Table;

/// Kinds of chart the tool can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Histogram,
    Table,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Histogram,
        ChartKind::Table,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Line => "Line Chart",
            ChartKind::Bar => "Bar Chart",
            ChartKind::Histogram => "Histogram",
            ChartKind::Table => "Data Table",
        }
    }

    pub fn required_roles(&self) -> &'static [ColumnRole] {
        match self {
            ChartKind::Line | ChartKind::Bar => &[ColumnRole::X, ColumnRole::Y],
            ChartKind::Histogram => &[ColumnRole::Value],
            ChartKind::Table => &[ColumnRole::DisplayRowCount],
        }
    }

    pub fn optional_roles(&self) -> &'static [ColumnRole] {
        match self {
            ChartKind::Line | ChartKind::Bar => &[ColumnRole::Category],
            ChartKind::Histogram | ChartKind::Table => &[],
        }
    }

    pub fn uses_role(&self, role: ColumnRole) -> bool {
        self.required_roles().contains(&role) || self.optional_roles().contains(&role)
    }

    /// Whether several tables can be drawn on one chart
    pub fn supports_comparison(&self) -> bool {
        matches!(self, ChartKind::Line | ChartKind::Bar)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A named slot a chart kind needs filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ColumnRole {
    X,
    Y,
    Category,
    Value,
    DisplayRowCount,
}

impl ColumnRole {
    pub fn label(&self) -> &'static str {
        match self {
            ColumnRole::X => "X-axis",
            ColumnRole::Y => "Y-axis",
            ColumnRole::Category => "Category",
            ColumnRole::Value => "Value",
            ColumnRole::DisplayRowCount => "Rows to display",
        }
    }

    pub fn requires_numeric(&self) -> bool {
        matches!(self, ColumnRole::Y | ColumnRole::Value)
    }

    /// False for roles satisfied by a request setting rather than a column
    pub fn is_column(&self) -> bool {
        !matches!(self, ColumnRole::DisplayRowCount)
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A not-yet-validated instruction for one chart
#[derive(Debug, Clone)]
pub struct ChartRequest {
    pub kind: ChartKind,
    pub tables: Vec<Arc<Table>>,
    pub mapping: BTreeMap<ColumnRole, String>,
    pub title: Option<String>,
    pub row_limit: Option<usize>,
    pub comparison: bool,
}

impl ChartRequest {
    pub fn new(kind: ChartKind, table: Arc<Table>) -> Self {
        Self {
            kind,
            tables: vec![table],
            mapping: BTreeMap::new(),
            title: None,
            row_limit: None,
            comparison: false,
        }
    }

    /// One chart drawn over several tables
    pub fn comparison(kind: ChartKind, tables: Vec<Arc<Table>>) -> Self {
        Self {
            kind,
            tables,
            mapping: BTreeMap::new(),
            title: None,
            row_limit: None,
            comparison: true,
        }
    }

    pub fn with_role(mut self, role: ColumnRole, column: impl Into<String>) -> Self {
        self.mapping.insert(role, column.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_row_limit(mut self, rows: usize) -> Self {
        self.row_limit = Some(rows);
        self
    }

    /// Same chart settings applied to another table
    pub fn for_table(&self, table: Arc<Table>) -> Self {
        Self {
            tables: vec![table],
            comparison: false,
            ..self.clone()
        }
    }
}

/// A request whose mapping has been checked against its tables
#[derive(Debug, Clone)]
pub struct ValidatedChart {
    pub kind: ChartKind,
    pub tables: Vec<Arc<Table>>,
    pub mapping: BTreeMap<ColumnRole, String>,
    pub title: String,
    pub row_limit: Option<usize>,
    pub comparison: bool,
}

impl ValidatedChart {
    pub fn column(&self, role: ColumnRole) -> Option<&str> {
        self.mapping.get(&role).map(String::as_str)
    }
}
