//! Column mapping validation
//!
//! Checks a [`ChartRequest`] against the tables it references and finalizes
//! it into a [`ValidatedChart`]. Validation never mutates the request, so
//! the same request always produces the same outcome.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;
use vz_core::{ColumnType, Table};

use crate::chart::{ChartKind, ChartRequest, ColumnRole, ValidatedChart};

/// Reasons a chart request cannot be drawn
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("{kind} needs a {role} selection")]
    MissingRole { kind: ChartKind, role: ColumnRole },

    #[error("column '{column}' in {table} is {found}, but {role} needs {expected} data")]
    TypeMismatch {
        role: ColumnRole,
        column: String,
        table: String,
        expected: ColumnType,
        found: ColumnType,
    },

    #[error("column '{column}' selected for {role} does not exist in {table}")]
    UnknownColumn {
        role: ColumnRole,
        column: String,
        table: String,
    },

    #[error("column '{column}' selected for {role} is missing from: {}", missing_from.join(", "))]
    IncompatibleColumns {
        role: ColumnRole,
        column: String,
        missing_from: Vec<String>,
    },

    #[error("need at least {required} tables, got {found}")]
    TooFewTables { required: usize, found: usize },

    #[error("{kind} cannot compare several files")]
    ComparisonNotSupported { kind: ChartKind },
}

fn eligible(role: ColumnRole, column_type: ColumnType) -> bool {
    !role.requires_numeric() || column_type == ColumnType::Numeric
}

/// Columns of `table` that can fill `role`, in table order
pub fn available_columns(table: &Table, role: ColumnRole) -> Vec<String> {
    table
        .columns()
        .iter()
        .filter(|c| eligible(role, c.column_type))
        .map(|c| c.name.clone())
        .collect()
}

/// Columns present in every table and eligible for `role` in each, sorted by name
pub fn available_shared_columns(tables: &[Arc<Table>], role: ColumnRole) -> Vec<String> {
    let Some((first, rest)) = tables.split_first() else {
        return Vec::new();
    };

    let mut shared: Vec<String> = available_columns(first, role)
        .into_iter()
        .filter(|name| {
            rest.iter().all(|table| {
                table
                    .column_type(name)
                    .is_some_and(|column_type| eligible(role, column_type))
            })
        })
        .collect();
    shared.sort();
    shared
}

/// Check a request and produce its finalized form
pub fn validate(request: &ChartRequest) -> Result<ValidatedChart, MappingError> {
    let kind = request.kind;
    let tables = &request.tables;

    let required_tables = if request.comparison { 2 } else { 1 };
    if tables.len() < required_tables {
        return Err(MappingError::TooFewTables {
            required: required_tables,
            found: tables.len(),
        });
    }
    if request.comparison && !kind.supports_comparison() {
        return Err(MappingError::ComparisonNotSupported { kind });
    }

    for &role in kind.required_roles() {
        let satisfied = match role {
            ColumnRole::DisplayRowCount => request.row_limit.is_some_and(|rows| rows >= 1),
            _ => request.mapping.contains_key(&role),
        };
        if !satisfied {
            return Err(MappingError::MissingRole { kind, role });
        }
    }

    let mut mapping = BTreeMap::new();
    for (&role, column) in &request.mapping {
        if kind.uses_role(role) && role.is_column() {
            mapping.insert(role, column.clone());
        } else {
            debug!("Dropping unused role {:?} -> '{}' for {}", role, column, kind);
        }
    }

    for (&role, column) in &mapping {
        let missing_from: Vec<String> = tables
            .iter()
            .filter(|table| !table.has_column(column))
            .map(|table| table.name().to_string())
            .collect();
        if missing_from.is_empty() {
            continue;
        }
        if tables.len() == 1 {
            return Err(MappingError::UnknownColumn {
                role,
                column: column.clone(),
                table: tables[0].name().to_string(),
            });
        }
        return Err(MappingError::IncompatibleColumns {
            role,
            column: column.clone(),
            missing_from,
        });
    }

    for (&role, column) in &mapping {
        for table in tables.iter() {
            let Some(found) = table.column_type(column) else {
                continue;
            };
            if !eligible(role, found) {
                return Err(MappingError::TypeMismatch {
                    role,
                    column: column.clone(),
                    table: table.name().to_string(),
                    expected: ColumnType::Numeric,
                    found,
                });
            }
        }
    }

    let title = match &request.title {
        Some(title) if !title.trim().is_empty() => title.trim().to_string(),
        _ => default_title(kind, &mapping, request.comparison),
    };
    let row_limit = match kind {
        ChartKind::Table => request.row_limit,
        _ => None,
    };

    Ok(ValidatedChart {
        kind,
        tables: tables.clone(),
        mapping,
        title,
        row_limit,
        comparison: request.comparison,
    })
}

fn default_title(kind: ChartKind, mapping: &BTreeMap<ColumnRole, String>, comparison: bool) -> String {
    let column = |role: ColumnRole| mapping.get(&role).map(String::as_str).unwrap_or_default();

    if comparison {
        return format!("Comparison: {} across files", column(ColumnRole::Y));
    }
    match kind {
        ChartKind::Line | ChartKind::Bar | ChartKind::Table => kind.label().to_string(),
        ChartKind::Histogram => format!("Histogram of {}", column(ColumnRole::Value)),
    }
}
