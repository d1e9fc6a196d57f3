//! Core functionality for the visualize toolchain
//!
//! This crate provides the tabular model every loader produces and every
//! chart consumes, plus the state machine that drives a single
//! visualization request.

pub mod datetime;
pub mod state;
pub mod table;

// Re-export commonly used types
pub use state::{RequestState, StateError};
pub use table::{Column, ColumnType, RowView, Table, TableError, TableOrigin, Value};
