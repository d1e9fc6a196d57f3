//! Chart requests, column mapping validation and rendering

pub mod chart;
pub mod export;
pub mod mapping;
pub mod plots;
pub mod tables;

pub use chart::{ChartKind, ChartRequest, ColumnRole, ValidatedChart};
pub use export::ExportOptions;
pub use mapping::{available_columns, available_shared_columns, validate, MappingError};
pub use plots::{ChartRenderer, PlottersRenderer, RenderOutput};
