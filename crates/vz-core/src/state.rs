//! Lifecycle of a single chart request

use std::fmt;

use thiserror::Error;
use tracing::debug;

/// Where a chart request currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestState {
    SelectingFiles,
    Loading,
    SelectingChartKind,
    MappingColumns,
    Validated,
    Rendered,
    Error,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition {
        from: RequestState,
        to: RequestState,
    },
}

impl Default for RequestState {
    fn default() -> Self {
        RequestState::SelectingFiles
    }
}

impl RequestState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestState::Rendered)
    }

    pub fn can_advance(&self, next: RequestState) -> bool {
        use RequestState::*;

        match (self, next) {
            (SelectingFiles, Loading)
            | (Loading, SelectingChartKind)
            | (SelectingChartKind, MappingColumns)
            | (MappingColumns, Validated)
            | (Validated, Rendered) => true,
            // A finished request may be followed by a new one
            (Rendered, SelectingFiles) | (Rendered, SelectingChartKind) => true,
            (Error, SelectingFiles) | (Error, SelectingChartKind) => true,
            (Rendered, Error) | (Error, Error) => false,
            (_, Error) => true,
            _ => false,
        }
    }

    /// Move to `next`, rejecting anything the request lifecycle does not allow
    pub fn advance(self, next: RequestState) -> Result<RequestState, StateError> {
        if self.can_advance(next) {
            debug!("request state {} -> {}", self, next);
            Ok(next)
        } else {
            Err(StateError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestState::SelectingFiles => "selecting files",
            RequestState::Loading => "loading",
            RequestState::SelectingChartKind => "selecting chart kind",
            RequestState::MappingColumns => "mapping columns",
            RequestState::Validated => "validated",
            RequestState::Rendered => "rendered",
            RequestState::Error => "error",
        };
        f.write_str(name)
    }
}
