//! Data handling and sources for the visualize toolchain
//!
//! Files are first classified by [`format::classify`], then loaded into a
//! [`vz_core::Table`] by [`sources::load`].

pub mod config;
pub mod format;
pub mod schema;
pub mod sources;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

// Re-exports
pub use config::{LoadOptions, NullConfig};
pub use format::{classify, is_supported_path, FileDescriptor, SupportedFormat};
pub use schema::{ColumnSummary, SchemaDetector};
pub use sources::{load, load_path};

/// Why a file could not be accessed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessFailure {
    NotFound,
    NotAFile,
    PermissionDenied,
    Io(io::ErrorKind),
}

impl AccessFailure {
    fn from_io(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => AccessFailure::NotFound,
            io::ErrorKind::PermissionDenied => AccessFailure::PermissionDenied,
            other => AccessFailure::Io(other),
        }
    }
}

impl fmt::Display for AccessFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessFailure::NotFound => f.write_str("file does not exist"),
            AccessFailure::NotAFile => f.write_str("path is not a file"),
            AccessFailure::PermissionDenied => f.write_str("permission denied"),
            AccessFailure::Io(kind) => write!(f, "cannot open file ({kind})"),
        }
    }
}

/// Errors that can occur while classifying or loading a file
#[derive(Error, Debug)]
pub enum DataError {
    #[error("cannot access {}: {reason}", path.display())]
    FileAccess { path: PathBuf, reason: AccessFailure },

    #[error("unsupported file format '{extension}' for {}", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("malformed data in {}: {reason}", path.display())]
    MalformedData { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl DataError {
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DataError::MalformedData {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn access(path: &Path, kind: io::ErrorKind) -> Self {
        DataError::FileAccess {
            path: path.to_path_buf(),
            reason: AccessFailure::from_io(kind),
        }
    }

    /// Attach the offending file to a parse error raised without one
    pub fn with_path(self, file: &Path) -> Self {
        match self {
            DataError::MalformedData { path, reason } if path.as_os_str().is_empty() => {
                DataError::MalformedData {
                    path: file.to_path_buf(),
                    reason,
                }
            }
            other => other,
        }
    }
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => {
                DataError::Io(io::Error::new(io_err.kind(), error.to_string()))
            }
            _ => DataError::malformed(PathBuf::new(), error.to_string()),
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(error: serde_json::Error) -> Self {
        if error.is_io() {
            DataError::Io(io::Error::new(io::ErrorKind::Other, error.to_string()))
        } else {
            DataError::malformed(PathBuf::new(), error.to_string())
        }
    }
}

impl From<calamine::Error> for DataError {
    fn from(error: calamine::Error) -> Self {
        match error {
            calamine::Error::Io(io_err) => DataError::Io(io_err),
            other => DataError::malformed(PathBuf::new(), other.to_string()),
        }
    }
}
