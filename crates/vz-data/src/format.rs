//! File format detection
//!
//! A file is accepted only when it can be opened for reading and its
//! extension names one of the supported formats. Contents are never
//! inspected here.

use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::DataError;

/// Tabular formats the loader understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportedFormat {
    Csv,
    Xlsx,
    Xls,
    Json,
    Txt,
}

impl SupportedFormat {
    pub const ALL: [SupportedFormat; 5] = [
        SupportedFormat::Csv,
        SupportedFormat::Xlsx,
        SupportedFormat::Xls,
        SupportedFormat::Json,
        SupportedFormat::Txt,
    ];

    /// Case-insensitive lookup, with or without the leading dot
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.trim_start_matches('.');
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(extension))
    }

    pub fn extension(&self) -> &'static str {
        match self {
            SupportedFormat::Csv => "csv",
            SupportedFormat::Xlsx => "xlsx",
            SupportedFormat::Xls => "xls",
            SupportedFormat::Json => "json",
            SupportedFormat::Txt => "txt",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SupportedFormat::Csv => "CSV",
            SupportedFormat::Xlsx => "Excel (XLSX)",
            SupportedFormat::Xls => "Excel (XLS)",
            SupportedFormat::Json => "JSON",
            SupportedFormat::Txt => "Text",
        }
    }
}

impl fmt::Display for SupportedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Cheap extension-only filter used when listing directories
pub fn is_supported_path(path: &Path) -> bool {
    SupportedFormat::from_extension(&extension_of(path)).is_some()
}

/// Resolve the format of `path`, checking access before the extension
pub fn classify(path: &Path) -> Result<SupportedFormat, DataError> {
    let metadata = fs::metadata(path).map_err(|e| DataError::access(path, e.kind()))?;
    if !metadata.is_file() {
        return Err(DataError::FileAccess {
            path: path.to_path_buf(),
            reason: crate::AccessFailure::NotAFile,
        });
    }

    // Opened only to prove readability; dropped right away
    File::open(path).map_err(|e| DataError::access(path, e.kind()))?;

    let extension = extension_of(path);
    let format =
        SupportedFormat::from_extension(&extension).ok_or_else(|| DataError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: extension.clone(),
        })?;

    debug!("Classified {} as {}", path.display(), format);
    Ok(format)
}

/// A classified file selected for loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    pub path: PathBuf,
    pub format: SupportedFormat,
    pub size_bytes: u64,
    pub name: String,
}

impl FileDescriptor {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let format = classify(path)?;
        let size_bytes = fs::metadata(path)
            .map_err(|e| DataError::access(path, e.kind()))?
            .len();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            path: path.to_path_buf(),
            format,
            size_bytes,
            name,
        })
    }

    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AccessFailure;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_classify_supported_extensions_any_case() {
        let dir = tempdir().unwrap();
        let cases = [
            ("a.csv", SupportedFormat::Csv),
            ("b.XLSX", SupportedFormat::Xlsx),
            ("c.Xls", SupportedFormat::Xls),
            ("d.JSON", SupportedFormat::Json),
            ("e.txt", SupportedFormat::Txt),
        ];
        for (name, expected) in cases {
            let path = dir.path().join(name);
            fs::write(&path, "x,y\n1,2\n").unwrap();
            assert_eq!(classify(&path).unwrap(), expected, "{name}");
        }
    }

    #[test]
    fn test_unsupported_regardless_of_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.parquet");
        fs::write(&path, "a,b\n1,2\n").unwrap();
        match classify(&path).unwrap_err() {
            DataError::UnsupportedFormat { extension, .. } => assert_eq!(extension, "parquet"),
            other => panic!("unexpected error: {other}"),
        }

        let bare = dir.path().join("README");
        fs::write(&bare, "a,b\n").unwrap();
        assert!(matches!(
            classify(&bare),
            Err(DataError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_access_checked_before_extension() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.exe");
        assert!(matches!(
            classify(&missing),
            Err(DataError::FileAccess {
                reason: AccessFailure::NotFound,
                ..
            })
        ));

        let folder = dir.path().join("folder.csv");
        fs::create_dir(&folder).unwrap();
        assert!(matches!(
            classify(&folder),
            Err(DataError::FileAccess {
                reason: AccessFailure::NotAFile,
                ..
            })
        ));
    }

    #[test]
    fn test_file_descriptor() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        fs::write(&path, vec![b'a'; 2048]).unwrap();

        let descriptor = FileDescriptor::open(&path).unwrap();
        assert_eq!(descriptor.name, "sales.csv");
        assert_eq!(descriptor.format, SupportedFormat::Csv);
        assert_eq!(descriptor.size_bytes, 2048);
        assert_eq!(descriptor.size_kb(), 2.0);
    }

    #[test]
    fn test_is_supported_path() {
        assert!(is_supported_path(Path::new("x/y/report.Csv")));
        assert!(!is_supported_path(Path::new("notes.md")));
        assert!(!is_supported_path(Path::new("Makefile")));
        assert_eq!(SupportedFormat::from_extension(".json"), Some(SupportedFormat::Json));
    }
}
