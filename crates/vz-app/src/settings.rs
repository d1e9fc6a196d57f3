//! Application settings

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use vz_data::LoadOptions;
use vz_views::ExportOptions;

/// Everything the interactive session is configured with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory listed in the file menu
    pub data_dir: PathBuf,

    /// List files in nested directories too
    pub recursive: bool,

    /// Maximum number of files offered in the menu
    pub max_files: usize,

    /// Rows shown in each data preview
    pub preview_rows: usize,

    pub export: ExportOptions,

    pub load: LoadOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            recursive: false,
            max_files: 100,
            preview_rows: 5,
            export: ExportOptions::default(),
            load: LoadOptions::default(),
        }
    }
}

impl Settings {
    /// Read settings from a JSON file; missing fields take their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid settings file {}", path.display()))
    }
}
