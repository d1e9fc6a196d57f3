//! Chart export settings

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Extension of every chart file
pub const CHART_EXTENSION: &str = "svg";

/// Export options for rendered charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportOptions {
    /// Directory chart files are written to
    pub output_dir: PathBuf,
    /// Width of the exported image
    pub width: u32,
    /// Height of the exported image
    pub height: u32,
    /// Number of histogram bins
    pub histogram_bins: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            width: 1000,
            height: 600,
            histogram_bins: 30,
        }
    }
}

/// Replace anything but ASCII letters, digits, `-` and `_` with `_`
pub fn sanitize_file_component(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_component() {
        assert_eq!(sanitize_file_component("Sales (USD)/day"), "Sales__USD__day");
        assert_eq!(sanitize_file_component("plain_name-1"), "plain_name-1");
    }

    #[test]
    fn test_options_from_partial_json() {
        let options: ExportOptions = serde_json::from_str(r#"{"histogram_bins": 12}"#).unwrap();
        assert_eq!(options.histogram_bins, 12);
        assert_eq!(options.width, 1000);
    }
}
