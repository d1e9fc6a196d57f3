use serde::{Deserialize, Serialize};

use super::NullConfig;

/// Options shared by every format handler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadOptions {
    pub null_config: NullConfig,

    /// Non-blank lines sampled when sniffing a TXT delimiter
    pub sniff_lines: usize,

    /// Files larger than this are rejected before reading
    pub max_file_size_mb: u64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            null_config: NullConfig::default(),
            sniff_lines: 10,
            max_file_size_mb: 100,
        }
    }
}

impl LoadOptions {
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }
}
