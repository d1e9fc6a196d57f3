//! Null value handling for data loading

use serde::{Deserialize, Serialize};

/// Null value configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NullConfig {
    /// Tokens to treat as null
    pub patterns: Vec<String>,

    /// Whether to trim whitespace before checking
    pub trim_whitespace: bool,

    /// Case sensitive matching
    pub case_sensitive: bool,
}

impl Default for NullConfig {
    fn default() -> Self {
        Self {
            patterns: ["", "NA", "N/A", "null", "NULL", "None", "NaN", "-"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            trim_whitespace: true,
            case_sensitive: false,
        }
    }
}

impl NullConfig {
    /// Check if a value should be treated as null
    pub fn is_null(&self, value: &str) -> bool {
        let test_value = if self.trim_whitespace {
            value.trim()
        } else {
            value
        };

        self.patterns.iter().any(|pattern| {
            if self.case_sensitive {
                test_value == pattern
            } else {
                test_value.eq_ignore_ascii_case(pattern)
            }
        })
    }

    /// Add a null pattern
    pub fn add_pattern(&mut self, pattern: impl Into<String>) {
        let pattern = pattern.into();
        if !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tokens() {
        let config = NullConfig::default();
        for token in ["", "  ", "NA", "n/a", "null", "None", "nan", "-"] {
            assert!(config.is_null(token), "{token:?} should be null");
        }
        assert!(!config.is_null("0"));
        assert!(!config.is_null("North"));
        assert!(!config.is_null("--"));
    }

    #[test]
    fn test_case_sensitive_matching() {
        let config = NullConfig {
            case_sensitive: true,
            ..NullConfig::default()
        };
        assert!(config.is_null("NULL"));
        assert!(!config.is_null("Null"));
    }

    #[test]
    fn test_add_pattern() {
        let mut config = NullConfig::default();
        config.add_pattern("missing");
        config.add_pattern("missing");
        assert!(config.is_null("MISSING"));
        assert_eq!(config.patterns.iter().filter(|p| *p == "missing").count(), 1);
    }
}
