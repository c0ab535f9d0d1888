//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use tether_core::extract::ExtractionLimits;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Tunable knobs for the engine. Defaults are the production values; a
/// TOML file may override any subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Limits applied to every bounded text extraction.
    pub extraction: ExtractionLimits,
    /// Fan-out for semantic queries.
    pub search_top_k: usize,
    /// Cap on rendered code-execution output.
    pub code_output_max_chars: usize,
    /// Default result count for web search when the model does not ask.
    pub web_search_default_results: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            extraction: ExtractionLimits::default(),
            search_top_k: 8,
            code_output_max_chars: 10_000,
            web_search_default_results: 5,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_production_values() {
        let config = EngineConfig::default();
        assert_eq!(config.extraction.max_lines, 500);
        assert_eq!(config.extraction.max_chars, 50_000);
        assert_eq!(config.search_top_k, 8);
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let config = EngineConfig::from_toml_str(
            r#"
            search_top_k = 3

            [extraction]
            max_lines = 100
            max_chars = 8000
            "#,
        )
        .unwrap();
        assert_eq!(config.search_top_k, 3);
        assert_eq!(config.extraction.max_lines, 100);
        assert_eq!(config.code_output_max_chars, 10_000);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = EngineConfig::from_toml_str("search_top_k = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
