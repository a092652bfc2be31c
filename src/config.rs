//! Engine configuration with TOML persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{
    MindexResult, DEFAULT_MAX_RESULTS, DEFAULT_PAGE_GROWTH, DEFAULT_SCAN_WARN_THRESHOLD,
};

/// Tuning knobs for a `MultiIndex`. None of them affect which elements a
/// query returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Multiplier applied to the result budget each time a paginating
    /// cursor has to read past its realized prefix. Values below 2 act as 2.
    pub page_growth: usize,

    /// Full scans over more elements than this log a warning.
    pub scan_warn_threshold: usize,

    /// Result budget used by the CLI when no limit is given.
    pub default_max_results: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_growth: DEFAULT_PAGE_GROWTH,
            scan_warn_threshold: DEFAULT_SCAN_WARN_THRESHOLD,
            default_max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl EngineConfig {
    /// Parse from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> MindexResult<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn from_file(path: &Path) -> MindexResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> MindexResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
