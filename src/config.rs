//! Run configuration
//!
//! Built-in defaults, optionally overlaid by a JSON file, optionally
//! overlaid again by command-line flags. The library only ever sees the
//! merged [`MapperConfig`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{MapperError, Result};
use crate::extract::ExtractionMode;

/// Default directory holding the legacy project (or its container).
pub const DEFAULT_SOURCE_ROOT: &str = "1_project_source";

/// Default location of the map document.
pub const DEFAULT_OUTPUT: &str = "2_intermediate_data/project_map.json";

/// Settings for one mapping run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapperConfig {
    /// Project directory, or a directory whose first sub-directory is the
    /// project
    pub source_root: PathBuf,

    /// Where the map is written
    pub output: PathBuf,

    /// Optional JSON dump of the run diagnostics
    pub diagnostics_output: Option<PathBuf>,

    /// Project-relative glob patterns excluded from the scan
    pub exclude: Vec<String>,

    pub extraction_mode: ExtractionMode,

    /// Worker threads for extraction (`None` = rayon default)
    pub threads: Option<usize>,

    /// Extensions ignored on top of the built-in list (no leading dot)
    pub extra_ignored_extensions: Vec<String>,
}

impl Default for MapperConfig {
    fn default() -> Self {
        MapperConfig {
            source_root: PathBuf::from(DEFAULT_SOURCE_ROOT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            diagnostics_output: None,
            exclude: Vec::new(),
            extraction_mode: ExtractionMode::default(),
            threads: None,
            extra_ignored_extensions: Vec::new(),
        }
    }
}

impl MapperConfig {
    /// Load a configuration file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| MapperError::io(path, e))?;
        Self::from_json(&content)
            .map_err(|e| MapperError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse a configuration document.
    pub fn from_json(content: &str) -> Result<Self> {
        let config: MapperConfig =
            serde_json::from_str(content).map_err(|e| MapperError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no run could use.
    pub fn validate(&self) -> Result<()> {
        if self.threads == Some(0) {
            return Err(MapperError::Config("threads must be at least 1".to_string()));
        }
        if self.source_root.as_os_str().is_empty() {
            return Err(MapperError::Config("source_root must not be empty".to_string()));
        }
        if self.output.as_os_str().is_empty() {
            return Err(MapperError::Config("output must not be empty".to_string()));
        }
        if let Some(bad) = self
            .extra_ignored_extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.contains('/'))
        {
            return Err(MapperError::Config(format!(
                "invalid ignored extension '{}'",
                bad
            )));
        }
        Ok(())
    }

    /// Ignored extensions with any leading dot removed and lowercased.
    pub fn normalized_ignored_extensions(&self) -> Vec<String> {
        self.extra_ignored_extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect()
    }
}
