//! Error types for the mapping pipeline
//!
//! Only [`MapperError::ProjectNotFound`] aborts a run on its own. Per-artifact
//! problems are recorded as diagnostics (see [`crate::diagnostics`]) and the
//! map is still produced.

use std::path::PathBuf;

/// Errors surfaced by the library API.
#[derive(Debug, thiserror::Error)]
pub enum MapperError {
    /// The source root is missing or holds no recognizable project
    #[error("project not found at {}: {reason}", path.display())]
    ProjectNotFound { path: PathBuf, reason: String },

    /// Filesystem access failed outside of per-artifact reads
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Map (de)serialization failed
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A persisted map violates its own structural rules
    #[error("invalid project map: {0}")]
    InvalidMap(String),

    /// An exclude glob could not be compiled
    #[error("invalid exclude pattern: {0}")]
    InvalidPattern(String),

    /// Configuration file could not be used
    #[error("configuration error: {0}")]
    Config(String),
}

impl MapperError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MapperError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn project_not_found(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        MapperError::ProjectNotFound {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Stable diagnostic code for this error category
    pub fn code(&self) -> &'static str {
        use crate::error_codes::*;
        match self {
            MapperError::ProjectNotFound { .. } => PMAP_IO_001_PROJECT_NOT_FOUND,
            MapperError::Io { .. } => PMAP_IO_002_READ_FAILED,
            MapperError::Serialize(_) | MapperError::InvalidMap(_) => PMAP_MAP_001_INVALID_MAP,
            MapperError::InvalidPattern(_) | MapperError::Config(_) => PMAP_CFG_001_INVALID_CONFIG,
        }
    }
}

/// Result alias used throughout the library
pub type Result<T, E = MapperError> = std::result::Result<T, E>;
