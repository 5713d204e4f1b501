//! Run diagnostics for skip reasons, recovered errors and resolution gaps.
//!
//! Nothing here aborts a run. Every gap in the produced map (a file not in
//! the graph, an artifact without references, a dropped token, a shadowed
//! name) has exactly one entry in the log that explains it.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::error_codes::{
    PMAP_IO_002_READ_FAILED, PMAP_PARSE_001_MALFORMED_ARTIFACT, PMAP_REF_001_UNRESOLVED,
    PMAP_REF_002_NAME_COLLISION,
};

/// Reason why a file was left out of the graph.
///
/// The order of variants matters for precedence when reporting skip reasons.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Repository metadata file (.gitignore, .DS_Store, ...)
    Metadata,
    /// Folder marker or opaque data extension
    IgnoredExtension,
    /// Matched a configured exclude glob
    ExcludedByGlob,
    /// Path is not valid UTF-8 and cannot become an identifier
    NonUtf8Path,
}

impl SkipReason {
    /// Stable sort key for deterministic ordering.
    pub fn sort_key(&self) -> u8 {
        match self {
            SkipReason::Metadata => 0,
            SkipReason::IgnoredExtension => 1,
            SkipReason::ExcludedByGlob => 2,
            SkipReason::NonUtf8Path => 3,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SkipReason::Metadata => "repository metadata",
            SkipReason::IgnoredExtension => "ignored extension",
            SkipReason::ExcludedByGlob => "excluded by pattern",
            SkipReason::NonUtf8Path => "path is not valid UTF-8",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl PartialOrd for SkipReason {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SkipReason {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

/// Pipeline stage where a recovered error occurred.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticStage {
    /// Reading the artifact from disk
    Read,
    /// Parsing artifact content
    Parse,
}

impl DiagnosticStage {
    pub fn sort_key(&self) -> u8 {
        match self {
            DiagnosticStage::Read => 0,
            DiagnosticStage::Parse => 1,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DiagnosticStage::Read => "reading file",
            DiagnosticStage::Parse => "parsing artifact",
        }
    }
}

impl fmt::Display for DiagnosticStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// One entry of the run diagnostics log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapDiagnostic {
    /// File left out of the graph
    Skipped { path: String, reason: SkipReason },
    /// Artifact kept, but a stage failed on it
    Error {
        path: String,
        stage: DiagnosticStage,
        message: String,
    },
    /// Token extracted from `path` matched nothing in the name index
    Unresolved { path: String, token: String },
    /// Two files share the base name `name`; `kept` wins resolution
    NameCollision {
        name: String,
        kept: String,
        shadowed: String,
    },
}

impl MapDiagnostic {
    pub fn skipped(path: impl Into<String>, reason: SkipReason) -> Self {
        MapDiagnostic::Skipped {
            path: path.into(),
            reason,
        }
    }

    pub fn error(
        path: impl Into<String>,
        stage: DiagnosticStage,
        message: impl Into<String>,
    ) -> Self {
        MapDiagnostic::Error {
            path: path.into(),
            stage,
            message: message.into(),
        }
    }

    pub fn unresolved(path: impl Into<String>, token: impl Into<String>) -> Self {
        MapDiagnostic::Unresolved {
            path: path.into(),
            token: token.into(),
        }
    }

    /// Path of the file this diagnostic is about
    pub fn path(&self) -> &str {
        match self {
            MapDiagnostic::Skipped { path, .. } => path,
            MapDiagnostic::Error { path, .. } => path,
            MapDiagnostic::Unresolved { path, .. } => path,
            MapDiagnostic::NameCollision { shadowed, .. } => shadowed,
        }
    }

    /// Stable diagnostic code, `None` for plain skips
    pub fn code(&self) -> Option<&'static str> {
        match self {
            MapDiagnostic::Skipped { .. } => None,
            MapDiagnostic::Error {
                stage: DiagnosticStage::Read,
                ..
            } => Some(PMAP_IO_002_READ_FAILED),
            MapDiagnostic::Error {
                stage: DiagnosticStage::Parse,
                ..
            } => Some(PMAP_PARSE_001_MALFORMED_ARTIFACT),
            MapDiagnostic::Unresolved { .. } => Some(PMAP_REF_001_UNRESOLVED),
            MapDiagnostic::NameCollision { .. } => Some(PMAP_REF_002_NAME_COLLISION),
        }
    }

    /// Stable sort key.
    ///
    /// Primary: path. Secondary: variant (Error, Collision, Unresolved, Skipped).
    /// Then stage/reason and the free-text detail.
    pub fn sort_key(&self) -> (&str, u8, u8, &str) {
        match self {
            MapDiagnostic::Error {
                path,
                stage,
                message,
            } => (path, 0, stage.sort_key(), message),
            MapDiagnostic::NameCollision { shadowed, kept, .. } => (shadowed, 1, 0, kept),
            MapDiagnostic::Unresolved { path, token } => (path, 2, 0, token),
            MapDiagnostic::Skipped { path, reason } => (path, 3, reason.sort_key(), ""),
        }
    }

    /// Human-readable one-liner for stderr.
    ///
    /// Examples:
    /// - "SKIP Processes/.folder: ignored extension"
    /// - "ERROR Processes/Bad.process: parsing artifact: unexpected end of stream"
    pub fn format_stderr(&self) -> String {
        match self {
            MapDiagnostic::Skipped { path, reason } => format!("SKIP {}: {}", path, reason),
            MapDiagnostic::Error {
                path,
                stage,
                message,
            } => format!("ERROR {}: {}: {}", path, stage, message),
            MapDiagnostic::Unresolved { path, token } => {
                format!("UNRESOLVED {}: {}", path, token)
            }
            MapDiagnostic::NameCollision {
                name,
                kept,
                shadowed,
            } => format!("COLLISION {}: {} shadows {}", name, kept, shadowed),
        }
    }
}

impl fmt::Display for MapDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_stderr())
    }
}

impl PartialOrd for MapDiagnostic {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MapDiagnostic {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

/// Counters over a diagnostics log.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiagnosticsSummary {
    pub skipped: usize,
    pub read_failures: usize,
    pub parse_failures: usize,
    pub unresolved: usize,
    pub collisions: usize,
}

/// Run-level diagnostics log.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiagnosticsLog {
    entries: Vec<MapDiagnostic>,
}

impl DiagnosticsLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: MapDiagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = MapDiagnostic>) {
        self.entries.extend(diagnostics);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[MapDiagnostic] {
        &self.entries
    }

    /// Sort entries into their stable order (idempotent)
    pub fn sort(&mut self) {
        self.entries.sort();
    }

    pub fn summary(&self) -> DiagnosticsSummary {
        let mut summary = DiagnosticsSummary::default();
        for entry in &self.entries {
            match entry {
                MapDiagnostic::Skipped { .. } => summary.skipped += 1,
                MapDiagnostic::Error {
                    stage: DiagnosticStage::Read,
                    ..
                } => summary.read_failures += 1,
                MapDiagnostic::Error {
                    stage: DiagnosticStage::Parse,
                    ..
                } => summary.parse_failures += 1,
                MapDiagnostic::Unresolved { .. } => summary.unresolved += 1,
                MapDiagnostic::NameCollision { .. } => summary.collisions += 1,
            }
        }
        summary
    }
}
