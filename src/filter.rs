//! File filtering for built-in ignore rules and configured exclude globs.
//!
//! Precedence, first match wins:
//! 1. Repository metadata names (.gitignore, .DS_Store, ...)
//! 2. Ignored extensions (folder markers, opaque data, configured extras)
//! 3. Configured exclude globs, matched against the project-relative path
//!
//! Pure function of its inputs: same path, same answer.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;

use crate::artifact::{is_ignored_file, IGNORED_FILE_NAMES};
use crate::diagnostics::SkipReason;
use crate::error::{MapperError, Result};

/// Filter configuration for one scan.
pub struct ArtifactFilter {
    exclude: GlobSet,
    extra_extensions: Vec<String>,
}

impl ArtifactFilter {
    /// Compile a filter.
    ///
    /// # Arguments
    /// * `exclude_patterns` - globs over project-relative, `/`-separated paths
    /// * `extra_extensions` - additional ignored extensions (leading dot optional)
    pub fn new(exclude_patterns: &[String], extra_extensions: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in exclude_patterns {
            let glob = Glob::new(pattern)
                .map_err(|e| MapperError::InvalidPattern(format!("'{}': {}", pattern, e)))?;
            builder.add(glob);
        }
        let exclude = builder
            .build()
            .map_err(|e| MapperError::InvalidPattern(e.to_string()))?;

        Ok(Self {
            exclude,
            extra_extensions: extra_extensions.to_vec(),
        })
    }

    /// Filter with no excludes and only the built-in rules
    pub fn builtin() -> Self {
        Self {
            exclude: GlobSet::empty(),
            extra_extensions: Vec::new(),
        }
    }

    /// Check whether a file should be left out of the graph.
    ///
    /// # Returns
    /// * `None` - keep the file
    /// * `Some(reason)` - skip it
    pub fn should_skip(&self, rel_path: &str) -> Option<SkipReason> {
        let path = Path::new(rel_path);

        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if IGNORED_FILE_NAMES.contains(&name) {
                return Some(SkipReason::Metadata);
            }
        }

        if is_ignored_file(path, &self.extra_extensions) {
            return Some(SkipReason::IgnoredExtension);
        }

        if self.exclude.is_match(rel_path) {
            return Some(SkipReason::ExcludedByGlob);
        }

        None
    }
}

impl Default for ArtifactFilter {
    fn default() -> Self {
        Self::builtin()
    }
}
