//! Project discovery and directory scanning
//!
//! Locates the project under a source root, walks it in a fixed order and
//! classifies every retained file. The walk order is the order the
//! [`NameIndex`] is built in, so it decides which path wins a base-name
//! collision: entries are sorted by file name inside each directory.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::artifact::{ArtifactKind, IGNORED_DIRS};
use crate::diagnostics::{DiagnosticStage, MapDiagnostic, SkipReason};
use crate::error::{MapperError, Result};
use crate::filter::ArtifactFilter;
use crate::index::NameIndex;
use crate::validation::relative_path;

/// Marker file written at the top of a designer project.
pub const PROJECT_MARKER: &str = "vcrepo.dat";

/// One retained file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    /// Project-relative, slash-normalized path
    pub path: String,
    /// Absolute (or root-joined) path used to read the content
    pub abs_path: PathBuf,
    pub kind: ArtifactKind,
}

/// Output of a project scan.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub project_root: PathBuf,
    /// Retained files in walk order
    pub files: Vec<ScannedFile>,
    pub index: NameIndex,
    /// Skipped entries and walk errors
    pub diagnostics: Vec<MapDiagnostic>,
}

/// Find the project directory under `source_root`.
///
/// # Behavior
/// 1. `source_root` itself, when it holds the project marker or artifacts of
///    a known kind at top level
/// 2. else the first sub-directory (sorted) that does
/// 3. else the only sub-directory, when there is exactly one and it holds
///    at least one retained file
/// 4. else `source_root`, when anything at all is retained beneath it
///
/// # Errors
/// `ProjectNotFound` when `source_root` is not a directory or none of the
/// rules above applies.
pub fn locate_project_root(source_root: &Path) -> Result<PathBuf> {
    if !source_root.is_dir() {
        return Err(MapperError::project_not_found(
            source_root,
            "directory does not exist",
        ));
    }

    if looks_like_project(source_root)? {
        return Ok(source_root.to_path_buf());
    }

    let subdirs = sorted_subdirectories(source_root)?;
    for dir in &subdirs {
        if looks_like_project(dir)? {
            return Ok(dir.clone());
        }
    }
    if let [only] = subdirs.as_slice() {
        if has_retained_file(only) {
            return Ok(only.clone());
        }
    }

    if has_retained_file(source_root) {
        return Ok(source_root.to_path_buf());
    }

    Err(MapperError::project_not_found(
        source_root,
        "no recognizable project directory or artifacts",
    ))
}

/// Top-level check: project marker present, or a known-kind artifact.
fn looks_like_project(dir: &Path) -> Result<bool> {
    let entries = std::fs::read_dir(dir).map_err(|e| MapperError::io(dir, e))?;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.file_name().and_then(|n| n.to_str()) == Some(PROJECT_MARKER) {
            return Ok(true);
        }
        if ArtifactKind::from_path(&path) != ArtifactKind::Unknown {
            return Ok(true);
        }
    }
    Ok(false)
}

/// True when the built-in filter keeps at least one file under `dir`.
fn has_retained_file(dir: &Path) -> bool {
    let filter = ArtifactFilter::builtin();
    walk(dir).any(|entry| match entry {
        Ok(e) if e.file_type().is_file() => relative_path(e.path(), dir)
            .map(|rel| filter.should_skip(&rel).is_none())
            .unwrap_or(false),
        _ => false,
    })
}

fn sorted_subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| MapperError::io(dir, e))?;
    let mut dirs: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| !IGNORED_DIRS.contains(&n))
                .unwrap_or(true)
        })
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn walk(root: &Path) -> impl Iterator<Item = walkdir::Result<walkdir::DirEntry>> {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            !(e.file_type().is_dir()
                && e.depth() > 0
                && e.file_name()
                    .to_str()
                    .map(|n| IGNORED_DIRS.contains(&n))
                    .unwrap_or(false))
        })
}

/// Walk a project directory and classify every retained file.
///
/// # Guarantees
/// - Files are visited in sorted order (per directory, by file name)
/// - The name index is built in that same order (last write wins)
/// - Ignored and excluded files produce a `Skipped` diagnostic, never a node
/// - Unreadable directory entries produce a `Read` error diagnostic
pub fn scan_project(project_root: &Path, filter: &ArtifactFilter) -> Result<ScanResult> {
    if !project_root.is_dir() {
        return Err(MapperError::project_not_found(
            project_root,
            "directory does not exist",
        ));
    }

    let mut result = ScanResult {
        project_root: project_root.to_path_buf(),
        ..Default::default()
    };

    for entry in walk(project_root) {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                let path = err
                    .path()
                    .and_then(|p| relative_path(p, project_root))
                    .unwrap_or_else(|| project_root.to_string_lossy().into_owned());
                result
                    .diagnostics
                    .push(MapDiagnostic::error(path, DiagnosticStage::Read, err.to_string()));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let rel = match relative_path(entry.path(), project_root) {
            Some(rel) => rel,
            None => {
                let lossy = entry.path().to_string_lossy().into_owned();
                result
                    .diagnostics
                    .push(MapDiagnostic::skipped(lossy, SkipReason::NonUtf8Path));
                continue;
            }
        };

        if let Some(reason) = filter.should_skip(&rel) {
            tracing::debug!(path = %rel, %reason, "skipping file");
            result.diagnostics.push(MapDiagnostic::skipped(rel, reason));
            continue;
        }

        let kind = ArtifactKind::from_path(entry.path());
        result.index.insert(&rel);
        result.files.push(ScannedFile {
            path: rel,
            abs_path: entry.path().to_path_buf(),
            kind,
        });
    }

    result
        .diagnostics
        .extend(result.index.collisions().iter().cloned().map(MapDiagnostic::from));

    tracing::info!(
        root = %project_root.display(),
        files = result.files.len(),
        skipped = result.diagnostics.len(),
        "scan complete"
    );

    Ok(result)
}
