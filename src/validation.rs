//! Path normalization utilities.
//!
//! Artifact identifiers are project-relative and always use `/` as the
//! separator, whatever the host platform or the separator written inside the
//! artifact content.

use std::path::Path;

/// Normalize a path string to forward slashes.
///
/// - `\` becomes `/`
/// - leading `./` segments are dropped
/// - repeated separators collapse to one
/// - a trailing separator is dropped
pub fn normalize_path(path: &str) -> String {
    let replaced = path.replace('\\', "/");
    let mut out = String::with_capacity(replaced.len());
    let leading_slash = replaced.starts_with('/');

    for segment in replaced.split('/') {
        if segment.is_empty() {
            continue;
        }
        if segment == "." && out.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(segment);
    }

    if leading_slash {
        format!("/{}", out)
    } else {
        out
    }
}

/// Project-relative, slash-normalized path of `path` under `root`.
///
/// Returns `None` when `path` is not beneath `root` or is not valid UTF-8.
pub fn relative_path(path: &Path, root: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let rel = rel.to_str()?;
    let normalized = normalize_path(rel);
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Normalize a reference written inside an artifact.
///
/// Trims whitespace, converts separators and strips leading separators, so
/// `"/Processes/Sub.process"` becomes `"Processes/Sub.process"`.
pub fn normalize_reference(raw: &str) -> String {
    normalize_path(raw.trim())
        .trim_start_matches('/')
        .to_string()
}

/// Last segment of a slash-normalized path.
pub fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
