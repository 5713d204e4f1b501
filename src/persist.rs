//! Reading and writing the project map document
//!
//! The on-disk form is pretty-printed JSON with sorted keys and a trailing
//! newline. Writes go through a temp file in the target directory and a
//! rename, so readers never see a half-written map.

use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::diagnostics::DiagnosticsLog;
use crate::error::{MapperError, Result};
use crate::graph::ProjectMap;

/// Canonical serialized form of a map.
pub fn to_json_string(map: &ProjectMap) -> Result<String> {
    let mut json = serde_json::to_string_pretty(map)?;
    json.push('\n');
    Ok(json)
}

/// Parse a map document as written, without normalizing it.
///
/// Call [`ProjectMap::normalize`] to restore canonical form, or
/// [`ProjectMap::verify`] to report how far the document is from it.
pub fn from_json_str(json: &str) -> Result<ProjectMap> {
    Ok(serde_json::from_str(json)?)
}

/// SHA-256 of the canonical serialized form, hex encoded.
pub fn fingerprint(map: &ProjectMap) -> Result<String> {
    let json = to_json_string(map)?;
    Ok(hex::encode(Sha256::digest(json.as_bytes())))
}

fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| MapperError::io(parent, e))?;

    let mut temp = tempfile::NamedTempFile::new_in(parent).map_err(|e| MapperError::io(parent, e))?;
    temp.write_all(content).map_err(|e| MapperError::io(temp.path(), e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| MapperError::io(temp.path(), e))?;
    temp.persist(path)
        .map_err(|e| MapperError::io(path, e.error))?;
    Ok(())
}

/// Write `map` to `path`, creating parent directories as needed.
pub fn write_map(map: &ProjectMap, path: &Path) -> Result<()> {
    let json = to_json_string(map)?;
    write_atomic(path, json.as_bytes())?;
    tracing::info!(path = %path.display(), artifacts = map.len(), "project map written");
    Ok(())
}

/// Read a map written by [`write_map`] (or any document of the same shape).
pub fn read_map(path: &Path) -> Result<ProjectMap> {
    let json = fs::read_to_string(path).map_err(|e| MapperError::io(path, e))?;
    from_json_str(&json).map_err(|e| match e {
        MapperError::Serialize(inner) => {
            MapperError::InvalidMap(format!("{}: {}", path.display(), inner))
        }
        other => other,
    })
}

/// Write the run diagnostics next to (or instead of) the terminal output.
pub fn write_diagnostics(log: &DiagnosticsLog, path: &Path) -> Result<()> {
    let mut json = serde_json::to_string_pretty(log)?;
    json.push('\n');
    write_atomic(path, json.as_bytes())
}
