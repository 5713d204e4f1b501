//! Export command implementation

use anyhow::Result;
use std::io::Write;
use std::path::Path;

use procmap::{export_map, read_map, ExportFormat};

/// Print a map in canonical form.
///
/// The document is normalized first, so a hand-edited map comes out sorted
/// and closed.
pub fn run_export(map_path: &Path, format: ExportFormat) -> Result<()> {
    let mut map = read_map(map_path)?;
    map.normalize();

    let rendered = export_map(&map, format)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
