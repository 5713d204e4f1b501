//! Status command implementation

use anyhow::Result;
use std::path::Path;

use procmap::output::{generate_execution_id, output_json, JsonResponse, StatusResponse};
use procmap::{fingerprint, read_map, OutputFormat};

/// Run status query command
///
/// Usage: procmap status --map <FILE>
pub fn run_status(map_path: &Path, output_format: OutputFormat) -> Result<()> {
    let map = read_map(map_path)?;
    let counts = map.counts();
    let fingerprint = fingerprint(&map)?;

    match output_format {
        OutputFormat::Json => {
            let response = StatusResponse {
                artifacts: counts.artifacts,
                dependencies: counts.dependencies,
                variable_groups: counts.variable_groups,
                by_kind: counts.by_kind,
                entry_points: map.entry_points.clone(),
                fingerprint,
            };
            let exec_id = generate_execution_id();
            output_json(&JsonResponse::new(response, &exec_id))?;
        }
        OutputFormat::Human => {
            println!("artifacts: {}", counts.artifacts);
            for (kind, count) in &counts.by_kind {
                println!("  {}: {}", kind, count);
            }
            println!("dependencies: {}", counts.dependencies);
            println!("variable_groups: {}", counts.variable_groups);
            println!("entry_points: {}", counts.entry_points);
            for entry in &map.entry_points {
                println!("  {}", entry);
            }
            println!("fingerprint: {}", fingerprint);
        }
    }

    Ok(())
}
