//! Verify command implementation

use anyhow::Result;
use std::path::Path;

use procmap::output::{generate_execution_id, output_json, JsonResponse, VerifyResponse};
use procmap::{read_map, OutputFormat};

/// Check a persisted map. Returns the process exit code: 0 when no errors
/// were found, 2 otherwise.
pub fn run_verify(map_path: &Path, output_format: OutputFormat) -> Result<u8> {
    let map = read_map(map_path)?;
    let report = map.verify();
    let exit_code = if report.passed() { 0u8 } else { 2u8 };

    match output_format {
        OutputFormat::Json => {
            let exec_id = generate_execution_id();
            output_json(&JsonResponse::new(VerifyResponse::from(report), &exec_id))?;
        }
        OutputFormat::Human => {
            println!("Map verification: {}", map_path.display());
            println!("Artifacts checked: {}", report.artifacts_checked);

            if !report.errors.is_empty() {
                println!("Errors ({}):", report.errors.len());
                for issue in &report.errors {
                    println!(
                        "  [{}] {}: {}",
                        issue.code,
                        issue.artifact.as_deref().unwrap_or("-"),
                        issue.message
                    );
                }
            }

            if !report.warnings.is_empty() {
                println!("Warnings ({}):", report.warnings.len());
                for issue in &report.warnings {
                    println!(
                        "  [{}] {}: {}",
                        issue.code,
                        issue.artifact.as_deref().unwrap_or("-"),
                        issue.message
                    );
                }
            }

            if report.is_clean() {
                println!("Map is consistent.");
            } else {
                println!("Total: {} issues", report.total_issues());
            }
        }
    }

    Ok(exit_code)
}
