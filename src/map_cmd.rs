//! Map command implementation
//!
//! Runs the full pipeline and writes the map document.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use procmap::output::{generate_execution_id, output_json, JsonResponse, MapResponse};
use procmap::{fingerprint, MapRun, OutputFormat, ProjectMapper};

use crate::cli::MapArgs;

fn progress_bar(output_format: OutputFormat) -> ProgressBar {
    if output_format == OutputFormat::Json {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::with_template("{spinner} extracting [{bar:40}] {pos}/{len}") {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

fn print_human(run: &MapRun, output: &std::path::Path, fingerprint: &str) {
    let summary = run.diagnostics.summary();
    println!("Project: {}", run.project_root.display());
    println!("Artifacts found: {}", run.map.len());
    println!("Dependencies: {}", run.map.edge_count());
    println!("Entry points ({}):", run.map.entry_points.len());
    for entry in &run.map.entry_points {
        println!("  {}", entry);
    }
    println!("Unresolved references: {}", summary.unresolved);
    println!("Name collisions: {}", summary.collisions);
    println!(
        "Failures: {} read, {} parse",
        summary.read_failures, summary.parse_failures
    );
    println!("Skipped files: {}", summary.skipped);
    println!("Map written: {}", output.display());
    println!("Fingerprint: {}", fingerprint);

    for diag in run.diagnostics.entries() {
        if matches!(diag, procmap::MapDiagnostic::Skipped { .. }) {
            continue;
        }
        eprintln!("{}", diag.format_stderr());
    }
}

/// Run the map command
///
/// Usage: procmap map [--root <DIR>] [--out <FILE>] ...
pub fn run_map(args: &MapArgs, output_format: OutputFormat) -> Result<()> {
    let config = args.to_config()?;
    let output = config.output.clone();
    let mapper = ProjectMapper::new(config).context("invalid map configuration")?;

    let bar = progress_bar(output_format);
    let on_progress = |current: usize, total: usize| {
        bar.set_length(total as u64);
        bar.set_position(current as u64);
    };
    let run = mapper.run_and_write(Some(&on_progress));
    bar.finish_and_clear();
    let run = run?;

    let fingerprint = fingerprint(&run.map)?;

    match output_format {
        OutputFormat::Json => {
            let summary = run.diagnostics.summary();
            let partial = !run.diagnostics.is_empty();
            let response = MapResponse {
                project_root: run.project_root.to_string_lossy().into_owned(),
                output: output.to_string_lossy().into_owned(),
                artifacts: run.map.len(),
                dependencies: run.map.edge_count(),
                entry_points: run.map.entry_points.clone(),
                fingerprint,
                summary,
                diagnostics: run.diagnostics.entries().to_vec(),
            };
            let exec_id = generate_execution_id();
            output_json(&JsonResponse::new(response, &exec_id).with_partial(partial))?;
        }
        OutputFormat::Human => print_human(&run, &output, &fingerprint),
    }

    Ok(())
}
