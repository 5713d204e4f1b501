//! The mapping pipeline
//!
//! locate → scan → extract (parallel) → resolve → assemble
//!
//! Extraction is the only parallel stage: every artifact is read and
//! tokenized independently on the rayon pool, and results are collected in
//! scan order. Resolution and assembly run afterwards on one thread, against
//! the complete name index.

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::artifact::Artifact;
use crate::config::MapperConfig;
use crate::diagnostics::{DiagnosticStage, DiagnosticsLog, MapDiagnostic};
use crate::error::{MapperError, Result};
use crate::extract::{extract_from_bytes, extractor_for, ExtractionMode};
use crate::filter::ArtifactFilter;
use crate::graph::ProjectMap;
use crate::persist;
use crate::resolve::Resolver;
use crate::scan::{locate_project_root, scan_project, ScannedFile};

/// Progress callback for the extraction stage
///
/// Receives (current_count, total_count) as artifacts are processed
pub type ScanProgress<'a> = dyn Fn(usize, usize) + Send + Sync + 'a;

/// Outcome of one run.
#[derive(Debug)]
pub struct MapRun {
    pub project_root: PathBuf,
    pub map: ProjectMap,
    /// Sorted run diagnostics
    pub diagnostics: DiagnosticsLog,
}

/// Runs the pipeline for one configuration.
pub struct ProjectMapper {
    config: MapperConfig,
    filter: ArtifactFilter,
}

impl ProjectMapper {
    pub fn new(config: MapperConfig) -> Result<Self> {
        config.validate()?;
        let filter = ArtifactFilter::new(&config.exclude, &config.normalized_ignored_extensions())?;
        Ok(Self { config, filter })
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Build the map in memory.
    ///
    /// # Errors
    /// `ProjectNotFound` when the source root is missing or empty; `Config`
    /// when the worker pool cannot be built. Everything else is recorded in
    /// the returned diagnostics.
    pub fn run(&self, progress: Option<&ScanProgress<'_>>) -> Result<MapRun> {
        let project_root = locate_project_root(&self.config.source_root)?;
        tracing::info!(root = %project_root.display(), "mapping project");

        let scan = scan_project(&project_root, &self.filter)?;
        let mut diagnostics = DiagnosticsLog::new();
        diagnostics.extend(scan.diagnostics);

        let mode = self.config.extraction_mode;
        if mode == ExtractionMode::Fallback {
            tracing::warn!("regex fallback extraction enabled; references may be missed");
        }

        let extracted = match self.config.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| MapperError::Config(format!("worker pool: {}", e)))?;
                pool.install(|| extract_all(&scan.files, mode, progress))
            }
            None => extract_all(&scan.files, mode, progress),
        };

        let mut artifacts = Vec::with_capacity(extracted.len());
        for (artifact, diags) in extracted {
            diagnostics.extend(diags);
            artifacts.push(artifact);
        }

        let resolver = Resolver::new(&scan.index);
        for artifact in artifacts.iter_mut() {
            diagnostics.extend(resolver.resolve_artifact(artifact));
        }

        let map = ProjectMap::assemble(&artifacts);
        diagnostics.sort();

        let summary = diagnostics.summary();
        tracing::info!(
            artifacts = map.len(),
            entry_points = map.entry_points.len(),
            unresolved = summary.unresolved,
            collisions = summary.collisions,
            parse_failures = summary.parse_failures,
            "project map assembled"
        );

        Ok(MapRun {
            project_root,
            map,
            diagnostics,
        })
    }

    /// Build the map and write it (and the diagnostics, when configured).
    ///
    /// Nothing is written when the run fails.
    pub fn run_and_write(&self, progress: Option<&ScanProgress<'_>>) -> Result<MapRun> {
        let run = self.run(progress)?;
        persist::write_map(&run.map, &self.config.output)?;
        if let Some(path) = &self.config.diagnostics_output {
            persist::write_diagnostics(&run.diagnostics, path)?;
        }
        Ok(run)
    }
}

/// Map the project under `source_root` with default settings.
pub fn map_project(source_root: &Path) -> Result<MapRun> {
    let config = MapperConfig {
        source_root: source_root.to_path_buf(),
        ..MapperConfig::default()
    };
    ProjectMapper::new(config)?.run(None)
}

fn extract_all(
    files: &[ScannedFile],
    mode: ExtractionMode,
    progress: Option<&ScanProgress<'_>>,
) -> Vec<(Artifact, Vec<MapDiagnostic>)> {
    let total = files.len();
    let done = AtomicUsize::new(0);

    files
        .par_iter()
        .map(|file| {
            let result = extract_one(file, mode);
            let current = done.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(cb) = progress {
                cb(current, total);
            }
            result
        })
        .collect()
}

/// Read and tokenize one file. Failures stay local to the artifact.
fn extract_one(file: &ScannedFile, mode: ExtractionMode) -> (Artifact, Vec<MapDiagnostic>) {
    let mut artifact = Artifact::new(file.path.clone(), file.kind);

    if extractor_for(file.kind, mode).is_none() {
        return (artifact, Vec::new());
    }

    let bytes = match std::fs::read(&file.abs_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %file.path, error = %e, "cannot read artifact");
            let diag =
                MapDiagnostic::error(file.path.clone(), DiagnosticStage::Read, e.to_string());
            return (artifact, vec![diag]);
        }
    };

    match extract_from_bytes(file.kind, &bytes, mode) {
        Ok(extraction) => {
            tracing::debug!(
                path = %file.path,
                references = extraction.references.len(),
                variable_groups = extraction.variable_groups.len(),
                "extracted"
            );
            artifact.raw_references = extraction.references;
            artifact.variable_groups = extraction.variable_groups;
            (artifact, Vec::new())
        }
        Err(e) => {
            tracing::warn!(
                path = %file.path,
                error = %e,
                "artifact parse failed; keeping it without references"
            );
            let diag =
                MapDiagnostic::error(file.path.clone(), DiagnosticStage::Parse, e.to_string());
            (artifact, vec![diag])
        }
    }
}
