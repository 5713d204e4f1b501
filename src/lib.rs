//! procmap: a deterministic artifact mapper for legacy integration projects
//!
//! procmap walks a designer project (processes, shared resources, schemas,
//! service contracts, global variables), pulls reference tokens out of each
//! artifact, resolves them against a base-name index and persists the result
//! as a [`ProjectMap`]: every artifact with its kind and dependencies, plus the
//! processes nothing else calls (entry points).
//!
//! # Pipeline
//!
//! 1. [`scan`]: locate the project, walk it in sorted order, classify files
//! 2. [`index`]: base name → path (last write wins, collisions recorded)
//! 3. [`extract`]: reference tokens per artifact, in parallel
//! 4. [`resolve`]: tokens → paths, with extension inference
//! 5. [`graph`]: assemble the map, compute entry points
//! 6. [`persist`]: canonical JSON on disk
//!
//! The same input tree always produces the same bytes.
//!
//! ```no_run
//! use procmap::{MapperConfig, ProjectMapper};
//!
//! let config = MapperConfig::default();
//! let run = ProjectMapper::new(config)?.run_and_write(None)?;
//! println!("{} artifacts, entry points: {:?}", run.map.len(), run.map.entry_points);
//! # Ok::<(), procmap::MapperError>(())
//! ```

pub mod artifact;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod error_codes;
pub mod extract;
pub mod filter;
pub mod graph;
pub mod index;
pub mod mapper;
pub mod output;
pub mod persist;
pub mod resolve;
pub mod scan;
pub mod validation;
pub mod version;

pub use artifact::{Artifact, ArtifactKind, RawReference, ReferenceHint};
pub use config::MapperConfig;
pub use diagnostics::{
    DiagnosticStage, DiagnosticsLog, DiagnosticsSummary, MapDiagnostic, SkipReason,
};
pub use error::{MapperError, Result};
pub use extract::{ArtifactParseError, ExtractionMode};
pub use filter::ArtifactFilter;
pub use graph::{
    documentation_order, export_map, ArtifactEntry, ExportFormat, MapCounts, ProjectMap,
    VerifyReport,
};
pub use index::{NameCollision, NameIndex};
pub use mapper::{map_project, MapRun, ProjectMapper, ScanProgress};
pub use output::{generate_execution_id, output_json, JsonResponse, OutputFormat};
pub use persist::{fingerprint, read_map, write_map};
pub use resolve::Resolver;
pub use scan::{locate_project_root, scan_project, ScanResult};
