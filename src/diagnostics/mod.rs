//! Structured diagnostics for mapping runs.
//!
//! Provides deterministic, sortable diagnostic types for skipped files,
//! recovered errors, unresolved references and name collisions.

pub mod run_diagnostics;

pub use run_diagnostics::{
    DiagnosticStage, DiagnosticsLog, DiagnosticsSummary, MapDiagnostic, SkipReason,
};
