//! JSON output types for CLI commands
//!
//! Every JSON document printed by the binary is a [`JsonResponse`] whose
//! `data` is one of the response types below. The map document itself is
//! never wrapped: `export --format json` prints it as persisted.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;

use crate::diagnostics::{DiagnosticsSummary, MapDiagnostic};
use crate::graph::{MapIssue, VerifyReport};

/// Bumped whenever a field is renamed or removed from a response type.
pub const PROCMAP_JSON_SCHEMA_VERSION: &str = "1.0.0";

const TOOL_NAME: &str = "procmap";

/// Envelope around every JSON document the binary prints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse<T> {
    pub schema_version: String,
    /// Correlates stdout with log lines of the same invocation
    pub execution_id: String,
    pub tool: String,
    /// RFC 3339, seconds precision, UTC
    pub timestamp: String,
    pub data: T,
    /// Set on map responses when the run produced diagnostics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial: Option<bool>,
}

impl<T> JsonResponse<T> {
    pub fn new(data: T, execution_id: &str) -> Self {
        JsonResponse {
            schema_version: PROCMAP_JSON_SCHEMA_VERSION.to_string(),
            execution_id: execution_id.to_string(),
            tool: TOOL_NAME.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            data,
            partial: None,
        }
    }

    pub fn with_partial(mut self, partial: bool) -> Self {
        self.partial = Some(partial);
        self
    }
}

/// Response for the map command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapResponse {
    /// Directory the project was found in
    pub project_root: String,
    /// Where the map was written
    pub output: String,
    pub artifacts: usize,
    pub dependencies: usize,
    pub entry_points: Vec<String>,
    /// SHA-256 of the written document
    pub fingerprint: String,
    pub summary: DiagnosticsSummary,
    /// Full diagnostics, in sorted order
    pub diagnostics: Vec<MapDiagnostic>,
}

/// Response for the status command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub artifacts: usize,
    /// Edge count across all artifacts
    pub dependencies: usize,
    /// Distinct variable groups referenced anywhere
    pub variable_groups: usize,
    /// Artifact count per kind
    pub by_kind: BTreeMap<String, usize>,
    pub entry_points: Vec<String>,
    pub fingerprint: String,
}

/// Response for the verify command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// True when `errors` is empty; warnings do not fail verification
    pub passed: bool,
    pub artifacts_checked: usize,
    pub error_count: usize,
    pub errors: Vec<MapIssue>,
    pub warning_count: usize,
    pub warnings: Vec<MapIssue>,
}

impl From<VerifyReport> for VerifyResponse {
    fn from(report: VerifyReport) -> Self {
        VerifyResponse {
            passed: report.passed(),
            artifacts_checked: report.artifacts_checked,
            error_count: report.errors.len(),
            errors: report.errors,
            warning_count: report.warnings.len(),
            warnings: report.warnings,
        }
    }
}

/// Response for the order command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    /// Processes in documentation order
    pub order: Vec<String>,
}

/// Printed instead of a response when a command fails in JSON mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// `PMAP-*` code, or `PMAP-INTERNAL` for errors outside the library
    pub error: String,
    pub message: String,
}

/// How a command renders its result on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

impl OutputFormat {
    /// Case-insensitive; `text` is accepted as an alias for `human`.
    pub fn from_str(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("json") {
            Some(OutputFormat::Json)
        } else if s.eq_ignore_ascii_case("human") || s.eq_ignore_ascii_case("text") {
            Some(OutputFormat::Human)
        } else {
            None
        }
    }
}

/// `{unix seconds:x}-{pid:x}`, unique enough to tell invocations apart.
pub fn generate_execution_id() -> String {
    format!("{:x}-{:x}", Utc::now().timestamp(), std::process::id())
}

/// Pretty-print `data` as one JSON document on stdout.
pub fn output_json<T: Serialize>(data: &T) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, data)?;
    writeln!(stdout)?;
    Ok(())
}
