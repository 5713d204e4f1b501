//! Export of a project map to JSON or Graphviz DOT

use crate::error::Result;
use crate::persist;

use super::ProjectMap;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Canonical map document (same bytes as the persisted file)
    Json,
    /// Graphviz DOT, one node per artifact, one edge per dependency
    Dot,
}

impl ExportFormat {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "dot" | "graphviz" => Some(ExportFormat::Dot),
            _ => None,
        }
    }
}

/// Render `map` in the requested format.
pub fn export_map(map: &ProjectMap, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => persist::to_json_string(map),
        ExportFormat::Dot => Ok(export_dot(map)),
    }
}

fn node_shape(kind: crate::artifact::ArtifactKind) -> &'static str {
    use crate::artifact::ArtifactKind::*;
    match kind {
        Process => "box",
        SharedJdbc | SharedHttp | SharedJms | SharedRsp | SharedParse => "cylinder",
        SchemaXsd | SchemaAe | ServiceWsdl => "note",
        GlobalVariables => "folder",
        Unknown => "ellipse",
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Render the dependency graph as DOT.
///
/// Node ids are the quoted artifact paths, so the output stays readable and
/// needs no id table. Entry points are drawn bold.
pub fn export_dot(map: &ProjectMap) -> String {
    let mut out = String::new();
    out.push_str("digraph project {\n");
    out.push_str("    rankdir=LR;\n");
    out.push_str("    node [fontsize=10];\n\n");

    for (path, entry) in &map.artifacts {
        let style = if map.entry_points.iter().any(|e| e == path) {
            ", style=bold"
        } else {
            ""
        };
        out.push_str(&format!(
            "    \"{}\" [shape={}, tooltip=\"{}\"{}];\n",
            escape(path),
            node_shape(entry.kind),
            entry.kind,
            style
        ));
    }

    out.push('\n');

    for (path, entry) in &map.artifacts {
        for dep in &entry.dependencies {
            out.push_str(&format!("    \"{}\" -> \"{}\";\n", escape(path), escape(dep)));
        }
    }

    out.push_str("}\n");
    out
}
