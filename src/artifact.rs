//! Artifact kinds and per-artifact records
//!
//! Every retained file in a project becomes an [`Artifact`] with a kind taken
//! from a static extension table. The kind vocabulary is closed: adding a kind
//! means adding a variant here, and every `match` over [`ArtifactKind`] in the
//! crate has to handle it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

/// Kind of artifact, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ArtifactKind {
    /// Process definition (`.process`)
    #[serde(rename = "process")]
    Process,
    /// Shared JDBC connection (`.sharedjdbc`)
    #[serde(rename = "shared-jdbc")]
    SharedJdbc,
    /// Shared HTTP connection (`.sharedhttp`)
    #[serde(rename = "shared-http")]
    SharedHttp,
    /// Shared JMS connection (`.sharedjms`)
    #[serde(rename = "shared-jms")]
    SharedJms,
    /// Shared rendezvous/RSP resource (`.sharedrsp`)
    #[serde(rename = "shared-rsp")]
    SharedRsp,
    /// Shared data-format parse resource (`.sharedparse`)
    #[serde(rename = "shared-parse")]
    SharedParse,
    /// XML schema (`.xsd`)
    #[serde(rename = "schema-xsd")]
    SchemaXsd,
    /// Adapter/event schema (`.aeschema`)
    #[serde(rename = "schema-ae")]
    SchemaAe,
    /// Service contract (`.wsdl`)
    #[serde(rename = "service-wsdl")]
    ServiceWsdl,
    /// Global variable set (`.substvar`)
    #[serde(rename = "global-variables")]
    GlobalVariables,
    /// Retained file with no mapped extension
    #[serde(rename = "unknown")]
    Unknown,
}

/// Extension → kind table. Extensions are compared lowercase, without the dot.
const EXTENSION_KINDS: &[(&str, ArtifactKind)] = &[
    ("process", ArtifactKind::Process),
    ("sharedjdbc", ArtifactKind::SharedJdbc),
    ("sharedhttp", ArtifactKind::SharedHttp),
    ("sharedjms", ArtifactKind::SharedJms),
    ("sharedrsp", ArtifactKind::SharedRsp),
    ("sharedparse", ArtifactKind::SharedParse),
    ("xsd", ArtifactKind::SchemaXsd),
    ("aeschema", ArtifactKind::SchemaAe),
    ("wsdl", ArtifactKind::ServiceWsdl),
    ("substvar", ArtifactKind::GlobalVariables),
];

/// Extensions that never become graph nodes (folder markers, opaque data).
pub const IGNORED_EXTENSIONS: &[&str] = &["folder", "dat"];

/// Repository metadata file names that never become graph nodes.
pub const IGNORED_FILE_NAMES: &[&str] = &[
    ".gitignore",
    ".gitattributes",
    ".gitkeep",
    ".DS_Store",
    "Thumbs.db",
];

/// Version-control directories skipped entirely during the walk.
pub const IGNORED_DIRS: &[&str] = &[".git", ".svn", ".hg"];

impl ArtifactKind {
    /// All kinds, in declaration order
    pub const ALL: [ArtifactKind; 11] = [
        ArtifactKind::Process,
        ArtifactKind::SharedJdbc,
        ArtifactKind::SharedHttp,
        ArtifactKind::SharedJms,
        ArtifactKind::SharedRsp,
        ArtifactKind::SharedParse,
        ArtifactKind::SchemaXsd,
        ArtifactKind::SchemaAe,
        ArtifactKind::ServiceWsdl,
        ArtifactKind::GlobalVariables,
        ArtifactKind::Unknown,
    ];

    /// Classify a file by its extension.
    ///
    /// Unmapped extensions (and files with no extension) are `Unknown`.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(ArtifactKind::Unknown)
    }

    /// Classify a bare extension (no leading dot, any case).
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.to_ascii_lowercase();
        EXTENSION_KINDS
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, kind)| *kind)
            .unwrap_or(ArtifactKind::Unknown)
    }

    /// Stable vocabulary string, as persisted in the map
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Process => "process",
            ArtifactKind::SharedJdbc => "shared-jdbc",
            ArtifactKind::SharedHttp => "shared-http",
            ArtifactKind::SharedJms => "shared-jms",
            ArtifactKind::SharedRsp => "shared-rsp",
            ArtifactKind::SharedParse => "shared-parse",
            ArtifactKind::SchemaXsd => "schema-xsd",
            ArtifactKind::SchemaAe => "schema-ae",
            ArtifactKind::ServiceWsdl => "service-wsdl",
            ArtifactKind::GlobalVariables => "global-variables",
            ArtifactKind::Unknown => "unknown",
        }
    }

    /// Parse a vocabulary string back into a kind
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == s)
    }

    pub fn is_process(&self) -> bool {
        matches!(self, ArtifactKind::Process)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a file is excluded from the graph by the built-in ignore rules.
///
/// `extra_extensions` are additional ignored extensions from configuration
/// (no leading dot).
pub fn is_ignored_file(path: &Path, extra_extensions: &[String]) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return false,
    };
    if IGNORED_FILE_NAMES.contains(&name) {
        return true;
    }

    // Marker files are dot-files (".folder"), which Path::extension() skips.
    let ext = match name.rfind('.') {
        Some(pos) if pos + 1 < name.len() => name[pos + 1..].to_ascii_lowercase(),
        _ => return false,
    };
    IGNORED_EXTENSIONS.contains(&ext.as_str())
        || extra_extensions
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(&ext))
}

/// What a reference token most likely points at.
///
/// Drives the candidate extensions tried for extension-less tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceHint {
    /// Process-call target
    Process,
    /// Shared resource, destination or rendezvous reference
    Resource,
    /// Schema, event or service-contract reference
    Schema,
    /// No context (degraded extraction)
    Any,
}

impl ReferenceHint {
    /// Ordered candidate extensions (with leading dot) for extension inference.
    pub fn candidate_extensions(&self) -> &'static [&'static str] {
        match self {
            ReferenceHint::Process => &[".process"],
            ReferenceHint::Resource => &[
                ".sharedjdbc",
                ".sharedjms",
                ".sharedhttp",
                ".sharedrsp",
                ".sharedparse",
                ".aeschema",
            ],
            ReferenceHint::Schema => &[".aeschema", ".xsd", ".wsdl"],
            ReferenceHint::Any => &[
                ".process",
                ".sharedjdbc",
                ".sharedjms",
                ".sharedhttp",
                ".sharedrsp",
                ".sharedparse",
                ".aeschema",
                ".xsd",
                ".wsdl",
            ],
        }
    }
}

/// An unresolved reference token pulled out of an artifact's content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RawReference {
    /// Base name (or path fragment) naming the target
    pub token: String,
    /// Context the token was found in
    pub hint: ReferenceHint,
    /// True when the token carries no extension and inference is required
    pub extension_ambiguous: bool,
}

impl RawReference {
    /// Build a reference from a token, flagging a missing extension.
    pub fn new(token: impl Into<String>, hint: ReferenceHint) -> Self {
        let token = token.into();
        let extension_ambiguous = !has_extension(&token);
        RawReference {
            token,
            hint,
            extension_ambiguous,
        }
    }
}

/// True when the last path segment of `token` has a non-empty extension.
pub fn has_extension(token: &str) -> bool {
    let last = token.rsplit('/').next().unwrap_or(token);
    match last.rfind('.') {
        Some(pos) => pos > 0 && pos + 1 < last.len(),
        None => false,
    }
}

/// One artifact of the project.
///
/// Created by the scan, filled by extraction, mutated once by resolution,
/// then frozen into the [`crate::graph::ProjectMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Project-relative, slash-normalized path (unique)
    pub path: String,
    pub kind: ArtifactKind,
    /// Extracted tokens, in first-seen order, without duplicates
    pub raw_references: Vec<RawReference>,
    /// Resolved target paths
    pub resolved_dependencies: BTreeSet<String>,
    /// Global-variable groups referenced through `%%group/name%%` tokens
    pub variable_groups: BTreeSet<String>,
}

impl Artifact {
    pub fn new(path: impl Into<String>, kind: ArtifactKind) -> Self {
        Artifact {
            path: path.into(),
            kind,
            raw_references: Vec::new(),
            resolved_dependencies: BTreeSet::new(),
            variable_groups: BTreeSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension_table() {
        assert_eq!(ArtifactKind::from_path(Path::new("a/Main.process")), ArtifactKind::Process);
        assert_eq!(ArtifactKind::from_path(Path::new("cfg.sharedjdbc")), ArtifactKind::SharedJdbc);
        assert_eq!(ArtifactKind::from_path(Path::new("x.SharedJMS")), ArtifactKind::SharedJms);
        assert_eq!(ArtifactKind::from_path(Path::new("Order.aeschema")), ArtifactKind::SchemaAe);
        assert_eq!(
            ArtifactKind::from_path(Path::new("defaultVars.substvar")),
            ArtifactKind::GlobalVariables
        );
        assert_eq!(ArtifactKind::from_path(Path::new("README")), ArtifactKind::Unknown);
        assert_eq!(ArtifactKind::from_path(Path::new("notes.txt")), ArtifactKind::Unknown);
    }

    #[test]
    fn test_kind_vocabulary_round_trips() {
        for kind in ArtifactKind::ALL {
            assert_eq!(ArtifactKind::parse(kind.as_str()), Some(kind));
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
        assert_eq!(ArtifactKind::parse("shared-ftp"), None);
    }

    #[test]
    fn test_ignored_files() {
        assert!(is_ignored_file(Path::new("Processes/.folder"), &[]));
        assert!(is_ignored_file(Path::new("vcrepo.dat"), &[]));
        assert!(is_ignored_file(Path::new("sub/.gitignore"), &[]));
        assert!(!is_ignored_file(Path::new("Main.process"), &[]));
        assert!(is_ignored_file(Path::new("design.bak"), &[".bak".to_string()]));
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension("Sub.process"));
        assert!(has_extension("Shared/cfg.sharedjdbc"));
        assert!(!has_extension("OrderValidator"));
        assert!(!has_extension("v1.2/OrderEvent"));
        assert!(!has_extension(".hidden"));
        assert!(!has_extension("trailing."));
    }

    #[test]
    fn test_raw_reference_flags_missing_extension() {
        let r = RawReference::new("OrderValidator", ReferenceHint::Process);
        assert!(r.extension_ambiguous);
        let r = RawReference::new("Sub.process", ReferenceHint::Process);
        assert!(!r.extension_ambiguous);
    }

    #[test]
    fn test_process_hint_tries_process_first() {
        assert_eq!(ReferenceHint::Process.candidate_extensions()[0], ".process");
        assert_eq!(ReferenceHint::Any.candidate_extensions()[0], ".process");
        assert_eq!(ReferenceHint::Schema.candidate_extensions()[0], ".aeschema");
    }
}
