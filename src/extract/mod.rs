//! Reference-token extraction from artifact content
//!
//! Two policies:
//! - **structured** (default): parse the artifact as markup and read the
//!   reference-bearing elements, namespace declarations and `%%var%%` tokens
//! - **fallback** (degraded): regex over raw text for absolute-path-shaped
//!   quoted/bracketed substrings and `%%var%%` tokens
//!
//! Which artifacts get extracted at all is decided by [`extractor_for`], an
//! exhaustive match over [`ArtifactKind`].

pub mod fallback;
pub mod structured;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::artifact::{ArtifactKind, RawReference, ReferenceHint};
use crate::validation::{base_name, normalize_reference};

/// `%%Group/Name%%` global-variable references.
static VARIABLE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"%%([\w/.-]+)%%").expect("variable token pattern must compile"));

/// Extraction policy selected for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    #[default]
    Structured,
    Fallback,
}

impl ExtractionMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "structured" => Some(ExtractionMode::Structured),
            "fallback" | "regex" => Some(ExtractionMode::Fallback),
            _ => None,
        }
    }
}

/// Failure to parse one artifact. Recovered locally by the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArtifactParseError {
    #[error("malformed markup: {0}")]
    Malformed(String),
    #[error("content is not valid UTF-8")]
    NotUtf8,
}

/// Tokens pulled out of one artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Reference tokens in first-seen order, unique by (token, hint)
    pub references: Vec<RawReference>,
    /// Variable-group identifiers
    pub variable_groups: BTreeSet<String>,
    seen: HashSet<(String, ReferenceHint)>,
}

impl Extraction {
    /// Add a reference unless the same token was already seen with the
    /// same hint. The hint picks the inferred extensions, so one base name
    /// under two hints can name two different artifacts.
    pub fn add_reference(&mut self, reference: RawReference) {
        if reference.token.is_empty() {
            return;
        }
        if self.seen.insert((reference.token.clone(), reference.hint)) {
            self.references.push(reference);
        }
    }

    /// Normalize a path-like string to its base name and add it.
    ///
    /// `"/Processes/Orders/Sub.process"` → token `"Sub.process"`.
    pub fn add_path_token(&mut self, raw: &str, hint: ReferenceHint) {
        let normalized = normalize_reference(raw);
        if normalized.is_empty() {
            return;
        }
        self.add_reference(RawReference::new(base_name(&normalized), hint));
    }

    /// Record the group of a `%%Group/Name%%` identifier.
    ///
    /// Identifiers without a separator name a top-level variable and carry
    /// no group.
    pub fn add_variable_identifier(&mut self, identifier: &str) {
        let mut parts = identifier.splitn(2, '/');
        let group = parts.next().unwrap_or_default();
        if parts.next().is_some() && !group.is_empty() {
            self.variable_groups.insert(group.to_string());
        }
    }

    /// Reference tokens only, in order
    pub fn tokens(&self) -> Vec<&str> {
        self.references.iter().map(|r| r.token.as_str()).collect()
    }
}

/// Scan raw text for `%%identifier%%` tokens.
pub fn scan_variable_tokens(content: &str, out: &mut Extraction) {
    for caps in VARIABLE_TOKEN.captures_iter(content) {
        if let Some(m) = caps.get(1) {
            out.add_variable_identifier(m.as_str());
        }
    }
}

/// Signature shared by all extraction handlers.
pub type ExtractFn = fn(&str) -> Result<Extraction, ArtifactParseError>;

/// Pick the handler for an artifact kind, or `None` for kinds that never
/// reference other artifacts.
pub fn extractor_for(kind: ArtifactKind, mode: ExtractionMode) -> Option<ExtractFn> {
    match kind {
        ArtifactKind::Process => Some(match mode {
            ExtractionMode::Structured => structured::extract_process,
            ExtractionMode::Fallback => fallback::extract_text,
        }),
        ArtifactKind::SchemaXsd | ArtifactKind::ServiceWsdl => Some(match mode {
            ExtractionMode::Structured => structured::extract_schema_imports,
            ExtractionMode::Fallback => fallback::extract_text,
        }),
        ArtifactKind::SharedJdbc
        | ArtifactKind::SharedHttp
        | ArtifactKind::SharedJms
        | ArtifactKind::SharedRsp
        | ArtifactKind::SharedParse
        | ArtifactKind::SchemaAe
        | ArtifactKind::GlobalVariables
        | ArtifactKind::Unknown => None,
    }
}

/// Extract tokens from raw file bytes.
///
/// Kinds without a handler yield an empty extraction. Structured mode
/// requires UTF-8; fallback mode decodes lossily.
pub fn extract_from_bytes(
    kind: ArtifactKind,
    bytes: &[u8],
    mode: ExtractionMode,
) -> Result<Extraction, ArtifactParseError> {
    let handler = match extractor_for(kind, mode) {
        Some(h) => h,
        None => return Ok(Extraction::default()),
    };

    match mode {
        ExtractionMode::Structured => {
            let text = std::str::from_utf8(bytes).map_err(|_| ArtifactParseError::NotUtf8)?;
            handler(text)
        }
        ExtractionMode::Fallback => handler(&String::from_utf8_lossy(bytes)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_group_from_first_segment() {
        let mut out = Extraction::default();
        scan_variable_tokens("<a>%%OrderVars/CustomerId%%</a><b>%%Flat%%</b>", &mut out);
        assert_eq!(out.variable_groups.iter().collect::<Vec<_>>(), vec!["OrderVars"]);
    }

    #[test]
    fn test_variable_group_nested_path_uses_first_segment() {
        let mut out = Extraction::default();
        scan_variable_tokens("%%Connections/JDBC/Url%% %%Connections/JMS/Url%%", &mut out);
        assert_eq!(out.variable_groups.len(), 1);
        assert!(out.variable_groups.contains("Connections"));
    }

    #[test]
    fn test_add_path_token_dedups_by_base_name() {
        let mut out = Extraction::default();
        out.add_path_token("/Processes/Sub.process", ReferenceHint::Process);
        out.add_path_token("Sub.process", ReferenceHint::Process);
        out.add_path_token("  ", ReferenceHint::Process);
        assert_eq!(out.tokens(), vec!["Sub.process"]);
    }

    #[test]
    fn test_same_base_name_under_different_hints_is_kept() {
        let mut out = Extraction::default();
        out.add_path_token("/Processes/Order", ReferenceHint::Process);
        out.add_path_token("/Events/Order", ReferenceHint::Schema);
        out.add_path_token("/Other/Order", ReferenceHint::Schema);

        assert_eq!(out.tokens(), vec!["Order", "Order"]);
        assert_eq!(out.references[0].hint, ReferenceHint::Process);
        assert_eq!(out.references[1].hint, ReferenceHint::Schema);
    }

    #[test]
    fn test_non_referencing_kinds_have_no_handler() {
        assert!(extractor_for(ArtifactKind::SharedJdbc, ExtractionMode::Structured).is_none());
        assert!(extractor_for(ArtifactKind::Unknown, ExtractionMode::Fallback).is_none());
        assert!(extractor_for(ArtifactKind::Process, ExtractionMode::Structured).is_some());
    }

    #[test]
    fn test_structured_rejects_invalid_utf8() {
        let result = extract_from_bytes(
            ArtifactKind::Process,
            &[0xff, 0xfe, b'<'],
            ExtractionMode::Structured,
        );
        assert_eq!(result, Err(ArtifactParseError::NotUtf8));
    }

    #[test]
    fn test_unreferencing_kind_yields_empty() {
        let out = extract_from_bytes(
            ArtifactKind::SchemaAe,
            b"not even xml",
            ExtractionMode::Structured,
        )
        .unwrap();
        assert!(out.references.is_empty());
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(
            ExtractionMode::from_str("Structured"),
            Some(ExtractionMode::Structured)
        );
        assert_eq!(ExtractionMode::from_str("fallback"), Some(ExtractionMode::Fallback));
        assert_eq!(ExtractionMode::from_str("xml"), None);
    }
}
