//! Markup-based extraction (the primary policy)
//!
//! Elements are matched by local name, so `<pd:processName>` and
//! `<processName>` are the same tag whatever prefix the artifact declares.

use once_cell::sync::Lazy;
use regex::Regex;
use roxmltree::{Document, ParsingOptions};

use super::{scan_variable_tokens, ArtifactParseError, Extraction};
use crate::artifact::{RawReference, ReferenceHint};

/// Absolute paths to shared resources inside element text.
static SHARED_RESOURCE_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/[\w/.-]+\.shared\w+").expect("shared resource pattern must compile")
});

/// Namespace path segment that marks an event/ontology schema URI.
const ONTOLOGY_SEGMENT: &str = "/ontology/";

/// Reference-bearing tags of process artifacts.
fn reference_tag_hint(local_name: &str) -> Option<ReferenceHint> {
    match local_name {
        "processName" => Some(ReferenceHint::Process),
        "rspRef" | "destinationRef" => Some(ReferenceHint::Resource),
        "eventRef" => Some(ReferenceHint::Schema),
        _ => None,
    }
}

fn parse_document(content: &str) -> Result<Document<'_>, ArtifactParseError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(content, options)
        .map_err(|e| ArtifactParseError::Malformed(e.to_string()))
}

/// Schema token derived from an ontology namespace URI.
///
/// `http://www.tibco.com/ns/tns/ae/ontology/Schemas/OrderEvent` → `OrderEvent`
pub fn ontology_token(uri: &str) -> Option<&str> {
    let (_, tail) = uri.split_once(ONTOLOGY_SEGMENT)?;
    let tail = tail.split('#').next().unwrap_or(tail);
    tail.split('/').filter(|s| !s.is_empty()).last()
}

/// Extract reference tokens from a process artifact.
///
/// # Sources, in document order
/// 1. Text of `processName`, `rspRef`, `destinationRef`, `eventRef`
/// 2. Absolute `*.shared*` paths inside any element text
/// 3. Ontology namespace URIs (schema tokens)
/// 4. `%%Group/Name%%` tokens (variable groups, kept apart from references)
pub fn extract_process(content: &str) -> Result<Extraction, ArtifactParseError> {
    let doc = parse_document(content)?;
    let mut out = Extraction::default();

    for node in doc.descendants().filter(|n| n.is_element()) {
        let text = node.text();

        if let (Some(hint), Some(text)) = (reference_tag_hint(node.tag_name().name()), text) {
            out.add_path_token(text, hint);
        }

        if let Some(text) = text {
            for m in SHARED_RESOURCE_PATH.find_iter(text) {
                out.add_path_token(m.as_str(), ReferenceHint::Resource);
            }
        }
    }

    for node in doc.descendants().filter(|n| n.is_element()) {
        for ns in node.namespaces() {
            if let Some(token) = ontology_token(ns.uri()) {
                out.add_reference(RawReference::new(token, ReferenceHint::Schema));
            }
        }
    }

    scan_variable_tokens(content, &mut out);
    Ok(out)
}

/// Extract imported/included schema locations from a schema or service
/// contract.
///
/// Remote locations (`scheme://...`) are not project artifacts and are
/// ignored.
pub fn extract_schema_imports(content: &str) -> Result<Extraction, ArtifactParseError> {
    let doc = parse_document(content)?;
    let mut out = Extraction::default();

    for node in doc.descendants().filter(|n| n.is_element()) {
        if !matches!(node.tag_name().name(), "import" | "include" | "redefine") {
            continue;
        }
        let location = node
            .attribute("schemaLocation")
            .or_else(|| node.attribute("location"));
        if let Some(location) = location {
            if !location.contains("://") {
                out.add_path_token(location, ReferenceHint::Schema);
            }
        }
    }

    scan_variable_tokens(content, &mut out);
    Ok(out)
}
