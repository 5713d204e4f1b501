//! Regex-only extraction (degraded mode)
//!
//! Used when structured parsing is switched off. It sees absolute-path-shaped
//! strings between quotes or brackets and nothing else, so it misses
//! extension-less process calls written without a leading `/` and ontology
//! namespaces, and it can pick up paths that are not references at all.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{scan_variable_tokens, ArtifactParseError, Extraction};
use crate::artifact::ReferenceHint;

/// `"/a/b.c"`, `'/a/b'`, `>/a/b<`, `[/a/b]`
static DELIMITED_ABSOLUTE_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"["'>\[]\s*(/[\w.\-]+(?:/[\w.\-]+)*)\s*["'<\]]"#)
        .expect("delimited path pattern must compile")
});

/// Extract tokens from raw text. Never fails.
pub fn extract_text(content: &str) -> Result<Extraction, ArtifactParseError> {
    let mut out = Extraction::default();

    for caps in DELIMITED_ABSOLUTE_PATH.captures_iter(content) {
        if let Some(m) = caps.get(1) {
            out.add_path_token(m.as_str(), ReferenceHint::Any);
        }
    }

    scan_variable_tokens(content, &mut out);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimited_paths() {
        let text = r#"<processName>/Processes/Sub.process</processName>
            <ref path="/Shared/cfg.sharedjdbc"/> [ /Schemas/Order ]"#;
        let out = extract_text(text).unwrap();
        assert_eq!(out.tokens(), vec!["Sub.process", "cfg.sharedjdbc", "Order"]);
        assert!(out.references.iter().all(|r| r.hint == ReferenceHint::Any));
    }

    #[test]
    fn test_relative_paths_are_not_matched() {
        let out = extract_text(r#"<a href="relative/Thing.process"/>"#).unwrap();
        assert!(out.references.is_empty());
    }

    #[test]
    fn test_tolerates_broken_markup() {
        let out =
            extract_text("<pd:Process><processName>/P/Sub.process</processName> %%Vars/X%%")
                .unwrap();
        assert_eq!(out.tokens(), vec!["Sub.process"]);
        assert!(out.variable_groups.contains("Vars"));
    }
}
