//! Reference resolution against the name index
//!
//! Maps a raw token to zero or one artifact path:
//! 1. the token is an index key → that path
//! 2. the token has no extension → first hit among the hint's candidate
//!    extensions, in order
//! 3. otherwise the token is unresolved and dropped
//!
//! Unresolved tokens are not errors. The caller records them in the run
//! diagnostics and moves on.

use std::collections::BTreeSet;

use crate::artifact::{Artifact, RawReference};
use crate::diagnostics::MapDiagnostic;
use crate::index::NameIndex;

/// Result of resolving one artifact's tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub dependencies: BTreeSet<String>,
    /// Tokens with no match, in extraction order
    pub unresolved: Vec<String>,
}

/// Resolver over a frozen name index.
pub struct Resolver<'a> {
    index: &'a NameIndex,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a NameIndex) -> Self {
        Self { index }
    }

    /// Resolve one token.
    pub fn resolve(&self, reference: &RawReference) -> Option<&'a str> {
        if let Some(path) = self.index.get(&reference.token) {
            return Some(path);
        }

        if !reference.extension_ambiguous {
            return None;
        }

        reference
            .hint
            .candidate_extensions()
            .iter()
            .find_map(|ext| self.index.get(&format!("{}{}", reference.token, ext)))
    }

    /// Resolve every token of `references` on behalf of the artifact at
    /// `owner`.
    ///
    /// A token that resolves back to `owner` (a process calling itself) is
    /// not a dependency and is dropped silently.
    pub fn resolve_all(&self, owner: &str, references: &[RawReference]) -> Resolution {
        let mut resolution = Resolution::default();
        for reference in references {
            match self.resolve(reference) {
                Some(path) if path == owner => {}
                Some(path) => {
                    resolution.dependencies.insert(path.to_string());
                }
                None => {
                    if !resolution.unresolved.contains(&reference.token) {
                        resolution.unresolved.push(reference.token.clone());
                    }
                }
            }
        }
        resolution
    }

    /// Resolve an artifact in place, returning diagnostics for every
    /// unresolved token.
    pub fn resolve_artifact(&self, artifact: &mut Artifact) -> Vec<MapDiagnostic> {
        let resolution = self.resolve_all(&artifact.path, &artifact.raw_references);
        artifact.resolved_dependencies = resolution.dependencies;

        resolution
            .unresolved
            .into_iter()
            .map(|token| {
                tracing::debug!(artifact = %artifact.path, token = %token, "unresolved reference");
                MapDiagnostic::unresolved(artifact.path.clone(), token)
            })
            .collect()
    }
}
