//! Project map assembly
//!
//! [`ProjectMap`] is the frozen result of a run: every retained artifact with
//! its kind, sorted dependency paths and variable groups, plus the computed
//! entry points. It is the only thing downstream stages read.
//!
//! # Determinism
//!
//! `artifacts` is a `BTreeMap` and every list is sorted and deduplicated on
//! construction, so assembling the same resolved artifacts twice serializes to
//! the same bytes.

pub mod algorithms;
pub mod export;
pub mod validation;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::artifact::{Artifact, ArtifactKind};

pub use algorithms::documentation_order;
pub use export::{export_map, ExportFormat};
pub use validation::{MapIssue, VerifyReport};

/// One artifact as persisted in the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactEntry {
    pub kind: ArtifactKind,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub variable_groups: Vec<String>,
}

impl ArtifactEntry {
    pub fn new(kind: ArtifactKind) -> Self {
        ArtifactEntry {
            kind,
            dependencies: Vec::new(),
            variable_groups: Vec::new(),
        }
    }
}

/// The artifact graph of one project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMap {
    pub artifacts: BTreeMap<String, ArtifactEntry>,
    #[serde(default)]
    pub entry_points: Vec<String>,
}

/// Per-kind artifact counts plus edge totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapCounts {
    pub artifacts: usize,
    pub dependencies: usize,
    pub entry_points: usize,
    pub variable_groups: usize,
    /// Kind vocabulary string → count; kinds with no artifacts are omitted
    pub by_kind: BTreeMap<String, usize>,
}

impl ProjectMap {
    /// Assemble a map from resolved artifacts.
    ///
    /// Dependencies that do not name another artifact in the set are dropped,
    /// so the result is always closed. Entry points are recomputed.
    pub fn assemble<'a, I>(artifacts: I) -> Self
    where
        I: IntoIterator<Item = &'a Artifact>,
    {
        let mut entries = BTreeMap::new();
        let mut resolved: Vec<(&'a str, &'a BTreeSet<String>, &'a BTreeSet<String>)> = Vec::new();

        for artifact in artifacts {
            entries.insert(artifact.path.clone(), ArtifactEntry::new(artifact.kind));
            resolved.push((
                &artifact.path,
                &artifact.resolved_dependencies,
                &artifact.variable_groups,
            ));
        }

        for (path, deps, groups) in resolved {
            let dependencies: Vec<String> = deps
                .iter()
                .filter(|dep| {
                    let known = entries.contains_key(dep.as_str()) && dep.as_str() != path;
                    if !known {
                        tracing::debug!(
                            artifact = %path,
                            dependency = %dep,
                            "dropping dependency outside the artifact set"
                        );
                    }
                    known
                })
                .cloned()
                .collect();

            if let Some(entry) = entries.get_mut(path) {
                entry.dependencies = dependencies;
                entry.variable_groups = groups.iter().cloned().collect();
            }
        }

        let mut map = ProjectMap {
            artifacts: entries,
            entry_points: Vec::new(),
        };
        map.entry_points = map.compute_entry_points();
        map
    }

    /// Process artifacts that no process artifact depends on, sorted.
    pub fn compute_entry_points(&self) -> Vec<String> {
        let called: BTreeSet<&str> = self
            .processes()
            .flat_map(|(_, entry)| entry.dependencies.iter().map(String::as_str))
            .collect();

        self.processes()
            .map(|(path, _)| path)
            .filter(|path| !called.contains(path))
            .map(str::to_string)
            .collect()
    }

    /// Restore the canonical form: sorted, deduplicated lists, edges closed
    /// over the artifact set, entry points recomputed.
    ///
    /// Applying this to an already canonical map changes nothing.
    pub fn normalize(&mut self) {
        let keys: BTreeSet<String> = self.artifacts.keys().cloned().collect();
        for (path, entry) in self.artifacts.iter_mut() {
            entry.dependencies.sort();
            entry.dependencies.dedup();
            entry
                .dependencies
                .retain(|dep| keys.contains(dep) && dep != path);
            entry.variable_groups.sort();
            entry.variable_groups.dedup();
        }
        self.entry_points = self.compute_entry_points();
    }

    /// Iterate over process artifacts in path order.
    pub fn processes(&self) -> impl Iterator<Item = (&str, &ArtifactEntry)> {
        self.artifacts
            .iter()
            .filter(|(_, entry)| entry.kind.is_process())
            .map(|(path, entry)| (path.as_str(), entry))
    }

    pub fn get(&self, path: &str) -> Option<&ArtifactEntry> {
        self.artifacts.get(path)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Total number of dependency edges
    pub fn edge_count(&self) -> usize {
        self.artifacts.values().map(|e| e.dependencies.len()).sum()
    }

    pub fn counts(&self) -> MapCounts {
        let mut by_kind: BTreeMap<String, usize> = BTreeMap::new();
        let mut groups: BTreeSet<&str> = BTreeSet::new();
        for entry in self.artifacts.values() {
            *by_kind.entry(entry.kind.as_str().to_string()).or_default() += 1;
            groups.extend(entry.variable_groups.iter().map(String::as_str));
        }

        MapCounts {
            artifacts: self.artifacts.len(),
            dependencies: self.edge_count(),
            entry_points: self.entry_points.len(),
            variable_groups: groups.len(),
            by_kind,
        }
    }
}
