//! Base-name index used during reference resolution
//!
//! Maps a bare file name (`Sub.process`) to one project-relative path.
//! Insertion order is the scanner's sorted order, and the last insertion for
//! a name wins. Every overwrite is kept as a [`NameCollision`] so callers can
//! surface it instead of losing it.

use std::collections::BTreeMap;

use crate::diagnostics::MapDiagnostic;
use crate::validation::base_name;

/// A base name shared by more than one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCollision {
    /// The shared base name
    pub name: String,
    /// Path that now owns the name
    pub kept: String,
    /// Path that lost the name
    pub shadowed: String,
}

impl From<NameCollision> for MapDiagnostic {
    fn from(c: NameCollision) -> Self {
        MapDiagnostic::NameCollision {
            name: c.name,
            kept: c.kept,
            shadowed: c.shadowed,
        }
    }
}

/// Bare file name → project-relative path.
///
/// Built once per run, then only read.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    entries: BTreeMap<String, String>,
    collisions: Vec<NameCollision>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from paths in scan order.
    pub fn from_paths<'a, I>(paths: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut index = Self::new();
        for path in paths {
            index.insert(path);
        }
        index
    }

    /// Insert a path under its base name (last write wins).
    ///
    /// Returns the shadowed path when the name was already taken by a
    /// different path.
    pub fn insert(&mut self, path: &str) -> Option<String> {
        let name = base_name(path).to_string();
        let previous = self.entries.insert(name.clone(), path.to_string())?;
        if previous == path {
            return None;
        }

        tracing::warn!(
            name = %name,
            kept = %path,
            shadowed = %previous,
            "base name collision; later path wins resolution"
        );
        self.collisions.push(NameCollision {
            name,
            kept: path.to_string(),
            shadowed: previous.clone(),
        });
        Some(previous)
    }

    /// Look up a bare file name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collisions recorded while building, in insertion order
    pub fn collisions(&self) -> &[NameCollision] {
        &self.collisions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_by_base_name() {
        let index = NameIndex::from_paths(["Processes/Main.process", "Shared/cfg.sharedjdbc"]);
        assert_eq!(index.get("Main.process"), Some("Processes/Main.process"));
        assert_eq!(index.get("cfg.sharedjdbc"), Some("Shared/cfg.sharedjdbc"));
        assert_eq!(index.get("Processes/Main.process"), None);
        assert_eq!(index.len(), 2);
        assert!(index.collisions().is_empty());
    }

    #[test]
    fn test_collision_last_write_wins_and_is_recorded() {
        let index = NameIndex::from_paths(["A/Common.xsd", "B/Common.xsd"]);
        assert_eq!(index.get("Common.xsd"), Some("B/Common.xsd"));

        let collisions = index.collisions();
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].kept, "B/Common.xsd");
        assert_eq!(collisions[0].shadowed, "A/Common.xsd");
    }

    #[test]
    fn test_reinserting_same_path_is_not_a_collision() {
        let mut index = NameIndex::new();
        assert_eq!(index.insert("Main.process"), None);
        assert_eq!(index.insert("Main.process"), None);
        assert!(index.collisions().is_empty());
    }

    #[test]
    fn test_collision_converts_to_diagnostic() {
        let index = NameIndex::from_paths(["A/x.process", "B/x.process"]);
        let diag: MapDiagnostic = index.collisions()[0].clone().into();
        assert_eq!(diag.path(), "A/x.process");
        assert_eq!(diag.code(), Some("PMAP-REF-002"));
    }
}
