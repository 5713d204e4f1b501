//! Consistency checks for a persisted project map
//!
//! A map written by this crate is always consistent. Maps read back from
//! disk may have been edited by hand or produced elsewhere, so downstream
//! stages can run [`ProjectMap::verify`] before trusting one.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::ProjectMap;
use crate::error_codes::{
    PMAP_MAP_002_DANGLING_DEPENDENCY, PMAP_MAP_003_ENTRY_POINT_MISMATCH, PMAP_MAP_004_UNSORTED_LIST,
};

/// One problem found in a map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapIssue {
    /// Stable diagnostic code (`PMAP-MAP-*`)
    pub code: String,
    pub message: String,
    /// Artifact the issue is attached to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,
}

impl MapIssue {
    fn new(code: &str, message: String) -> Self {
        MapIssue {
            code: code.to_string(),
            message,
            artifact: None,
        }
    }

    fn with_artifact(mut self, artifact: &str) -> Self {
        self.artifact = Some(artifact.to_string());
        self
    }
}

/// Result of verifying a map.
///
/// Errors break the closure or entry-point rules; warnings only affect
/// byte-level reproducibility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyReport {
    pub artifacts_checked: usize,
    pub errors: Vec<MapIssue>,
    pub warnings: Vec<MapIssue>,
}

impl VerifyReport {
    pub fn total_issues(&self) -> usize {
        self.errors.len() + self.warnings.len()
    }

    pub fn is_clean(&self) -> bool {
        self.total_issues() == 0
    }

    /// True when no errors were found (warnings allowed)
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }
}

fn is_sorted_unique(items: &[String]) -> bool {
    items.windows(2).all(|w| w[0] < w[1])
}

impl ProjectMap {
    /// Check closure, entry-point correctness and list ordering.
    pub fn verify(&self) -> VerifyReport {
        let mut report = VerifyReport {
            artifacts_checked: self.artifacts.len(),
            ..VerifyReport::default()
        };

        for (path, entry) in &self.artifacts {
            for dep in &entry.dependencies {
                if !self.artifacts.contains_key(dep) {
                    report.errors.push(
                        MapIssue::new(
                            PMAP_MAP_002_DANGLING_DEPENDENCY,
                            format!("dependency '{}' is not an artifact of the map", dep),
                        )
                        .with_artifact(path),
                    );
                }
            }

            if !is_sorted_unique(&entry.dependencies) {
                report.warnings.push(
                    MapIssue::new(
                        PMAP_MAP_004_UNSORTED_LIST,
                        "dependencies are not sorted and unique".to_string(),
                    )
                    .with_artifact(path),
                );
            }
            if !is_sorted_unique(&entry.variable_groups) {
                report.warnings.push(
                    MapIssue::new(
                        PMAP_MAP_004_UNSORTED_LIST,
                        "variable_groups are not sorted and unique".to_string(),
                    )
                    .with_artifact(path),
                );
            }
        }

        let expected: BTreeSet<String> = self.compute_entry_points().into_iter().collect();
        let recorded: BTreeSet<String> = self.entry_points.iter().cloned().collect();

        for missing in expected.difference(&recorded) {
            report.errors.push(
                MapIssue::new(
                    PMAP_MAP_003_ENTRY_POINT_MISMATCH,
                    "process is never called but is not listed as an entry point".to_string(),
                )
                .with_artifact(missing),
            );
        }
        for extra in recorded.difference(&expected) {
            let reason = match self.artifacts.get(extra) {
                None => "entry point is not an artifact of the map",
                Some(entry) if !entry.kind.is_process() => "entry point is not a process",
                Some(_) => "entry point is called by another process",
            };
            report.errors.push(
                MapIssue::new(PMAP_MAP_003_ENTRY_POINT_MISMATCH, reason.to_string())
                    .with_artifact(extra),
            );
        }

        if !is_sorted_unique(&self.entry_points) {
            report.warnings.push(MapIssue::new(
                PMAP_MAP_004_UNSORTED_LIST,
                "entry_points are not sorted and unique".to_string(),
            ));
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::ArtifactKind;
    use crate::graph::ArtifactEntry;

    fn entry(kind: ArtifactKind, deps: &[&str]) -> ArtifactEntry {
        let mut e = ArtifactEntry::new(kind);
        e.dependencies = deps.iter().map(|d| d.to_string()).collect();
        e
    }

    fn consistent() -> ProjectMap {
        let mut map = ProjectMap::default();
        map.artifacts.insert("Main.process".into(), entry(ArtifactKind::Process, &["Sub.process"]));
        map.artifacts.insert("Sub.process".into(), entry(ArtifactKind::Process, &[]));
        map.entry_points = vec!["Main.process".into()];
        map
    }

    #[test]
    fn test_consistent_map_is_clean() {
        let report = consistent().verify();
        assert!(report.is_clean(), "{:?}", report);
        assert_eq!(report.artifacts_checked, 2);
    }

    #[test]
    fn test_dangling_dependency() {
        let mut map = consistent();
        map.artifacts.get_mut("Sub.process").unwrap().dependencies = vec!["Ghost.process".into()];
        let report = map.verify();
        assert!(!report.passed());
        assert_eq!(report.errors[0].code, PMAP_MAP_002_DANGLING_DEPENDENCY);
        assert_eq!(report.errors[0].artifact.as_deref(), Some("Sub.process"));
    }

    #[test]
    fn test_entry_point_mismatch_both_ways() {
        let mut map = consistent();
        map.entry_points = vec!["Sub.process".into()];
        let report = map.verify();
        let flagged: Vec<_> = report
            .errors
            .iter()
            .filter(|e| e.code == PMAP_MAP_003_ENTRY_POINT_MISMATCH)
            .filter_map(|e| e.artifact.as_deref())
            .collect();
        assert_eq!(flagged, vec!["Main.process", "Sub.process"]);
    }

    #[test]
    fn test_unsorted_lists_are_warnings() {
        let mut map = consistent();
        map.artifacts.insert("Z.process".into(), entry(ArtifactKind::Process, &[]));
        map.entry_points = vec!["Z.process".into(), "Main.process".into()];
        let report = map.verify();
        assert!(report.passed());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].code, PMAP_MAP_004_UNSORTED_LIST);
    }
}
