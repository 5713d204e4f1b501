//! procmap diagnostic codes
//!
//! Codes follow the pattern: PMAP-{CATEGORY}-{3-digit number}
//!
//! Categories:
//! - IO: filesystem access (missing project, unreadable files)
//! - PARSE: artifact content could not be parsed
//! - REF: reference resolution (unresolved tokens, name collisions)
//! - MAP: persisted map structure (dangling edges, stale entry points)
//! - CFG: configuration and exclude patterns
//!
//! Each code is stable and should not be reused.

/// Source root missing or holds no project
pub const PMAP_IO_001_PROJECT_NOT_FOUND: &str = "PMAP-IO-001";

/// A file could not be read
pub const PMAP_IO_002_READ_FAILED: &str = "PMAP-IO-002";

/// Structured (markup) parse of an artifact failed
pub const PMAP_PARSE_001_MALFORMED_ARTIFACT: &str = "PMAP-PARSE-001";

/// Reference token had no match in the name index
pub const PMAP_REF_001_UNRESOLVED: &str = "PMAP-REF-001";

/// Two files share a base name; the later one shadows the earlier
pub const PMAP_REF_002_NAME_COLLISION: &str = "PMAP-REF-002";

/// Map document is malformed
pub const PMAP_MAP_001_INVALID_MAP: &str = "PMAP-MAP-001";

/// A dependency points at a path that is not an artifact
pub const PMAP_MAP_002_DANGLING_DEPENDENCY: &str = "PMAP-MAP-002";

/// Stored entry points disagree with the dependency edges
pub const PMAP_MAP_003_ENTRY_POINT_MISMATCH: &str = "PMAP-MAP-003";

/// Dependency or variable-group list is not sorted and unique
pub const PMAP_MAP_004_UNSORTED_LIST: &str = "PMAP-MAP-004";

/// Configuration or exclude pattern rejected
pub const PMAP_CFG_001_INVALID_CONFIG: &str = "PMAP-CFG-001";

/// Error code documentation
///
/// | Code | Description | Remediation |
/// |------|-------------|-------------|
/// | PMAP-IO-001 | Project not found | Check `--root`; it must hold artifacts or a project folder |
/// | PMAP-IO-002 | Read failed | Check file permissions |
/// | PMAP-PARSE-001 | Malformed artifact | Artifact kept without references; fix the XML or use `--fallback` |
/// | PMAP-REF-001 | Unresolved reference | Target missing from the project tree |
/// | PMAP-REF-002 | Name collision | Rename one file; resolution keeps the last in sorted order |
/// | PMAP-MAP-001 | Invalid map | Re-run `procmap map` |
/// | PMAP-MAP-002 | Dangling dependency | Re-run `procmap map`; the file was edited by hand |
/// | PMAP-MAP-003 | Entry point mismatch | Re-run `procmap map` |
/// | PMAP-MAP-004 | Unsorted list | Re-run `procmap map` |
/// | PMAP-CFG-001 | Invalid configuration | Check the config file and `--exclude` globs |
pub const ERROR_CODE_DOCUMENTATION: &str = "See error_codes.rs for full documentation";
