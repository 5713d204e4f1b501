//! Version and build information for procmap
//!
//! Provides version string and build metadata (commit SHA, build date, rustc version).

/// Get the full version string including build metadata
///
/// Returns format: "procmap {version} ({commit} {date}) rustc {rustc_version}"
pub fn version() -> String {
    format!(
        "procmap {} ({} {}) rustc {}",
        package_version(),
        build_commit(),
        build_date(),
        rustc_version()
    )
}

/// Get the package version (e.g., "0.4.0")
pub fn package_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Build commit SHA, or "unknown" outside a git checkout
pub fn build_commit() -> &'static str {
    option_env!("PROCMAP_COMMIT_SHA").unwrap_or("unknown")
}

pub fn build_date() -> &'static str {
    option_env!("PROCMAP_BUILD_DATE").unwrap_or("unknown")
}

pub fn rustc_version() -> &'static str {
    option_env!("PROCMAP_RUSTC_VERSION").unwrap_or("unknown")
}
