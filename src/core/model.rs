// TraceSweep - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies. These types are the shared vocabulary across
// all layers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

// =============================================================================
// Discovered file
// =============================================================================

/// One file discovered by the finder.
///
/// The path is canonical: relative to the traversal root and always rendered
/// with a leading `/`, whether the pattern that found it had one or not.
/// Instances are produced by `Finder::run` and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FileInfo {
    path: String,
}

impl FileInfo {
    /// Build from a root-relative path (`abs/file.log`).
    pub(crate) fn from_relative(relative: &str) -> Self {
        Self {
            path: super::pattern::canonical_path(relative),
        }
    }

    /// Canonical path with a leading separator, e.g. `/abs/file.log`.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for FileInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

// =============================================================================
// Scan report
// =============================================================================

/// Files found for one check (or for the ad-hoc command-line patterns).
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    /// Check name, e.g. `system_logs`.
    pub name: String,

    /// Surviving matches, sorted by path.
    pub files: Vec<FileInfo>,
}

/// Outcome of a complete scan across all selected checks.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Display form of the traversal root.
    pub root: String,

    /// When the scan finished.
    pub generated_at: DateTime<Utc>,

    /// Per-check results in registry order.
    pub checks: Vec<CheckResult>,

    /// Sum of `files.len()` across all checks.
    pub total_files: usize,
}

impl ScanReport {
    /// Assemble a report, computing `total_files`.
    pub fn new(root: impl Into<String>, checks: Vec<CheckResult>) -> Self {
        let total_files = checks.iter().map(|c| c.files.len()).sum();
        Self {
            root: root.into(),
            generated_at: Utc::now(),
            checks,
            total_files,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_files == 0
    }
}
