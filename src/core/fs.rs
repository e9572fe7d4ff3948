// TraceSweep - core/fs.rs
//
// Read-only filesystem abstraction consumed by the finder.
// Implementations live in platform::fs (real disk, in-memory).
//
// Paths handed to a FileSystem are `/`-separated and relative to its root;
// the root itself is `""`. Implementations must never resolve a path
// outside their root.

use std::io;

/// A single entry returned by `FileSystem::read_dir` or `FileSystem::stat`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    name: String,
    is_dir: bool,
}

impl DirEntry {
    pub fn new(name: impl Into<String>, is_dir: bool) -> Self {
        Self {
            name: name.into(),
            is_dir,
        }
    }

    /// Entry name (last path segment, not the full path).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True for directories. Symlinks report false and are never traversed.
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }
}

/// Minimal read-only filesystem rooted at an opaque base.
pub trait FileSystem: Send + Sync {
    /// List the entries of the directory at `path`, sorted by name.
    ///
    /// A missing directory is reported as `io::ErrorKind::NotFound`.
    fn read_dir(&self, path: &str) -> io::Result<Vec<DirEntry>>;

    /// Look up a single entry. Returns `Ok(None)` when nothing exists at
    /// `path`; any other failure is an error.
    fn stat(&self, path: &str) -> io::Result<Option<DirEntry>>;

    /// Human-readable description of the root, used in logs and reports.
    fn describe(&self) -> String {
        "<filesystem>".to_string()
    }
}
