// TraceSweep - platform/fs.rs
//
// FileSystem implementations.
//   - DiskFs: a real directory tree, listed through walkdir one level at a
//     time without following symlinks.
//   - MemoryFs: an in-memory tree with fault injection, so core logic can be
//     tested without touching the real filesystem.

use crate::core::fs::{DirEntry, FileSystem};
use crate::util::constants::SEPARATOR;
use crate::util::error::RootError;
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::PathBuf;

// =============================================================================
// DiskFs
// =============================================================================

/// A directory on disk acting as the traversal root.
#[derive(Debug, Clone)]
pub struct DiskFs {
    root: PathBuf,
}

impl DiskFs {
    /// Open `root`, verifying that it exists and is a directory.
    ///
    /// Uses `fs::metadata()` rather than `Path::is_dir()` because the latter
    /// maps every error, PermissionDenied included, to `false`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, RootError> {
        let root = root.into();
        match std::fs::metadata(&root) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(RootError::NotADirectory { path: root }),
            Err(e) => {
                return Err(match e.kind() {
                    io::ErrorKind::NotFound => RootError::NotFound { path: root },
                    io::ErrorKind::PermissionDenied => RootError::PermissionDenied {
                        path: root,
                        source: e,
                    },
                    _ => RootError::Io {
                        path: root,
                        source: e,
                    },
                });
            }
        }
        tracing::debug!(root = %root.display(), "Disk root opened");
        Ok(Self { root })
    }

    /// Map a `/`-separated root-relative path onto the host path.
    fn resolve(&self, relative: &str) -> PathBuf {
        let mut path = self.root.clone();
        for segment in relative.split(SEPARATOR).filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path
    }
}

impl FileSystem for DiskFs {
    fn read_dir(&self, path: &str) -> io::Result<Vec<DirEntry>> {
        let dir = self.resolve(path);
        let walker = walkdir::WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        let mut entries = Vec::new();
        for item in walker {
            let item = item.map_err(io::Error::from)?;
            match item.file_name().to_str() {
                Some(name) => entries.push(DirEntry::new(name, item.file_type().is_dir())),
                None => {
                    tracing::debug!(
                        path = %item.path().display(),
                        "Skipping entry with non-UTF-8 name"
                    );
                }
            }
        }
        Ok(entries)
    }

    fn stat(&self, path: &str) -> io::Result<Option<DirEntry>> {
        let name = path.rsplit(SEPARATOR).next().unwrap_or(path);
        match std::fs::symlink_metadata(self.resolve(path)) {
            Ok(meta) => Ok(Some(DirEntry::new(name, meta.is_dir()))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

// =============================================================================
// MemoryFs
// =============================================================================

/// An in-memory directory tree.
///
/// Parent directories are created implicitly. `with_error` makes every
/// `read_dir` and `stat` on one path fail with the given kind.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    /// Root-relative path -> is_dir. The root itself is implicit.
    entries: BTreeMap<String, bool>,
    errors: HashMap<String, io::ErrorKind>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, creating any missing parent directories.
    pub fn with_file(mut self, path: &str) -> Self {
        let path = normalize(path);
        self.add_parents(&path);
        self.entries.insert(path, false);
        self
    }

    /// Add an (empty) directory and its parents.
    pub fn with_dir(mut self, path: &str) -> Self {
        let path = normalize(path);
        self.add_parents(&path);
        if !path.is_empty() {
            self.entries.insert(path, true);
        }
        self
    }

    /// Make every access to `path` fail with `kind`.
    pub fn with_error(mut self, path: &str, kind: io::ErrorKind) -> Self {
        self.errors.insert(normalize(path), kind);
        self
    }

    fn add_parents(&mut self, path: &str) {
        let mut end = 0;
        while let Some(offset) = path[end..].find(SEPARATOR) {
            end += offset;
            self.entries.insert(path[..end].to_string(), true);
            end += 1;
        }
    }

    fn injected(&self, path: &str) -> io::Result<()> {
        match self.errors.get(path) {
            Some(kind) => Err(io::Error::new(
                *kind,
                format!("injected failure at '{path}'"),
            )),
            None => Ok(()),
        }
    }
}

fn normalize(path: &str) -> String {
    path.split(SEPARATOR)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

impl FileSystem for MemoryFs {
    fn read_dir(&self, path: &str) -> io::Result<Vec<DirEntry>> {
        let path = normalize(path);
        self.injected(&path)?;

        if !path.is_empty() {
            match self.entries.get(&path) {
                Some(true) => {}
                Some(false) => {
                    return Err(io::Error::new(
                        io::ErrorKind::Other,
                        format!("'{path}' is not a directory"),
                    ));
                }
                None => {
                    return Err(io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("'{path}' does not exist"),
                    ));
                }
            }
        }

        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{path}/")
        };
        Ok(self
            .entries
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter_map(|(key, is_dir)| {
                let name = &key[prefix.len()..];
                (!name.contains(SEPARATOR)).then(|| DirEntry::new(name, *is_dir))
            })
            .collect())
    }

    fn stat(&self, path: &str) -> io::Result<Option<DirEntry>> {
        let path = normalize(path);
        self.injected(&path)?;

        if path.is_empty() {
            return Ok(Some(DirEntry::new("", true)));
        }
        let name = path.rsplit(SEPARATOR).next().unwrap_or(&path);
        Ok(self
            .entries
            .get(&path)
            .map(|is_dir| DirEntry::new(name, *is_dir)))
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}
