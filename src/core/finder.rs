// TraceSweep - core/finder.rs
//
// Pattern expansion over a FileSystem with exclusion filtering.
//
// Each pattern is walked one segment at a time: literal segments are looked
// up directly with `stat`, wildcard segments list their parent directory and
// match every entry name. Only non-directory entries matched by the final
// segment become results, and each one is checked against the shared Filter.
//
// Runs are all-or-nothing:
//   - every pattern is validated before any traversal starts;
//   - a filesystem failure (other than absence) aborts the run;
//   - the cancel token is polled at each directory boundary and before each
//     entry match, and a cancelled run returns no results.

use crate::core::cancel::CancelToken;
use crate::core::filter::Filter;
use crate::core::fs::{DirEntry, FileSystem};
use crate::core::model::FileInfo;
use crate::core::pattern::{canonical_path, join_relative, SearchPattern, Segment};
use crate::util::error::FindError;
use rayon::prelude::*;
use std::collections::HashSet;
use std::io;
use std::sync::Arc;

/// Discovers files matching glob patterns, minus anything the filter excludes.
///
/// A `Finder` holds handles to its filesystem and filter; it never snapshots
/// either. Runs take `&self`, so one finder may serve concurrent runs.
pub struct Finder {
    fs: Arc<dyn FileSystem>,
    filter: Arc<Filter>,
}

impl Finder {
    pub fn new(fs: Arc<dyn FileSystem>, filter: Arc<Filter>) -> Self {
        Self { fs, filter }
    }

    /// Description of the filesystem root, for logs and reports.
    pub fn root(&self) -> String {
        self.fs.describe()
    }

    /// Expand `patterns` and return every surviving match.
    ///
    /// Matches found by more than one pattern appear once. Result order
    /// follows pattern order then directory order, but callers that need a
    /// specific order should sort.
    pub fn run<S>(&self, cancel: &CancelToken, patterns: &[S]) -> Result<Vec<FileInfo>, FindError>
    where
        S: AsRef<str>,
    {
        cancel.check()?;

        let parsed = patterns
            .iter()
            .map(|p| SearchPattern::parse(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            root = %self.fs.describe(),
            patterns = parsed.len(),
            rules = self.filter.len(),
            "Find starting"
        );

        let per_pattern: Vec<Vec<FileInfo>> = if parsed.len() > 1 {
            parsed
                .par_iter()
                .map(|p| self.expand(cancel, p))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            parsed
                .iter()
                .map(|p| self.expand(cancel, p))
                .collect::<Result<Vec<_>, _>>()?
        };

        let mut seen: HashSet<String> = HashSet::new();
        let mut results = Vec::new();
        for info in per_pattern.into_iter().flatten() {
            if seen.insert(info.path().to_string()) {
                results.push(info);
            }
        }

        tracing::debug!(matches = results.len(), "Find complete");
        Ok(results)
    }

    fn expand(&self, cancel: &CancelToken, pattern: &SearchPattern) -> Result<Vec<FileInfo>, FindError> {
        let mut found = Vec::new();
        self.walk(cancel, pattern.segments(), "", &mut found)?;
        tracing::trace!(pattern = pattern.raw(), matches = found.len(), "Pattern expanded");
        Ok(found)
    }

    /// Match `segments[0]` inside `dir` and continue with the rest.
    fn walk(
        &self,
        cancel: &CancelToken,
        segments: &[Segment],
        dir: &str,
        found: &mut Vec<FileInfo>,
    ) -> Result<(), FindError> {
        cancel.check()?;

        let Some((segment, rest)) = segments.split_first() else {
            return Ok(());
        };

        match segment {
            Segment::Literal(name) => {
                let path = join_relative(dir, name);
                if let Some(entry) = self.stat(&path)? {
                    self.visit(cancel, rest, path, entry.is_dir(), found)?;
                }
            }
            Segment::Glob(_) => {
                let entries = self.list(dir)?;
                cancel.check()?;
                for entry in entries {
                    cancel.check()?;
                    if segment.matches(entry.name()) {
                        let path = join_relative(dir, entry.name());
                        self.visit(cancel, rest, path, entry.is_dir(), found)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Handle one matched entry: descend if segments remain, otherwise keep
    /// it as a result unless it is a directory or excluded.
    fn visit(
        &self,
        cancel: &CancelToken,
        rest: &[Segment],
        path: String,
        is_dir: bool,
        found: &mut Vec<FileInfo>,
    ) -> Result<(), FindError> {
        if !rest.is_empty() {
            if is_dir {
                self.walk(cancel, rest, &path, found)?;
            }
            return Ok(());
        }
        if is_dir {
            return Ok(());
        }

        let info = FileInfo::from_relative(&path);
        if self.filter.is_excluded(info.path()) {
            tracing::trace!(path = info.path(), "Excluded by rule");
        } else {
            found.push(info);
        }
        Ok(())
    }

    fn list(&self, dir: &str) -> Result<Vec<DirEntry>, FindError> {
        match self.fs.read_dir(dir) {
            Ok(entries) => Ok(entries),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::trace!(dir = %canonical_path(dir), "Directory absent");
                Ok(Vec::new())
            }
            Err(source) => Err(FindError::Filesystem {
                path: canonical_path(dir),
                source,
            }),
        }
    }

    fn stat(&self, path: &str) -> Result<Option<DirEntry>, FindError> {
        self.fs.stat(path).map_err(|source| FindError::Filesystem {
            path: canonical_path(path),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::fs::MemoryFs;
    use crate::util::error::{CancelCause, PatternError};
    use std::time::Duration;

    fn fixture_fs() -> MemoryFs {
        MemoryFs::new()
            .with_file("abs/file.log")
            .with_file("abs/sub/inner.log")
            .with_file("abs/match.txt")
    }

    fn fixture_finder() -> Finder {
        let filter = Filter::new();
        filter.add_rule("/abs/match.txt").unwrap();
        Finder::new(Arc::new(fixture_fs()), Arc::new(filter))
    }

    fn paths(results: &[FileInfo]) -> Vec<String> {
        let mut out: Vec<String> = results.iter().map(|r| r.path().to_string()).collect();
        out.sort();
        out
    }

    #[test]
    fn test_absolute_pattern() {
        let finder = fixture_finder();
        let res = finder.run(&CancelToken::new(), &["/abs/*.log"]).unwrap();
        assert_eq!(paths(&res), vec!["/abs/file.log"]);
    }

    #[test]
    fn test_relative_pattern() {
        let finder = fixture_finder();
        let res = finder.run(&CancelToken::new(), &["abs/sub/*.log"]).unwrap();
        assert_eq!(paths(&res), vec!["/abs/sub/inner.log"]);
    }

    #[test]
    fn test_filtered_path_yields_empty_result() {
        let finder = fixture_finder();
        let res = finder.run(&CancelToken::new(), &["/abs/match.txt"]).unwrap();
        assert!(res.is_empty());
    }

    #[test]
    fn test_filter_only_removes_excluded_path() {
        let finder = fixture_finder();
        let res = finder.run(&CancelToken::new(), &["/abs/*"]).unwrap();
        assert_eq!(paths(&res), vec!["/abs/file.log"]);
    }

    #[test]
    fn test_absolute_and_relative_match_sets_equal() {
        let finder = Finder::new(Arc::new(fixture_fs()), Arc::new(Filter::new()));
        let cancel = CancelToken::new();
        for pattern in ["abs/*", "abs/sub/inner.log", "abs/*/*.log", "abs/m?tch.txt"] {
            let relative = finder.run(&cancel, &[pattern]).unwrap();
            let absolute = finder.run(&cancel, &[format!("/{pattern}")]).unwrap();
            assert_eq!(paths(&relative), paths(&absolute), "pattern {pattern}");
        }
    }

    #[test]
    fn test_duplicates_across_patterns_collapse() {
        let finder = fixture_finder();
        let res = finder
            .run(
                &CancelToken::new(),
                &["/abs/*.log", "abs/file.log", "abs/f*"],
            )
            .unwrap();
        assert_eq!(paths(&res), vec!["/abs/file.log"]);
    }

    #[test]
    fn test_run_is_idempotent() {
        let finder = fixture_finder();
        let cancel = CancelToken::new();
        let patterns = ["/abs/*.log", "abs/*/*.log"];
        let first = finder.run(&cancel, &patterns).unwrap();
        let second = finder.run(&cancel, &patterns).unwrap();
        assert_eq!(paths(&first), paths(&second));
        assert_eq!(paths(&first), vec!["/abs/file.log", "/abs/sub/inner.log"]);
    }

    #[test]
    fn test_missing_segments_are_not_errors() {
        let finder = fixture_finder();
        let cancel = CancelToken::new();
        assert!(finder.run(&cancel, &["/nope/*.log"]).unwrap().is_empty());
        assert!(finder.run(&cancel, &["/abs/nope/x.log"]).unwrap().is_empty());
        assert!(finder.run(&cancel, &["/abs/*/missing/*"]).unwrap().is_empty());
    }

    #[test]
    fn test_file_used_as_directory_yields_nothing() {
        let finder = fixture_finder();
        let res = finder
            .run(&CancelToken::new(), &["/abs/file.log/*"])
            .unwrap();
        assert!(res.is_empty());
    }

    #[test]
    fn test_directories_are_not_reported() {
        let finder = fixture_finder();
        let res = finder.run(&CancelToken::new(), &["/abs/s*", "/abs"]).unwrap();
        assert!(res.is_empty(), "got {:?}", paths(&res));
    }

    #[test]
    fn test_empty_pattern_list() {
        let finder = fixture_finder();
        let patterns: [&str; 0] = [];
        let res = finder.run(&CancelToken::new(), &patterns).unwrap();
        assert!(res.is_empty());
    }

    #[test]
    fn test_invalid_pattern_aborts_run() {
        let finder = fixture_finder();
        let err = finder
            .run(&CancelToken::new(), &["/abs/*.log", "/abs/[oops"])
            .unwrap_err();
        assert!(
            matches!(err, FindError::InvalidPattern(PatternError::Syntax { .. })),
            "got {err:?}"
        );
    }

    #[test]
    fn test_filesystem_error_discards_partial_results() {
        let fs = fixture_fs()
            .with_file("locked/secret.log")
            .with_error("locked", io::ErrorKind::PermissionDenied);
        let finder = Finder::new(Arc::new(fs), Arc::new(Filter::new()));
        let err = finder
            .run(&CancelToken::new(), &["/abs/*.log", "/locked/*.log"])
            .unwrap_err();
        match err {
            FindError::Filesystem { path, source } => {
                assert_eq!(path, "/locked");
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("expected Filesystem error, got {other:?}"),
        }
    }

    #[test]
    fn test_stat_error_aborts_run() {
        let fs = fixture_fs().with_error("abs/match.txt", io::ErrorKind::Other);
        let finder = Finder::new(Arc::new(fs), Arc::new(Filter::new()));
        let err = finder
            .run(&CancelToken::new(), &["/abs/match.txt"])
            .unwrap_err();
        assert!(matches!(err, FindError::Filesystem { .. }));
    }

    #[test]
    fn test_cancelled_before_run() {
        let finder = fixture_finder();
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = finder.run(&cancel, &["/abs/*.log"]).unwrap_err();
        assert!(matches!(
            err,
            FindError::Cancelled {
                cause: CancelCause::Requested
            }
        ));
    }

    #[test]
    fn test_deadline_exceeded() {
        let finder = fixture_finder();
        let cancel = CancelToken::new().with_timeout(Duration::ZERO);
        let err = finder.run(&cancel, &["/abs/*.log"]).unwrap_err();
        assert!(matches!(
            err,
            FindError::Cancelled {
                cause: CancelCause::DeadlineExceeded
            }
        ));
    }

    /// Cancels its token the first time a directory is listed.
    struct CancellingFs {
        inner: MemoryFs,
        cancel: CancelToken,
    }

    impl FileSystem for CancellingFs {
        fn read_dir(&self, path: &str) -> io::Result<Vec<DirEntry>> {
            self.cancel.cancel();
            self.inner.read_dir(path)
        }

        fn stat(&self, path: &str) -> io::Result<Option<DirEntry>> {
            self.inner.stat(path)
        }
    }

    #[test]
    fn test_cancelled_mid_traversal_returns_no_results() {
        let cancel = CancelToken::new();
        let fs = CancellingFs {
            inner: fixture_fs(),
            cancel: cancel.clone(),
        };
        let finder = Finder::new(Arc::new(fs), Arc::new(Filter::new()));
        let err = finder.run(&cancel, &["/abs/*"]).unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_shared_filter_rule_added_between_runs() {
        let filter = Arc::new(Filter::new());
        let finder = Finder::new(Arc::new(fixture_fs()), Arc::clone(&filter));
        let cancel = CancelToken::new();

        let before = finder.run(&cancel, &["/abs/*.log"]).unwrap();
        assert_eq!(paths(&before), vec!["/abs/file.log"]);

        filter.add_rule("/abs/*.log").unwrap();
        let after = finder.run(&cancel, &["/abs/*.log"]).unwrap();
        assert!(after.is_empty());
    }
}
