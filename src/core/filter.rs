// TraceSweep - core/filter.rs
//
// Exclusion rule engine. A path is excluded when any registered rule matches
// it exactly or by glob, using the same per-segment grammar as the finder.
// Core layer: pure logic, no I/O.

use crate::core::pattern::{canonical_path, SearchPattern};
use crate::util::error::PatternError;
use std::sync::{PoisonError, RwLock};

/// One registered exclusion rule.
#[derive(Debug, Clone)]
struct Rule {
    /// Canonical form, used for exact matches and reporting.
    canonical: String,
    pattern: SearchPattern,
}

impl Rule {
    fn matches(&self, canonical: &str) -> bool {
        self.canonical == canonical || self.pattern.matches_path(canonical)
    }
}

/// A growable set of exclusion rules shared by every finder that uses it.
///
/// Rules are only ever appended. Queries take a read lock, so any number of
/// concurrent runs may share one `Filter`; `add_rule` takes the write lock.
/// Register rules before starting runs: a rule added during a run may or may
/// not apply to paths that run has not reached yet.
#[derive(Debug, Default)]
pub struct Filter {
    rules: RwLock<Vec<Rule>>,
}

impl Filter {
    /// Create an empty filter (excludes nothing).
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an exclusion rule.
    ///
    /// The pattern is validated with the finder's grammar and normalised, so
    /// `abs/match.txt` and `/abs/match.txt` register the same rule.
    pub fn add_rule(&self, pattern: &str) -> Result<(), PatternError> {
        let parsed = SearchPattern::parse(pattern)?;
        let rule = Rule {
            canonical: parsed.canonical(),
            pattern: parsed,
        };
        tracing::debug!(rule = %rule.canonical, "Exclusion rule registered");
        self.rules
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(rule);
        Ok(())
    }

    /// Register several rules, stopping at the first invalid one.
    pub fn add_rules<I, S>(&self, patterns: I) -> Result<(), PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            self.add_rule(pattern.as_ref())?;
        }
        Ok(())
    }

    /// True if `path` matches any registered rule. `path` may be given with
    /// or without its leading separator.
    pub fn is_excluded(&self, path: &str) -> bool {
        let rules = self.rules.read().unwrap_or_else(PoisonError::into_inner);
        if rules.is_empty() {
            return false;
        }
        let canonical = canonical_path(path);
        rules.iter().any(|r| r.matches(&canonical))
    }

    pub fn len(&self) -> usize {
        self.rules.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Canonical form of every registered rule, in registration order.
    pub fn rules(&self) -> Vec<String> {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|r| r.canonical.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_empty_filter_excludes_nothing() {
        let filter = Filter::new();
        assert!(filter.is_empty());
        assert!(!filter.is_excluded("/abs/match.txt"));
    }

    #[test]
    fn test_exact_rule() {
        let filter = Filter::new();
        filter.add_rule("/abs/match.txt").unwrap();
        assert!(filter.is_excluded("/abs/match.txt"));
        assert!(!filter.is_excluded("/abs/file.log"));
        assert!(!filter.is_excluded("/abs/match.txt.bak"));
    }

    #[test]
    fn test_relative_rule_matches_canonical_path() {
        let filter = Filter::new();
        filter.add_rule("abs/match.txt").unwrap();
        assert!(filter.is_excluded("/abs/match.txt"));
        assert!(filter.is_excluded("abs/match.txt"));
        assert_eq!(filter.rules(), vec!["/abs/match.txt".to_string()]);
    }

    #[test]
    fn test_glob_rule() {
        let filter = Filter::new();
        filter.add_rule("/var/log/*.gz").unwrap();
        assert!(filter.is_excluded("/var/log/syslog.1.gz"));
        assert!(!filter.is_excluded("/var/log/nginx/access.log.gz"));
        assert!(!filter.is_excluded("/var/log/syslog"));
    }

    #[test]
    fn test_literal_path_with_brackets_matches_exactly() {
        let filter = Filter::new();
        filter.add_rule("/data/[x].log").unwrap();
        // `[x]` is a class matching "x", but the literal name also matches.
        assert!(filter.is_excluded("/data/[x].log"));
        assert!(filter.is_excluded("/data/x.log"));
    }

    #[test]
    fn test_invalid_rule_fails_at_registration() {
        let filter = Filter::new();
        let err = filter.add_rule("/var/log/[oops").unwrap_err();
        assert!(matches!(err, PatternError::Syntax { .. }));
        assert!(filter.is_empty(), "a rejected rule must not be stored");
    }

    #[test]
    fn test_add_rules_stops_at_first_error() {
        let filter = Filter::new();
        let result = filter.add_rules(["/a.log", "/b/../c", "/d.log"]);
        assert!(result.is_err());
        assert_eq!(filter.len(), 1);
    }

    #[test]
    fn test_concurrent_queries() {
        let filter = Arc::new(Filter::new());
        filter.add_rule("/tmp/*.log").unwrap();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let filter = Arc::clone(&filter);
                std::thread::spawn(move || filter.is_excluded(&format!("/tmp/{i}.log")))
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
