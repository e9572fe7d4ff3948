// TraceSweep - app/scan.rs
//
// Scan orchestration: build the shared filter and check registry from
// config and CLI input, run the finder once per selected check, and
// assemble a ScanReport.
//
// A scan is all-or-nothing like the runs it is made of: the first failing
// check (bad pattern, filesystem error, cancellation) aborts the scan.

use crate::core::cancel::CancelToken;
use crate::core::check::{Check, CheckRegistry, CustomCheck};
use crate::core::filter::Filter;
use crate::core::finder::Finder;
use crate::core::model::{CheckResult, ScanReport};
use crate::util::constants;
use crate::util::error::{CheckError, PatternError, Result};
use std::sync::Arc;

/// What to scan for.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Check names to run. Empty means every registered check, unless
    /// `extra_patterns` is set, in which case only those patterns run.
    pub checks: Vec<String>,

    /// Ad-hoc patterns, reported under `command_line`.
    pub extra_patterns: Vec<String>,

    /// Cancellation and deadline for the whole scan.
    pub cancel: CancelToken,
}

/// Register every rule in order; the first malformed rule is returned.
pub fn build_filter<I, S>(rules: I) -> std::result::Result<Arc<Filter>, PatternError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let filter = Filter::new();
    filter.add_rules(rules)?;
    tracing::debug!(rules = filter.len(), "Filter built");
    Ok(Arc::new(filter))
}

/// Built-in checks plus user-defined ones. A custom check may not reuse a
/// built-in name.
pub fn build_registry(custom: &[CustomCheck]) -> std::result::Result<CheckRegistry, CheckError> {
    let mut registry = CheckRegistry::builtin();
    for check in custom {
        registry.register(Box::new(check.clone()))?;
    }
    tracing::debug!(checks = registry.len(), "Check registry built");
    Ok(registry)
}

/// Run every selected check and the ad-hoc patterns.
pub fn run_scan(finder: &Finder, registry: &CheckRegistry, options: &ScanOptions) -> Result<ScanReport> {
    let selected: Vec<&dyn Check> = if options.checks.is_empty() && !options.extra_patterns.is_empty() {
        Vec::new()
    } else {
        registry.select(&options.checks)?
    };

    tracing::info!(
        root = %finder.root(),
        checks = selected.len(),
        extra_patterns = options.extra_patterns.len(),
        "Scan starting"
    );

    let mut results = Vec::with_capacity(selected.len() + 1);
    for check in selected {
        options.cancel.check()?;
        let patterns = check.paths();
        let mut files = finder.run(&options.cancel, &patterns)?;
        files.sort();
        tracing::info!(check = check.name(), files = files.len(), "Check complete");
        results.push(CheckResult {
            name: check.name().to_string(),
            files,
        });
    }

    if !options.extra_patterns.is_empty() {
        let mut files = finder.run(&options.cancel, &options.extra_patterns)?;
        files.sort();
        tracing::info!(files = files.len(), "Command-line patterns complete");
        results.push(CheckResult {
            name: constants::COMMAND_LINE_CHECK_NAME.to_string(),
            files,
        });
    }

    let report = ScanReport::new(finder.root(), results);
    tracing::info!(total_files = report.total_files, "Scan complete");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::fs::MemoryFs;
    use crate::util::error::{FindError, TraceSweepError};

    fn system_fs() -> MemoryFs {
        MemoryFs::new()
            .with_file("var/log/syslog")
            .with_file("var/log/syslog.1.gz")
            .with_file("var/log/auth.log")
            .with_file("var/log/wtmp")
            .with_file("var/log/nginx/access.log")
            .with_file("root/.bash_history")
            .with_file("home/alice/.zsh_history")
            .with_file("opt/app/app.log")
    }

    fn finder_with(rules: &[&str]) -> Finder {
        Finder::new(Arc::new(system_fs()), build_filter(rules).unwrap())
    }

    fn names(report: &ScanReport, check: &str) -> Vec<String> {
        report
            .checks
            .iter()
            .find(|c| c.name == check)
            .map(|c| c.files.iter().map(|f| f.path().to_string()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_all_checks_by_default() {
        let finder = finder_with(&[]);
        let registry = build_registry(&[]).unwrap();
        let report = run_scan(&finder, &registry, &ScanOptions::default()).unwrap();

        assert_eq!(report.checks.len(), registry.len());
        assert_eq!(
            names(&report, "shell_history"),
            vec!["/home/alice/.zsh_history", "/root/.bash_history"]
        );
        assert_eq!(
            names(&report, "system_logs"),
            vec!["/var/log/auth.log", "/var/log/syslog", "/var/log/syslog.1.gz"]
        );
        assert_eq!(names(&report, "login_records"), vec!["/var/log/wtmp"]);
        assert_eq!(
            names(&report, "web_server_logs"),
            vec!["/var/log/nginx/access.log"]
        );
        assert!(names(&report, "audit_logs").is_empty());
    }

    #[test]
    fn test_filter_rules_apply_to_every_check() {
        let finder = finder_with(&["/var/log/*.gz", "root/.bash_history"]);
        let registry = build_registry(&[]).unwrap();
        let report = run_scan(&finder, &registry, &ScanOptions::default()).unwrap();

        assert_eq!(
            names(&report, "system_logs"),
            vec!["/var/log/auth.log", "/var/log/syslog"]
        );
        assert_eq!(
            names(&report, "shell_history"),
            vec!["/home/alice/.zsh_history"]
        );
    }

    #[test]
    fn test_selected_checks_and_custom() {
        let finder = finder_with(&[]);
        let custom = CustomCheck::new("app", "", vec!["opt/app/*.log".to_string()]);
        let registry = build_registry(&[custom]).unwrap();
        let options = ScanOptions {
            checks: vec!["app".to_string()],
            ..Default::default()
        };
        let report = run_scan(&finder, &registry, &options).unwrap();
        assert_eq!(report.checks.len(), 1);
        assert_eq!(names(&report, "app"), vec!["/opt/app/app.log"]);
        assert_eq!(report.total_files, 1);
    }

    #[test]
    fn test_extra_patterns_only() {
        let finder = finder_with(&[]);
        let registry = build_registry(&[]).unwrap();
        let options = ScanOptions {
            extra_patterns: vec!["/opt/*/*.log".to_string()],
            ..Default::default()
        };
        let report = run_scan(&finder, &registry, &options).unwrap();
        assert_eq!(report.checks.len(), 1);
        assert_eq!(
            names(&report, constants::COMMAND_LINE_CHECK_NAME),
            vec!["/opt/app/app.log"]
        );
    }

    #[test]
    fn test_custom_check_cannot_shadow_builtin() {
        let custom = CustomCheck::new("system_logs", "", vec!["/x".to_string()]);
        assert!(matches!(
            build_registry(&[custom]),
            Err(CheckError::DuplicateName { .. })
        ));
    }

    #[test]
    fn test_bad_filter_rule_is_reported() {
        assert!(build_filter(["/ok/*.log", "/bad/[x"]).is_err());
    }

    #[test]
    fn test_unknown_check_fails_scan() {
        let finder = finder_with(&[]);
        let registry = build_registry(&[]).unwrap();
        let options = ScanOptions {
            checks: vec!["nope".to_string()],
            ..Default::default()
        };
        let err = run_scan(&finder, &registry, &options).unwrap_err();
        assert!(matches!(err, TraceSweepError::Check(_)));
    }

    #[test]
    fn test_cancelled_scan_returns_error() {
        let finder = finder_with(&[]);
        let registry = build_registry(&[]).unwrap();
        let options = ScanOptions::default();
        options.cancel.cancel();
        let err = run_scan(&finder, &registry, &options).unwrap_err();
        assert!(matches!(
            err,
            TraceSweepError::Find(FindError::Cancelled { .. })
        ));
    }
}
