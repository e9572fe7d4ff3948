// TraceSweep - core/check.rs
//
// Checks: named groups of patterns, one per category of artefact.
//
// A check only describes where to look; the finder does the looking. New
// categories are added by registering another `Check` implementation with the
// `CheckRegistry`, either a built-in table or a user-defined one from config.

use crate::util::error::CheckError;
use std::fmt;

/// A named category of discoverable artefacts.
pub trait Check: Send + Sync {
    /// Unique identifier, e.g. `shell_history`.
    fn name(&self) -> &str;

    /// Patterns locating this check's files, relative to the traversal root.
    fn paths(&self) -> Vec<String>;

    /// One-line description for `--list-checks`.
    fn description(&self) -> &str {
        ""
    }
}

impl fmt::Debug for dyn Check + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check").field("name", &self.name()).finish()
    }
}

// =============================================================================
// Built-in checks
// =============================================================================

/// A check backed by a static pattern table.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinCheck {
    name: &'static str,
    description: &'static str,
    patterns: &'static [&'static str],
}

impl Check for BuiltinCheck {
    fn name(&self) -> &str {
        self.name
    }

    fn paths(&self) -> Vec<String> {
        self.patterns.iter().map(|p| (*p).to_string()).collect()
    }

    fn description(&self) -> &str {
        self.description
    }
}

/// Interactive shell and REPL history files.
pub const SHELL_HISTORY: BuiltinCheck = BuiltinCheck {
    name: "shell_history",
    description: "Shell and REPL history files",
    patterns: &[
        "/root/.bash_history",
        "/root/.zsh_history",
        "/root/.sh_history",
        "/root/.ash_history",
        "/root/.python_history",
        "/root/.node_repl_history",
        "/root/.mysql_history",
        "/root/.psql_history",
        "/root/.sqlite_history",
        "/root/.lesshst",
        "/root/.viminfo",
        "/root/.local/share/fish/fish_history",
        "/home/*/.bash_history",
        "/home/*/.zsh_history",
        "/home/*/.sh_history",
        "/home/*/.ash_history",
        "/home/*/.python_history",
        "/home/*/.node_repl_history",
        "/home/*/.mysql_history",
        "/home/*/.psql_history",
        "/home/*/.sqlite_history",
        "/home/*/.lesshst",
        "/home/*/.viminfo",
        "/home/*/.local/share/fish/fish_history",
    ],
};

/// General system logs under /var/log.
pub const SYSTEM_LOGS: BuiltinCheck = BuiltinCheck {
    name: "system_logs",
    description: "System daemon and kernel logs",
    patterns: &[
        "/var/log/*.log",
        "/var/log/*.log.[0-9]*",
        "/var/log/syslog*",
        "/var/log/messages*",
        "/var/log/secure*",
        "/var/log/kern.log*",
        "/var/log/daemon.log*",
        "/var/log/debug*",
        "/var/log/journal/*/*.journal",
    ],
};

/// Binary login accounting records.
pub const LOGIN_RECORDS: BuiltinCheck = BuiltinCheck {
    name: "login_records",
    description: "Login accounting records (wtmp, btmp, lastlog, utmp)",
    patterns: &[
        "/var/log/wtmp*",
        "/var/log/btmp*",
        "/var/log/lastlog",
        "/var/log/faillog",
        "/var/run/utmp",
        "/run/utmp",
    ],
};

/// Access and error logs of common web servers.
pub const WEB_SERVER_LOGS: BuiltinCheck = BuiltinCheck {
    name: "web_server_logs",
    description: "Apache, httpd and nginx access/error logs",
    patterns: &[
        "/var/log/apache2/*.log*",
        "/var/log/httpd/*_log*",
        "/var/log/nginx/*.log*",
        "/var/log/lighttpd/*.log*",
    ],
};

/// Kernel audit subsystem logs.
pub const AUDIT_LOGS: BuiltinCheck = BuiltinCheck {
    name: "audit_logs",
    description: "Linux audit daemon logs",
    patterns: &["/var/log/audit/audit.log*"],
};

/// Every built-in check, in registry order.
pub const BUILTIN_CHECKS: &[BuiltinCheck] = &[
    SHELL_HISTORY,
    SYSTEM_LOGS,
    LOGIN_RECORDS,
    WEB_SERVER_LOGS,
    AUDIT_LOGS,
];

// =============================================================================
// User-defined checks
// =============================================================================

/// A check defined at runtime, e.g. from `[[checks.custom]]` in config.toml.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomCheck {
    name: String,
    description: String,
    patterns: Vec<String>,
}

impl CustomCheck {
    pub fn new(name: impl Into<String>, description: impl Into<String>, patterns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            patterns,
        }
    }
}

impl Check for CustomCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn paths(&self) -> Vec<String> {
        self.patterns.clone()
    }

    fn description(&self) -> &str {
        &self.description
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Checks keyed by unique name, kept in registration order.
#[derive(Debug, Default)]
pub struct CheckRegistry {
    checks: Vec<Box<dyn Check>>,
}

impl CheckRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in check.
    pub fn builtin() -> Self {
        Self {
            checks: BUILTIN_CHECKS
                .iter()
                .map(|c| Box::new(*c) as Box<dyn Check>)
                .collect(),
        }
    }

    /// Add a check. Names must be unique.
    pub fn register(&mut self, check: Box<dyn Check>) -> Result<(), CheckError> {
        if self.get(check.name()).is_some() {
            return Err(CheckError::DuplicateName {
                name: check.name().to_string(),
            });
        }
        tracing::debug!(check = check.name(), "Check registered");
        self.checks.push(check);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn Check> {
        self.checks
            .iter()
            .find(|c| c.name() == name)
            .map(|c| &**c)
    }

    pub fn names(&self) -> Vec<String> {
        self.checks.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Check> {
        self.checks.iter().map(|c| &**c)
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Resolve `names` to checks, in registry order. An empty selection
    /// means every check.
    pub fn select(&self, names: &[String]) -> Result<Vec<&dyn Check>, CheckError> {
        if names.is_empty() {
            return Ok(self.iter().collect());
        }
        if let Some(unknown) = names.iter().find(|n| self.get(n).is_none()) {
            return Err(CheckError::UnknownName {
                name: unknown.clone(),
                available: self.names(),
            });
        }
        Ok(self
            .iter()
            .filter(|c| names.iter().any(|n| n == c.name()))
            .collect())
    }
}
