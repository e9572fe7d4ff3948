// TraceSweep - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "TraceSweep";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "TraceSweep";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Pattern limits
// =============================================================================

/// Path separator used by patterns, rules, and canonical paths on every
/// platform. The filesystem abstraction translates it where needed.
pub const SEPARATOR: char = '/';

/// Maximum length of a search pattern or exclusion rule, in bytes.
pub const MAX_PATTERN_LENGTH: usize = 4_096;

/// Hard upper bound on the number of exclusion rules loaded from config.
pub const MAX_FILTER_RULES: usize = 10_000;

/// Hard upper bound on the number of user-defined checks.
pub const MAX_CUSTOM_CHECKS: usize = 100;

// =============================================================================
// Search defaults
// =============================================================================

/// Traversal root used when neither the CLI nor config names one.
pub const DEFAULT_ROOT: &str = "/";

/// Default run timeout in seconds. 0 disables the deadline.
pub const DEFAULT_TIMEOUT_SECS: u64 = 0;

/// Upper bound on the configurable timeout (one day).
pub const MAX_TIMEOUT_SECS: u64 = 86_400;

/// Result name used for patterns supplied directly on the command line.
pub const COMMAND_LINE_CHECK_NAME: &str = "command_line";

// =============================================================================
// Logging
// =============================================================================

/// Default log level when neither RUST_LOG, --debug, nor config sets one.
/// Reports go to stdout, so the default stays quiet on stderr.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Log levels accepted in `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// File names
// =============================================================================

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";
