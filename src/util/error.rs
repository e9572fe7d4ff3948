// TraceSweep - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; every variant keeps its cause so the
// full chain is available for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all TraceSweep operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum TraceSweepError {
    /// A search pattern or exclusion rule was rejected.
    Pattern(PatternError),

    /// A find run was aborted.
    Find(FindError),

    /// The traversal root could not be opened.
    Root(RootError),

    /// Check registration or selection failed.
    Check(CheckError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// Report export failed.
    Export(ExportError),
}

impl fmt::Display for TraceSweepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(e) => write!(f, "Pattern error: {e}"),
            Self::Find(e) => write!(f, "Find error: {e}"),
            Self::Root(e) => write!(f, "Root error: {e}"),
            Self::Check(e) => write!(f, "Check error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
        }
    }
}

impl std::error::Error for TraceSweepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Pattern(e) => Some(e),
            Self::Find(e) => Some(e),
            Self::Root(e) => Some(e),
            Self::Check(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Export(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Pattern errors
// ---------------------------------------------------------------------------

/// A glob pattern (search pattern or exclusion rule) failed validation.
#[derive(Debug)]
pub enum PatternError {
    /// The glob grammar rejected the pattern (e.g. an unclosed `[`).
    Syntax {
        pattern: String,
        source: glob::PatternError,
    },

    /// A `.` or `..` segment would address something outside the root.
    EscapesRoot { pattern: String },

    /// The pattern exceeds the maximum allowed length.
    TooLong { length: usize, max: usize },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax { pattern, source } => {
                write!(f, "Invalid glob pattern '{pattern}': {source}")
            }
            Self::EscapesRoot { pattern } => write!(
                f,
                "Invalid glob pattern '{pattern}': '.' and '..' segments are not allowed"
            ),
            Self::TooLong { length, max } => write!(
                f,
                "Pattern is {length} bytes, exceeds maximum of {max} bytes"
            ),
        }
    }
}

impl std::error::Error for PatternError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Syntax { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<PatternError> for TraceSweepError {
    fn from(e: PatternError) -> Self {
        Self::Pattern(e)
    }
}

// ---------------------------------------------------------------------------
// Find errors
// ---------------------------------------------------------------------------

/// Why a run stopped before completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelCause {
    /// `CancelToken::cancel` was called.
    Requested,
    /// The token's deadline passed.
    DeadlineExceeded,
}

impl fmt::Display for CancelCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Requested => f.write_str("cancelled"),
            Self::DeadlineExceeded => f.write_str("deadline exceeded"),
        }
    }
}

/// Errors that abort a `Finder::run`. Partial results are always discarded.
#[derive(Debug)]
pub enum FindError {
    /// One of the search patterns is malformed.
    InvalidPattern(PatternError),

    /// Listing or inspecting a path failed for a reason other than absence.
    Filesystem { path: String, source: io::Error },

    /// The run was cancelled or ran past its deadline.
    Cancelled { cause: CancelCause },
}

impl FindError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

impl fmt::Display for FindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPattern(e) => write!(f, "{e}"),
            Self::Filesystem { path, source } => {
                write!(f, "Cannot read '{path}': {source}")
            }
            Self::Cancelled { cause } => write!(f, "Search stopped: {cause}"),
        }
    }
}

impl std::error::Error for FindError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidPattern(e) => Some(e),
            Self::Filesystem { source, .. } => Some(source),
            Self::Cancelled { .. } => None,
        }
    }
}

impl From<PatternError> for FindError {
    fn from(e: PatternError) -> Self {
        Self::InvalidPattern(e)
    }
}

impl From<FindError> for TraceSweepError {
    fn from(e: FindError) -> Self {
        Self::Find(e)
    }
}

// ---------------------------------------------------------------------------
// Root errors
// ---------------------------------------------------------------------------

/// Errors opening the directory a `DiskFs` is rooted at.
#[derive(Debug)]
pub enum RootError {
    /// The root path does not exist.
    NotFound { path: PathBuf },

    /// The root path is not a directory.
    NotADirectory { path: PathBuf },

    /// Permission denied accessing the root path.
    PermissionDenied { path: PathBuf, source: io::Error },

    /// Any other failure reading root metadata.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for RootError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => {
                write!(f, "Root '{}' does not exist", path.display())
            }
            Self::NotADirectory { path } => {
                write!(f, "Root '{}' is not a directory", path.display())
            }
            Self::PermissionDenied { path, source } => {
                write!(
                    f,
                    "Permission denied accessing '{}': {source}",
                    path.display()
                )
            }
            Self::Io { path, source } => {
                write!(f, "Cannot open root '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for RootError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::PermissionDenied { source, .. } | Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<RootError> for TraceSweepError {
    fn from(e: RootError) -> Self {
        Self::Root(e)
    }
}

// ---------------------------------------------------------------------------
// Check errors
// ---------------------------------------------------------------------------

/// Errors related to the check registry.
#[derive(Debug)]
pub enum CheckError {
    /// A check with this name is already registered.
    DuplicateName { name: String },

    /// No check with this name is registered.
    UnknownName { name: String, available: Vec<String> },
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName { name } => {
                write!(f, "A check named '{name}' is already registered")
            }
            Self::UnknownName { name, available } => write!(
                f,
                "Unknown check '{name}'. Available checks: {}",
                available.join(", ")
            ),
        }
    }
}

impl std::error::Error for CheckError {}

impl From<CheckError> for TraceSweepError {
    fn from(e: CheckError) -> Self {
        Self::Check(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for TraceSweepError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to report export.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the report.
    Io { source: io::Error },

    /// CSV serialisation error.
    Csv { source: csv::Error },

    /// JSON serialisation error.
    Json { source: serde_json::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { source } => write!(f, "Report I/O error: {source}"),
            Self::Csv { source } => write!(f, "CSV report error: {source}"),
            Self::Json { source } => write!(f, "JSON report error: {source}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source } => Some(source),
            Self::Csv { source } => Some(source),
            Self::Json { source } => Some(source),
        }
    }
}

impl From<ExportError> for TraceSweepError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

/// Convenience type alias for TraceSweep results.
pub type Result<T> = std::result::Result<T, TraceSweepError>;
