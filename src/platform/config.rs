// TraceSweep - platform/config.rs
//
// Platform-specific config directory resolution and config.toml loading
// with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::check::CustomCheck;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for TraceSweep configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/tracesweep/ or %APPDATA%\TraceSweep\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[search]` section.
    pub search: SearchSection,
    /// `[filter]` section.
    pub filter: FilterSection,
    /// `[checks]` section.
    pub checks: ChecksSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[search]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct SearchSection {
    /// Directory all patterns are resolved against.
    pub root: Option<String>,
    /// Run deadline in seconds (0 = none).
    pub timeout_secs: Option<u64>,
}

/// `[filter]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct FilterSection {
    /// Exclusion rules, same grammar as search patterns.
    pub rules: Option<Vec<String>>,
}

/// `[checks]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ChecksSection {
    /// Checks to run by default (empty = all).
    pub enabled: Option<Vec<String>>,
    /// `[[checks.custom]]` tables.
    pub custom: Option<Vec<CustomCheckSection>>,
}

/// One `[[checks.custom]]` table.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct CustomCheckSection {
    pub name: String,
    pub description: Option<String>,
    pub paths: Vec<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// All values are validated against named constants at load time.
/// Invalid values produce actionable warnings and fall back to defaults.
/// Filter rules are passed through as written; their syntax is checked when
/// they are registered, so a bad rule stops the run instead of vanishing.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Search --
    /// Traversal root.
    pub root: PathBuf,
    /// Run deadline in seconds; 0 disables it.
    pub timeout_secs: u64,

    // -- Filter --
    /// Exclusion rules to register before the first run.
    pub filter_rules: Vec<String>,

    // -- Checks --
    /// Checks selected when the CLI names none (empty = all).
    pub enabled_checks: Vec<String>,
    /// User-defined checks to register after the built-ins.
    pub custom_checks: Vec<CustomCheck>,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(constants::DEFAULT_ROOT),
            timeout_secs: constants::DEFAULT_TIMEOUT_SECS,
            filter_rules: Vec::new(),
            enabled_checks: Vec::new(),
            custom_checks: Vec::new(),
            log_level: None,
            log_file: None,
        }
    }
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first run).
/// If the file is unreadable or unparseable, returns defaults with a warning.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    match load_config_file(&config_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            (AppConfig::default(), vec![msg])
        }
    }
}

/// Load and validate an explicitly named config file.
///
/// Unlike `load_config`, a missing or malformed file is an error: the user
/// asked for this file by name.
pub fn load_config_file(path: &Path) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: RawConfig = toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "Loaded config.toml");
    Ok(validate(raw))
}

/// Validate each field against named constants, accumulating all warnings.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings: Vec<String> = Vec::new();

    // -- Search: root --
    if let Some(root) = raw.search.root {
        if root.trim().is_empty() {
            warnings.push(format!(
                "[search] root is empty. Using default ({}).",
                constants::DEFAULT_ROOT
            ));
        } else {
            config.root = PathBuf::from(root);
        }
    }

    // -- Search: timeout_secs --
    if let Some(secs) = raw.search.timeout_secs {
        if secs <= constants::MAX_TIMEOUT_SECS {
            config.timeout_secs = secs;
        } else {
            warnings.push(
                ConfigError::ValueOutOfRange {
                    field: "search.timeout_secs".to_string(),
                    value: secs.to_string(),
                    expected: format!("0-{}", constants::MAX_TIMEOUT_SECS),
                }
                .to_string(),
            );
        }
    }

    // -- Filter: rules --
    if let Some(mut rules) = raw.filter.rules {
        if rules.len() > constants::MAX_FILTER_RULES {
            warnings.push(format!(
                "[filter] rules has {} entries, maximum is {}. Extra rules ignored.",
                rules.len(),
                constants::MAX_FILTER_RULES
            ));
            rules.truncate(constants::MAX_FILTER_RULES);
        }
        config.filter_rules = rules;
    }

    // -- Checks: enabled --
    if let Some(enabled) = raw.checks.enabled {
        config.enabled_checks = enabled;
    }

    // -- Checks: custom --
    for (index, custom) in raw.checks.custom.unwrap_or_default().into_iter().enumerate() {
        if config.custom_checks.len() >= constants::MAX_CUSTOM_CHECKS {
            warnings.push(format!(
                "[[checks.custom]] more than {} entries. Extra checks ignored.",
                constants::MAX_CUSTOM_CHECKS
            ));
            break;
        }
        if custom.name.trim().is_empty() {
            warnings.push(format!(
                "[[checks.custom]] entry {} has no name. Skipped.",
                index + 1
            ));
            continue;
        }
        if custom.paths.is_empty() {
            warnings.push(format!(
                "[[checks.custom]] '{}' has no paths. Skipped.",
                custom.name
            ));
            continue;
        }
        config.custom_checks.push(CustomCheck::new(
            custom.name,
            custom.description.unwrap_or_default(),
            custom.paths,
        ));
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: {}. Using default ({}).",
                constants::VALID_LOG_LEVELS.join(", "),
                constants::DEFAULT_LOG_LEVEL,
            ));
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}
