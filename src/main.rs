// TraceSweep - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading
// 3. Logging initialisation (debug mode support)
// 4. Filter, registry and finder construction
// 5. Scan and report output

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracesweep::app::scan::{self, ScanOptions};
use tracesweep::core::cancel::CancelToken;
use tracesweep::core::check::Check;
use tracesweep::core::export;
use tracesweep::core::finder::Finder;
use tracesweep::platform::config::{self as app_config, AppConfig, PlatformPaths};
use tracesweep::platform::fs::DiskFs;
use tracesweep::util::{self, error::Result};

/// Report format written to stdout.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// TraceSweep - find log and history artefacts matching glob patterns.
///
/// Runs the built-in checks (or the ones named with --check) against a root
/// directory and lists every matching file not excluded by a --filter rule.
/// Files are only listed, never modified.
#[derive(Parser, Debug)]
#[command(name = "tracesweep", version, about)]
struct Cli {
    /// Directory all patterns are resolved against [default: /].
    #[arg(short = 'r', long = "root")]
    root: Option<PathBuf>,

    /// Exclusion rule (glob); repeatable.
    #[arg(short = 'f', long = "filter", value_name = "PATTERN")]
    filters: Vec<String>,

    /// Run only this check; repeatable.
    #[arg(short = 'c', long = "check", value_name = "NAME")]
    checks: Vec<String>,

    /// Additional search pattern; repeatable.
    #[arg(short = 'p', long = "pattern", value_name = "PATTERN")]
    patterns: Vec<String>,

    /// Report format.
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// List the available checks and exit.
    #[arg(long = "list-checks")]
    list_checks: bool,

    /// Abort the scan after this many seconds (0 = no limit).
    #[arg(
        long = "timeout",
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(0..=util::constants::MAX_TIMEOUT_SECS)
    )]
    timeout: Option<u64>,

    /// Read configuration from this file instead of the platform default.
    #[arg(long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let (config, config_warnings) = match &cli.config {
        Some(path) => match app_config::load_config_file(path) {
            Ok(loaded) => loaded,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        None => app_config::load_config(&PlatformPaths::resolve().config_dir),
    };

    util::logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_file.as_deref(),
    );

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "TraceSweep starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    if let Err(e) = run(cli, config) {
        tracing::error!(error = %e, "Scan failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli, config: AppConfig) -> Result<()> {
    let registry = scan::build_registry(&config.custom_checks)?;

    if cli.list_checks {
        for check in registry.iter() {
            println!("{:<18} {}", check.name(), check.description());
        }
        return Ok(());
    }

    let root = cli.root.unwrap_or(config.root);
    let fs = DiskFs::open(root)?;
    let filter = scan::build_filter(config.filter_rules.iter().chain(cli.filters.iter()))?;
    let finder = Finder::new(Arc::new(fs), filter);

    let timeout_secs = cli.timeout.unwrap_or(config.timeout_secs);
    let cancel = if timeout_secs > 0 {
        CancelToken::new().with_timeout(Duration::from_secs(timeout_secs))
    } else {
        CancelToken::new()
    };

    let options = ScanOptions {
        checks: if cli.checks.is_empty() {
            config.enabled_checks
        } else {
            cli.checks
        },
        extra_patterns: cli.patterns,
        cancel,
    };

    let report = scan::run_scan(&finder, &registry, &options)?;

    let stdout = std::io::stdout();
    let out = stdout.lock();
    let written = match cli.format {
        OutputFormat::Text => export::write_text(&report, out)?,
        OutputFormat::Json => export::write_json(&report, out)?,
        OutputFormat::Csv => export::write_csv(&report, out)?,
    };
    tracing::debug!(written, "Report written");
    Ok(())
}
