//! Check command: scan a tree and report format-string mismatches.

use std::path::PathBuf;

use anyhow::Result;
use console::style;

use crate::config::{CheckConfig, ConfigFile, CONFIG_FILE_NAME};
use crate::scan::{Checker, CollectingSink, TracingSink};
use crate::subs::{SubstitutionSource, SubstitutionTable};

/// Environment variable that disables the check entirely.
pub const DISABLE_ENV: &str = "MACROLINT_DISABLE";

/// Options for the check command
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Root directory to scan
    pub root: PathBuf,
    /// Explicit configuration file (default: `.macrolint.yaml` in the root)
    pub config: Option<PathBuf>,
    /// Standalone substitution file, merged after the configuration file
    pub sub_file: Option<PathBuf>,
    /// Keep scanning inside version-control metadata directories
    pub no_vcs_exclude: bool,
    /// Render a progress bar
    pub progress: bool,
    /// Print diagnostics as JSON instead of log output
    pub json: bool,
}

/// Execute the check command. Returns the number of mismatches found;
/// mapping a non-zero count to a failing exit status is the caller's policy.
pub fn execute_check(options: CheckOptions) -> Result<usize> {
    if std::env::var_os(DISABLE_ENV).is_some_and(|v| !v.is_empty()) {
        println!(
            "{} macro check disabled via {}",
            style("•").dim(),
            DISABLE_ENV
        );
        return Ok(0);
    }

    // Substitution data may come from the project configuration file, a
    // standalone substitution file, or both; sources merge in that order
    // with later entries overwriting same-keyed earlier ones.
    let mut check_config = CheckConfig::default();
    let mut sources: Vec<SubstitutionSource> = Vec::new();

    let config_path = options
        .config
        .clone()
        .unwrap_or_else(|| options.root.join(CONFIG_FILE_NAME));
    if config_path.is_file() {
        let config = ConfigFile::load(&config_path)?;
        check_config = config.check;
        sources.extend(config.sources);
    } else if options.config.is_some() {
        anyhow::bail!("config file not found: {}", config_path.display());
    }

    if let Some(sub_file) = &options.sub_file {
        let subs = ConfigFile::load(sub_file)?;
        sources.extend(subs.sources);
    }

    check_config.ignore_version_control = !options.no_vcs_exclude;

    let table = SubstitutionTable::from_sources(sources);
    let checker = Checker::new(&check_config)?;

    let count = if options.json {
        let mut sink = CollectingSink::default();
        let count =
            checker.check_directory(&options.root, &table, &mut sink, options.progress)?;
        println!("{}", serde_json::to_string_pretty(&sink.diagnostics)?);
        count
    } else {
        let mut sink = TracingSink;
        let count =
            checker.check_directory(&options.root, &table, &mut sink, options.progress)?;
        if count == 0 {
            println!("{} No macro format issues found", style("✓").green());
        } else {
            println!(
                "{} {} macro format issue{} found",
                style("✗").red(),
                count,
                if count == 1 { "" } else { "s" }
            );
        }
        count
    };

    Ok(count)
}
