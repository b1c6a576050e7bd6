//! Init command: write a starter configuration file.

use std::path::PathBuf;

use anyhow::Result;
use console::style;

use crate::config::CONFIG_FILE_NAME;

/// Starter configuration written by `macrolint init`.
const STARTER_CONFIG: &str = "\
macrolint:
  # Map project-specific macro spellings onto the canonical name before
  # checking. Global entries apply to every file.
  substitutions: {}
  #   MY_PRINT: DEBUG

  # Per-file overrides, keyed by root-relative path.
  file_substitutions: {}
  #   Driver/Init.c:
  #     LOCAL_TRACE: DEBUG

  # Canonical macro names recognized after substitution.
  macros: [DEBUG]

  # Source extensions to scan.
  extensions: [c, h]

  # Glob patterns and directory names to skip.
  exclude: []
  exclude_segments: []
";

/// Options for the init command
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Directory to initialize
    pub root: PathBuf,
    /// Force overwrite existing config
    pub force: bool,
}

/// Execute the init command
pub fn execute_init(options: InitOptions) -> Result<()> {
    let path = options.root.join(CONFIG_FILE_NAME);

    if path.exists() && !options.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    std::fs::write(&path, STARTER_CONFIG)?;
    println!("{} Created {}", style("✓").green(), path.display());
    Ok(())
}
