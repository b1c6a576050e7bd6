#![forbid(unsafe_code)]
//! macrolint Command Line Interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use macrolint::commands::{execute_check, execute_init, CheckOptions, InitOptions};

#[derive(Parser)]
#[command(name = "macrolint")]
#[command(about = "Format-string argument checker for debug/print macros")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a directory tree for macro format-string mismatches
    Check {
        /// Root directory to scan
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Configuration file (default: .macrolint.yaml in the root)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Standalone substitution file, merged after the configuration file
        #[arg(long, env = "MACROLINT_SUB_FILE")]
        sub_file: Option<PathBuf>,

        /// Also scan version-control metadata directories
        #[arg(long)]
        no_vcs_exclude: bool,

        /// Show a progress bar
        #[arg(long)]
        progress: bool,

        /// Print diagnostics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a starter .macrolint.yaml
    Init {
        /// Directory to initialize
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Diagnostics are warning-level events; --verbose surfaces the per-file
    // debug chatter as well. RUST_LOG still wins when set.
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Check {
            root,
            config,
            sub_file,
            no_vcs_exclude,
            progress,
            json,
        } => {
            let options = CheckOptions {
                root,
                config,
                sub_file,
                no_vcs_exclude,
                progress,
                json,
            };
            let count = execute_check(options)?;
            if count > 0 {
                std::process::exit(1);
            }
        }

        Commands::Init { root, force } => {
            let options = InitOptions { root, force };
            execute_init(options)?;
        }
    }

    Ok(())
}
