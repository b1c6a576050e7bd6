//! Error types shared across the library.
//!
//! Configuration problems abort the run immediately: a silently dropped
//! substitution entry would suppress real diagnostics downstream. Per-file
//! trouble during a scan (unreadable or non-UTF-8 content, unparseable macro
//! calls) is not an error at all; those instances are skipped and contribute
//! zero diagnostics.

use thiserror::Error;

/// All errors surfaced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed substitution or checker configuration.
    #[error("invalid configuration: {reason}")]
    Config { reason: String },

    /// Unexpected internal fault while setting up or running a scan.
    #[error("scan failed: {reason}")]
    Scan { reason: String },

    /// I/O failure while loading configuration or enumerating files.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A configuration document that is not valid YAML.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Shorthand for a configuration error with a formatted reason.
    pub fn config(reason: impl Into<String>) -> Self {
        Error::Config {
            reason: reason.into(),
        }
    }

    /// Shorthand for a scan error with a formatted reason.
    pub fn scan(reason: impl Into<String>) -> Self {
        Error::Scan {
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;
