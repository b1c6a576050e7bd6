#![forbid(unsafe_code)]

//! # macrolint
//!
//! Format-string argument checker for debug/print macro invocations.
//!
//! Scans a source tree for macro calls like `DEBUG ((DEBUG_INFO, "Value:
//! %d\n", Value));`, counts the printf-style specifiers in the literal
//! format string, and reports every call whose specifier count disagrees
//! with the number of supplied variadic arguments. A YAML-driven
//! substitution table maps project-specific macro spellings onto the
//! canonical recognized name before scanning.
//!
//! ## Features
//!
//! - **Literal-aware parsing**: balanced parentheses, nested calls, commas
//!   and escaped quotes inside string literals, adjacent-literal
//!   concatenation
//! - **Scoped substitutions**: global entries plus per-file overrides
//! - **Deterministic output**: sorted traversal, stable diagnostic order
//! - **Parallel scanning**: files are independent and fan out via rayon
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use macrolint::{check_macros_in_directory, SubstitutionTable};
//!
//! fn main() -> macrolint::Result<()> {
//!     let table = SubstitutionTable::default();
//!     let mismatches = check_macros_in_directory(Path::new("."), true, false, &table)?;
//!     println!("{mismatches} mismatched macro(s)");
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod scan;
pub mod subs;
pub mod walk;

// Re-exports
pub use config::{CheckConfig, ConfigFile};
pub use error::{Error, Result};
pub use scan::{
    check_macros_in_directory, Checker, CollectingSink, Diagnostic, DiagnosticSink, TracingSink,
};
pub use subs::{substitute, Scope, SubstitutionSource, SubstitutionTable, Substituted};
pub use walk::FileWalker;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
