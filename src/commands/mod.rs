//! CLI command implementations.
//!
//! Each command is in its own submodule. Policy that belongs to the wrapper
//! rather than the library lives here: environment-variable overrides and
//! the decision to fail the process on a non-zero diagnostic count.

pub mod check;
pub mod init;

pub use check::{execute_check, CheckOptions, DISABLE_ENV};
pub use init::{execute_init, InitOptions};
