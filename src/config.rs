//! Checker configuration loading.
//!
//! Configuration lives in a YAML document under a single `macrolint:` key
//! with optional sections:
//!
//! ```yaml
//! macrolint:
//!   substitutions:            # global, applies to every file
//!     MY_PRINT: DEBUG
//!   file_substitutions:       # keyed by root-relative path
//!     Driver/Init.c:
//!       LOCAL_TRACE: DEBUG
//!   macros: [DEBUG]
//!   extensions: [c, h]
//!   exclude: ["vendor/**"]
//!   exclude_segments: [Build]
//! ```
//!
//! The substitution sections are validated by hand against the raw YAML
//! value so that a non-string entry fails fast with a configuration error
//! instead of silently suppressing diagnostics later.

use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;

use crate::error::{Error, Result};
use crate::subs::{Scope, SubstitutionSource};

/// Default configuration file name, looked up in the scan root.
pub const CONFIG_FILE_NAME: &str = ".macrolint.yaml";

/// Top-level document key.
pub const TOP_LEVEL_KEY: &str = "macrolint";

/// Checker settings (everything except the substitution sections).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Canonical macro names to recognize after substitution.
    pub macros: Vec<String>,
    /// Recognized source file extensions.
    pub extensions: Vec<String>,
    /// Extra exclude patterns, matched against root-relative paths.
    pub exclude: Vec<String>,
    /// Directory names pruned wherever they appear in the tree.
    pub exclude_segments: Vec<String>,
    /// Prune version-control metadata directories (`.git`, `.hg`, `.svn`).
    #[serde(skip)]
    pub ignore_version_control: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            macros: vec!["DEBUG".to_string()],
            extensions: vec!["c".to_string(), "h".to_string()],
            exclude: Vec::new(),
            exclude_segments: Vec::new(),
            ignore_version_control: true,
        }
    }
}

/// A parsed configuration document: checker settings plus the ordered
/// substitution sources it contributes.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub check: CheckConfig,
    pub sources: Vec<SubstitutionSource>,
}

impl ConfigFile {
    /// Loads and validates a configuration file.
    pub fn load(path: &Path) -> Result<ConfigFile> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
            .map_err(|e| match e {
                Error::Config { reason } => {
                    Error::config(format!("{}: {reason}", path.display()))
                }
                other => other,
            })
    }

    /// Parses a configuration document from text.
    pub fn parse(text: &str) -> Result<ConfigFile> {
        let doc: Value = serde_yaml::from_str(text)?;
        let top = doc
            .get(TOP_LEVEL_KEY)
            .ok_or_else(|| Error::config(format!("missing top-level `{TOP_LEVEL_KEY}` key")))?;

        let sources = substitution_sources(top)?;
        let check: CheckConfig = serde_yaml::from_value(top.clone())?;

        Ok(ConfigFile { check, sources })
    }
}

/// Extracts the substitution sources from a configuration document, in
/// declaration order: the global section first, then one source per
/// file-scoped section.
fn substitution_sources(top: &Value) -> Result<Vec<SubstitutionSource>> {
    let mut sources = Vec::new();

    if let Some(global) = top.get("substitutions") {
        sources.push(SubstitutionSource {
            scope: Scope::Global,
            entries: string_mapping(global, "substitutions")?,
        });
    }

    if let Some(per_file) = top.get("file_substitutions") {
        let mapping = per_file.as_mapping().ok_or_else(|| {
            Error::config("`file_substitutions` must be a mapping of file path to mapping")
        })?;
        for (file_key, file_value) in mapping {
            let path = file_key
                .as_str()
                .ok_or_else(|| Error::config("`file_substitutions` keys must be file paths"))?;
            sources.push(SubstitutionSource {
                scope: Scope::File(path.to_string()),
                entries: string_mapping(
                    file_value,
                    &format!("file_substitutions.{path}"),
                )?,
            });
        }
    }

    Ok(sources)
}

/// Validates a string-to-string YAML mapping, preserving document order.
fn string_mapping(value: &Value, section: &str) -> Result<Vec<(String, String)>> {
    let mapping = value
        .as_mapping()
        .ok_or_else(|| Error::config(format!("`{section}` must be a mapping")))?;

    let mut entries = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        let key = key
            .as_str()
            .ok_or_else(|| Error::config(format!("`{section}` keys must be strings")))?;
        let value = value.as_str().ok_or_else(|| {
            Error::config(format!(
                "`{section}.{key}` must be a string, not {}",
                value_kind(value)
            ))
        })?;
        entries.push((key.to_string(), value.to_string()));
    }
    Ok(entries)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
