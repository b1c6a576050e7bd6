//! Macro format-string checking.
//!
//! The checker rewrites each file through its effective substitution
//! mapping, locates canonical macro invocations in the rewritten text,
//! counts the format specifiers in the literal format string, and compares
//! that count against the supplied variadic arguments. Every mismatch
//! becomes one [`Diagnostic`]; everything the checker cannot verify
//! statically (non-literal format strings, unbalanced calls, undecodable
//! files) is skipped, because a false positive from a build-gating lint is
//! worse than a missed instance.
//!
//! Files are independent, so the directory scan fans out with `rayon` and
//! merges the per-file results back in enumeration order to keep output
//! deterministic.

pub mod format;
pub mod invocation;

use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;

use crate::config::CheckConfig;
use crate::error::Result;
use crate::subs::{substitute, SubstitutionTable};
use crate::walk::FileWalker;

use self::invocation::{classify_format_arg, find_invocations, macro_pattern, FormatArg};

/// One reported mismatch between declared and supplied argument counts.
///
/// Line number and macro text always refer to the file as written, before
/// any substitution was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Root-relative path of the file.
    pub file: PathBuf,
    /// 1-based line of the invocation.
    pub line: usize,
    /// Arguments required by the format string.
    pub expected: usize,
    /// Variadic arguments actually supplied.
    pub actual: usize,
    /// The invocation as it appears in the original source.
    pub macro_text: String,
}

/// Where diagnostics are delivered. Injected so the core carries no global
/// reporting state.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: &Diagnostic);
}

/// Emits each diagnostic as a warning-level tracing event.
#[derive(Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, d: &Diagnostic) {
        tracing::warn!(
            file = %d.file.display(),
            line = d.line,
            expected = d.expected,
            actual = d.actual,
            macro_text = %d.macro_text,
            "format specifier count does not match argument count"
        );
    }
}

/// Collects diagnostics into a vector. Used by tests and the JSON output
/// path.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, d: &Diagnostic) {
        self.diagnostics.push(d.clone());
    }
}

/// The macro format checker for one run.
pub struct Checker {
    pattern: Regex,
    walker: FileWalker,
}

impl Checker {
    /// Builds a checker from configuration. Fails fast on malformed macro
    /// names or exclude patterns.
    pub fn new(config: &CheckConfig) -> Result<Self> {
        Ok(Self {
            pattern: macro_pattern(&config.macros)?,
            walker: FileWalker::new(config)?,
        })
    }

    /// Scans in-memory text as if it were the file at `rel_path`. This is
    /// the pure core: substitution, invocation parsing, specifier counting.
    pub fn scan_text(
        &self,
        rel_path: &str,
        text: &str,
        table: &SubstitutionTable,
    ) -> Vec<Diagnostic> {
        let mapping = table.for_file(rel_path);
        let rewritten = substitute(text, &mapping);

        let mut diagnostics = Vec::new();
        for inv in find_invocations(&rewritten.text, &self.pattern) {
            // The format string is the first argument that is entirely a
            // string literal; anything before it (a print-level constant,
            // say) is not a variadic value.
            let format = inv.args.iter().enumerate().find_map(|(i, arg)| {
                match classify_format_arg(arg) {
                    FormatArg::Literal(fmt) => Some((i, fmt)),
                    FormatArg::NonLiteral => None,
                }
            });
            let Some((format_index, format_string)) = format else {
                continue;
            };

            let expected = format::required_arguments(&format_string);
            let actual = inv.args.len() - format_index - 1;
            if expected == actual {
                continue;
            }

            let (old_start, old_end) = rewritten.original_span(inv.start, inv.end);
            let line = 1 + text[..old_start].bytes().filter(|b| *b == b'\n').count();
            diagnostics.push(Diagnostic {
                file: PathBuf::from(rel_path),
                line,
                expected,
                actual,
                macro_text: text[old_start..old_end].to_string(),
            });
        }
        diagnostics
    }

    /// Scans one file. Content that cannot be read or decoded as UTF-8
    /// contributes zero diagnostics.
    pub fn scan_file(
        &self,
        path: &Path,
        rel_path: &str,
        table: &SubstitutionTable,
    ) -> Vec<Diagnostic> {
        match std::fs::read_to_string(path) {
            Ok(text) => self.scan_text(rel_path, &text, table),
            Err(e) => {
                tracing::debug!(file = %path.display(), error = %e, "skipping unreadable file");
                Vec::new()
            }
        }
    }

    /// Scans every eligible file under `root`, reports each diagnostic
    /// through `sink`, and returns the total count.
    pub fn check_directory(
        &self,
        root: &Path,
        table: &SubstitutionTable,
        sink: &mut dyn DiagnosticSink,
        show_progress: bool,
    ) -> Result<usize> {
        let files: Vec<(PathBuf, String)> = self.walker.files(root).collect();

        let progress = if show_progress {
            ProgressBar::new(files.len() as u64)
        } else {
            ProgressBar::hidden()
        };

        let per_file: Vec<Vec<Diagnostic>> = files
            .par_iter()
            .map(|(path, rel)| {
                let found = self.scan_file(path, rel, table);
                progress.inc(1);
                found
            })
            .collect();
        progress.finish_and_clear();

        let mut count = 0;
        for diagnostic in per_file.iter().flatten() {
            sink.report(diagnostic);
            count += 1;
        }
        Ok(count)
    }
}

/// Checks every eligible source file under `root` with default settings and
/// tracing-based reporting, returning the number of mismatches found. Zero
/// means the tree is clean (or nothing was scanned).
pub fn check_macros_in_directory(
    root: &Path,
    ignore_version_control: bool,
    show_progress: bool,
    macro_subs: &SubstitutionTable,
) -> Result<usize> {
    let config = CheckConfig {
        ignore_version_control,
        ..CheckConfig::default()
    };
    let checker = Checker::new(&config)?;
    let mut sink = TracingSink;
    checker.check_directory(root, macro_subs, &mut sink, show_progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subs::{Scope, SubstitutionSource};

    fn checker() -> Checker {
        Checker::new(&CheckConfig::default()).unwrap()
    }

    fn global_subs(pairs: &[(&str, &str)]) -> SubstitutionTable {
        SubstitutionTable::from_sources(vec![SubstitutionSource {
            scope: Scope::Global,
            entries: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }])
    }

    #[test]
    fn test_matching_counts_are_clean() {
        let text = r#"DEBUG ((DEBUG_INFO, "Value: %d\n", Value));"#;
        let found = checker().scan_text("a.c", text, &SubstitutionTable::default());
        assert!(found.is_empty());
    }

    #[test]
    fn test_missing_argument_is_reported() {
        let text = r#"DEBUG ((DEBUG_INFO, "Value: %d %d\n", Value));"#;
        let found = checker().scan_text("a.c", text, &SubstitutionTable::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].expected, 2);
        assert_eq!(found[0].actual, 1);
        assert_eq!(found[0].line, 1);
    }

    #[test]
    fn test_extra_argument_is_reported() {
        let text = r#"DEBUG ((DEBUG_INFO, "done\n", Leftover));"#;
        let found = checker().scan_text("a.c", text, &SubstitutionTable::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].expected, 0);
        assert_eq!(found[0].actual, 1);
    }

    #[test]
    fn test_substituted_macro_is_recognized() {
        let table = global_subs(&[("MY_PRINT", "DEBUG")]);
        let text = r#"MY_PRINT("Count: %d", n);"#;
        assert!(checker().scan_text("a.c", text, &table).is_empty());
    }

    #[test]
    fn test_diagnostic_quotes_pre_substitution_text() {
        let table = global_subs(&[("MY_PRINT", "DEBUG")]);
        let text = "int a;\nMY_PRINT(\"Count: %d %d\", n);\n";
        let found = checker().scan_text("a.c", text, &table);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line, 2);
        assert_eq!(found[0].macro_text, "MY_PRINT(\"Count: %d %d\", n)");
    }

    #[test]
    fn test_non_literal_format_is_skipped() {
        let text = "DEBUG ((DEBUG_INFO, FormatVar, x, y));";
        assert!(checker()
            .scan_text("a.c", text, &SubstitutionTable::default())
            .is_empty());
    }

    #[test]
    fn test_escaped_percent_consumes_nothing() {
        let text = r#"DEBUG ((DEBUG_INFO, "100%% done\n"));"#;
        assert!(checker()
            .scan_text("a.c", text, &SubstitutionTable::default())
            .is_empty());
    }

    #[test]
    fn test_concatenated_literals_count_as_one_format_string() {
        let text = "DEBUG ((DEBUG_INFO,\n  \"part %d \"\n  \"part %x\\n\",\n  A, B));";
        assert!(checker()
            .scan_text("a.c", text, &SubstitutionTable::default())
            .is_empty());
    }

    #[test]
    fn test_dynamic_width_needs_an_extra_argument() {
        let clean = r#"DEBUG ((DEBUG_INFO, "%*d\n", Width, Value));"#;
        let short = r#"DEBUG ((DEBUG_INFO, "%*d\n", Value));"#;
        let c = checker();
        assert!(c.scan_text("a.c", clean, &SubstitutionTable::default()).is_empty());
        let found = c.scan_text("a.c", short, &SubstitutionTable::default());
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].expected, found[0].actual), (2, 1));
    }

    #[test]
    fn test_multiple_invocations_report_in_order() {
        let text = "\
DEBUG ((DEBUG_INFO, \"ok %d\\n\", A));
DEBUG ((DEBUG_INFO, \"bad %d %d\\n\", A));
DEBUG ((DEBUG_ERROR, \"also bad %x\\n\"));
";
        let found = checker().scan_text("a.c", text, &SubstitutionTable::default());
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].line, 2);
        assert_eq!(found[1].line, 3);
    }
}
