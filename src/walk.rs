//! Source file enumeration.
//!
//! Walks a rooted tree in a deterministic order (entries sorted by file name
//! per directory level) so diagnostics are reproducible run to run. Exclusion
//! is expressed as a predicate over path segments rather than any one
//! version-control system's on-disk layout; the VCS metadata names are just
//! the default segment set.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::CheckConfig;
use crate::error::{Error, Result};

/// Directory names pruned when version-control exclusion is on.
const VCS_SEGMENTS: &[&str] = &[".git", ".hg", ".svn"];

/// Deterministic, filtered directory walker.
#[derive(Debug)]
pub struct FileWalker {
    extensions: Vec<String>,
    exclude_segments: Vec<String>,
    exclude_globs: Vec<glob::Pattern>,
    ignore_version_control: bool,
}

impl FileWalker {
    /// Builds a walker from checker configuration. A malformed exclude glob
    /// is a configuration error, surfaced before any file is touched.
    pub fn new(config: &CheckConfig) -> Result<Self> {
        let exclude_globs = config
            .exclude
            .iter()
            .map(|p| {
                glob::Pattern::new(p)
                    .map_err(|e| Error::config(format!("bad exclude pattern `{p}`: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            extensions: config
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            exclude_segments: config.exclude_segments.clone(),
            exclude_globs,
            ignore_version_control: config.ignore_version_control,
        })
    }

    /// Lazily yields `(absolute path, root-relative path)` for every eligible
    /// source file under `root`. One pass per call; lexicographic per level.
    pub fn files<'a>(
        &'a self,
        root: &'a Path,
    ) -> impl Iterator<Item = (PathBuf, String)> + 'a {
        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                if !entry.file_type().is_dir() {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                if self.ignore_version_control && VCS_SEGMENTS.contains(&name.as_ref()) {
                    return false;
                }
                !self.exclude_segments.iter().any(|s| *s == name)
            })
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(move |entry| {
                if !self.has_source_extension(entry.path()) {
                    return None;
                }
                let rel = relative_path(entry.path(), root);
                if self.is_excluded(&rel) {
                    return None;
                }
                Some((entry.into_path(), rel))
            })
    }

    fn has_source_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .is_some_and(|ext| self.extensions.iter().any(|e| *e == ext))
    }

    fn is_excluded(&self, rel_path: &str) -> bool {
        let match_opts = glob::MatchOptions {
            case_sensitive: true,
            require_literal_separator: false,
            require_literal_leading_dot: false,
        };
        self.exclude_globs
            .iter()
            .any(|p| p.matches_with(rel_path, match_opts))
    }
}

/// Root-relative path with `/` separators, for substitution-scope matching
/// and reporting.
fn relative_path(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let s = rel.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        s.into_owned()
    } else {
        s.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_walk_is_sorted_and_extension_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("b/Late.c"));
        touch(&root.join("a/Early.c"));
        touch(&root.join("a/Header.h"));
        touch(&root.join("a/Notes.txt"));

        let walker = FileWalker::new(&CheckConfig::default()).unwrap();
        let rels: Vec<String> = walker.files(root).map(|(_, rel)| rel).collect();
        assert_eq!(rels, vec!["a/Early.c", "a/Header.h", "b/Late.c"]);
    }

    #[test]
    fn test_vcs_directories_are_pruned() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("src/Main.c"));
        touch(&root.join(".git/objects/Blob.c"));
        touch(&root.join("sub/.svn/Stale.c"));

        let walker = FileWalker::new(&CheckConfig::default()).unwrap();
        let rels: Vec<String> = walker.files(root).map(|(_, rel)| rel).collect();
        assert_eq!(rels, vec!["src/Main.c"]);
    }

    #[test]
    fn test_vcs_pruning_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join(".git/Hook.c"));

        let config = CheckConfig {
            ignore_version_control: false,
            ..CheckConfig::default()
        };
        let walker = FileWalker::new(&config).unwrap();
        let rels: Vec<String> = walker.files(root).map(|(_, rel)| rel).collect();
        assert_eq!(rels, vec![".git/Hook.c"]);
    }

    #[test]
    fn test_exclude_globs_apply_to_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("src/Keep.c"));
        touch(&root.join("vendor/Drop.c"));

        let config = CheckConfig {
            exclude: vec!["vendor/**".to_string()],
            ..CheckConfig::default()
        };
        let walker = FileWalker::new(&config).unwrap();
        let rels: Vec<String> = walker.files(root).map(|(_, rel)| rel).collect();
        assert_eq!(rels, vec!["src/Keep.c"]);
    }

    #[test]
    fn test_exclude_segments_prune_whole_directories() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("src/Keep.c"));
        touch(&root.join("Build/x64/Gen.c"));

        let config = CheckConfig {
            exclude_segments: vec!["Build".to_string()],
            ..CheckConfig::default()
        };
        let walker = FileWalker::new(&config).unwrap();
        let rels: Vec<String> = walker.files(root).map(|(_, rel)| rel).collect();
        assert_eq!(rels, vec!["src/Keep.c"]);
    }

    #[test]
    fn test_bad_exclude_pattern_is_a_config_error() {
        let config = CheckConfig {
            exclude: vec!["[".to_string()],
            ..CheckConfig::default()
        };
        assert!(matches!(
            FileWalker::new(&config),
            Err(Error::Config { .. })
        ));
    }
}
