//! Substitution tables for normalizing project-specific macro spellings.
//!
//! Projects rarely call the canonical debug macro directly; wrapper names and
//! local aliases are common. A substitution table maps those spellings onto
//! the canonical one with plain literal text replacement before scanning.
//! Entries are scoped either globally or to a single relative file path, with
//! file-scoped entries overriding global ones for that file only.
//!
//! Replacement is a single left-to-right pass: at each position the first
//! matching key (sorted key order) is replaced, and replaced output is never
//! rescanned. The pass records an offset map so spans found in the rewritten
//! text can be traced back to the original source, which is what diagnostics
//! quote.

use std::collections::BTreeMap;

/// Where a set of substitution entries applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Applies to every scanned file.
    Global,
    /// Applies only to the file at this root-relative path (`/` separators).
    File(String),
}

/// One ordered configuration source: a scope and its string mapping.
#[derive(Debug, Clone)]
pub struct SubstitutionSource {
    pub scope: Scope,
    pub entries: Vec<(String, String)>,
}

/// Merged, read-only substitution configuration for a whole run.
#[derive(Debug, Clone, Default)]
pub struct SubstitutionTable {
    global: BTreeMap<String, String>,
    per_file: BTreeMap<String, BTreeMap<String, String>>,
}

impl SubstitutionTable {
    /// Merges sources in order. Within a scope, a later source overwrites an
    /// earlier entry for the same key (last writer wins).
    pub fn from_sources<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = SubstitutionSource>,
    {
        let mut table = SubstitutionTable::default();
        for source in sources {
            match source.scope {
                Scope::Global => {
                    table.global.extend(source.entries);
                }
                Scope::File(path) => {
                    table
                        .per_file
                        .entry(path)
                        .or_default()
                        .extend(source.entries);
                }
            }
        }
        table
    }

    /// True when no scope carries any entry.
    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.per_file.values().all(BTreeMap::is_empty)
    }

    /// Effective mapping for one file: global entries overlaid with the
    /// file's own entries, the file winning on key collision. Files without
    /// a scoped section are governed by the global mapping alone.
    pub fn for_file(&self, rel_path: &str) -> BTreeMap<String, String> {
        let mut merged = self.global.clone();
        if let Some(file_entries) = self.per_file.get(rel_path) {
            for (key, value) in file_entries {
                merged.insert(key.clone(), value.clone());
            }
        }
        merged
    }
}

/// A replaced span: `new_len` bytes of output standing in for `old_len`
/// bytes of input starting at `old_start`.
#[derive(Debug, Clone, Copy)]
struct Edit {
    new_start: usize,
    new_len: usize,
    old_start: usize,
    old_len: usize,
}

/// The rewritten text together with the map back to the original.
#[derive(Debug)]
pub struct Substituted {
    pub text: String,
    edits: Vec<Edit>,
}

impl Substituted {
    /// Maps a span in the rewritten text back to the span in the original
    /// text that produced it. Offsets inside a replacement snap outward to
    /// the replaced key's boundaries.
    pub fn original_span(&self, new_start: usize, new_end: usize) -> (usize, usize) {
        (self.old_offset(new_start, false), self.old_offset(new_end, true))
    }

    fn old_offset(&self, new_offset: usize, is_end: bool) -> usize {
        // Last edit starting at or before the offset governs the mapping.
        let idx = self.edits.partition_point(|e| e.new_start <= new_offset);
        if idx == 0 {
            return new_offset;
        }
        let edit = self.edits[idx - 1];
        if new_offset < edit.new_start + edit.new_len {
            if is_end && new_offset > edit.new_start {
                edit.old_start + edit.old_len
            } else {
                edit.old_start
            }
        } else {
            edit.old_start + edit.old_len + (new_offset - (edit.new_start + edit.new_len))
        }
    }
}

/// Applies `mapping` to `text` in one pass. Output equals input when no key
/// occurs in the text.
pub fn substitute(text: &str, mapping: &BTreeMap<String, String>) -> Substituted {
    if mapping.is_empty() {
        return Substituted {
            text: text.to_string(),
            edits: Vec::new(),
        };
    }

    let mut out = String::with_capacity(text.len());
    let mut edits = Vec::new();
    let bytes = text.as_bytes();
    let mut i = 0;

    'outer: while i < bytes.len() {
        for (key, value) in mapping {
            if !key.is_empty() && text[i..].starts_with(key.as_str()) {
                edits.push(Edit {
                    new_start: out.len(),
                    new_len: value.len(),
                    old_start: i,
                    old_len: key.len(),
                });
                out.push_str(value);
                i += key.len();
                continue 'outer;
            }
        }
        // No key matches here; copy one character through.
        let ch_len = text[i..].chars().next().map_or(1, char::len_utf8);
        out.push_str(&text[i..i + ch_len]);
        i += ch_len;
    }

    Substituted { text: out, edits }
}
