//! Macro invocation detection and argument-list parsing.
//!
//! An invocation is a whole-word macro identifier followed by a balanced
//! parenthesized argument list. A naive split on commas is not enough: the
//! arguments may themselves contain function calls, parenthesized
//! expressions, and string literals with commas or escaped quotes, so the
//! splitter tracks nesting and literal state. The common double-paren shape
//! `DEBUG ((Level, "fmt", ...))` is unwrapped one level before splitting.

use regex::Regex;

use crate::error::{Error, Result};

/// A located macro call: the identifier span, the span one past the closing
/// parenthesis, and the top-level argument list.
#[derive(Debug, Clone)]
pub struct MacroInvocation {
    /// Byte offset of the macro identifier in the scanned text.
    pub start: usize,
    /// Byte offset just past the closing parenthesis.
    pub end: usize,
    /// Top-level arguments, trimmed, after double-paren unwrapping.
    pub args: Vec<String>,
}

/// The format-string argument of an invocation, once classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatArg {
    /// One or more adjacent string literals, joined into a single logical
    /// format string (quotes stripped, escapes kept as written).
    Literal(String),
    /// A variable, expression, or literal/non-literal mix. Cannot be checked.
    NonLiteral,
}

/// Compiles the detection pattern for a set of canonical macro names.
pub fn macro_pattern(names: &[String]) -> Result<Regex> {
    if names.is_empty() {
        return Err(Error::scan("no macro names configured"));
    }
    let alternation = names
        .iter()
        .map(|n| regex::escape(n))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alternation})\s*\(")).map_err(|e| Error::scan(e.to_string()))
}

/// Finds every parseable invocation in `text`. Calls whose argument list
/// never balances (runaway quote or parenthesis) are skipped, not reported.
pub fn find_invocations(text: &str, pattern: &Regex) -> Vec<MacroInvocation> {
    let mut invocations = Vec::new();

    for m in pattern.find_iter(text) {
        // The match ends at the opening parenthesis.
        let open = m.end() - 1;
        let Some(close) = matching_paren(text, open) else {
            continue;
        };
        let inner = &text[open + 1..close];
        let Some(mut args) = split_arguments(inner) else {
            continue;
        };

        // Unwrap `MACRO ((a, b, c))` to the inner list.
        if args.len() == 1 {
            let only = args[0].as_str();
            if only.starts_with('(') && only.ends_with(')') {
                if let Some(inner_args) = split_arguments(&only[1..only.len() - 1]) {
                    args = inner_args;
                }
            }
        }

        invocations.push(MacroInvocation {
            start: m.start(),
            end: close + 1,
            args,
        });
    }

    invocations
}

/// Returns the offset of the parenthesis closing the one at `open`, honoring
/// nested parens and string/character literals.
fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut state = LexState::Code;

    for (offset, ch) in text[open..].char_indices() {
        match state.step(ch) {
            Lexed::Code => match ch {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(open + offset);
                    }
                }
                _ => {}
            },
            Lexed::InLiteral => {}
        }
    }
    None
}

/// Splits an argument list at top-level commas. Returns `None` when the text
/// is not balanced (a quote or bracket never closes), and an empty list for
/// a blank argument list.
pub fn split_arguments(inner: &str) -> Option<Vec<String>> {
    let mut args = Vec::new();
    let mut depth = 0isize;
    let mut state = LexState::Code;
    let mut piece_start = 0usize;

    for (offset, ch) in inner.char_indices() {
        match state.step(ch) {
            Lexed::InLiteral => continue,
            Lexed::Code => match ch {
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth -= 1,
                ',' if depth == 0 => {
                    args.push(inner[piece_start..offset].trim().to_string());
                    piece_start = offset + 1;
                }
                _ => {}
            },
        }
        if depth < 0 {
            return None;
        }
    }

    if depth != 0 || !matches!(state, LexState::Code) {
        return None;
    }

    let tail = inner[piece_start..].trim();
    if !tail.is_empty() || !args.is_empty() {
        args.push(tail.to_string());
    }
    Some(args)
}

/// Classifies one argument as a literal format string or not.
///
/// Adjacent string literals (optionally `L`-prefixed) are joined into one
/// logical format string. Anything left over after the literals, or anything
/// before them, makes the argument non-literal and the invocation is skipped
/// rather than miscounted.
pub fn classify_format_arg(arg: &str) -> FormatArg {
    let mut rest = arg.trim();
    if rest.is_empty() {
        return FormatArg::NonLiteral;
    }

    let mut joined = String::new();
    let mut saw_literal = false;

    while !rest.is_empty() {
        let candidate = rest.strip_prefix('L').unwrap_or(rest);
        let Some(after_quote) = candidate.strip_prefix('"') else {
            return FormatArg::NonLiteral;
        };
        let Some(content_len) = literal_content_len(after_quote) else {
            return FormatArg::NonLiteral;
        };
        joined.push_str(&after_quote[..content_len]);
        saw_literal = true;
        rest = after_quote[content_len + 1..].trim_start();
    }

    if saw_literal {
        FormatArg::Literal(joined)
    } else {
        FormatArg::NonLiteral
    }
}

/// Length of the literal content up to (not including) the closing quote,
/// or `None` if the literal never terminates.
fn literal_content_len(after_quote: &str) -> Option<usize> {
    let mut escaped = false;
    for (offset, ch) in after_quote.char_indices() {
        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == '"' {
            return Some(offset);
        }
    }
    None
}

/// Minimal literal-aware lexer state shared by the paren matcher and the
/// argument splitter.
#[derive(Debug, Clone, Copy)]
enum LexState {
    Code,
    InString { escaped: bool },
    InChar { escaped: bool },
}

enum Lexed {
    Code,
    InLiteral,
}

impl LexState {
    fn step(&mut self, ch: char) -> Lexed {
        match *self {
            LexState::Code => match ch {
                '"' => {
                    *self = LexState::InString { escaped: false };
                    Lexed::InLiteral
                }
                '\'' => {
                    *self = LexState::InChar { escaped: false };
                    Lexed::InLiteral
                }
                _ => Lexed::Code,
            },
            LexState::InString { escaped } => {
                if escaped {
                    *self = LexState::InString { escaped: false };
                } else if ch == '\\' {
                    *self = LexState::InString { escaped: true };
                } else if ch == '"' {
                    *self = LexState::Code;
                }
                Lexed::InLiteral
            }
            LexState::InChar { escaped } => {
                if escaped {
                    *self = LexState::InChar { escaped: false };
                } else if ch == '\\' {
                    *self = LexState::InChar { escaped: true };
                } else if ch == '\'' {
                    *self = LexState::Code;
                }
                Lexed::InLiteral
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern() -> Regex {
        macro_pattern(&["DEBUG".to_string()]).unwrap()
    }

    #[test]
    fn test_finds_double_paren_invocation() {
        let text = r#"  DEBUG ((DEBUG_INFO, "Value: %d\n", Value));"#;
        let found = find_invocations(text, &pattern());
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].args,
            vec!["DEBUG_INFO", r#""Value: %d\n""#, "Value"]
        );
    }

    #[test]
    fn test_single_paren_invocation_after_substitution_shape() {
        let text = r#"DEBUG("Count: %d", n);"#;
        let found = find_invocations(text, &pattern());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].args, vec![r#""Count: %d""#, "n"]);
    }

    #[test]
    fn test_commas_inside_nested_calls_do_not_split() {
        let text = r#"DEBUG ((DEBUG_WARN, "%a: %d\n", GetName (a, b), Max (x, y)));"#;
        let found = find_invocations(text, &pattern());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].args.len(), 4);
        assert_eq!(found[0].args[2], "GetName (a, b)");
        assert_eq!(found[0].args[3], "Max (x, y)");
    }

    #[test]
    fn test_commas_inside_string_literals_do_not_split() {
        let text = r#"DEBUG ((DEBUG_INFO, "a, b, c: %d\n", Count));"#;
        let found = find_invocations(text, &pattern());
        assert_eq!(found[0].args.len(), 3);
        assert_eq!(found[0].args[1], r#""a, b, c: %d\n""#);
    }

    #[test]
    fn test_escaped_quote_inside_literal() {
        let text = r#"DEBUG ((DEBUG_INFO, "quoted \"%a\", ok\n", Name));"#;
        let found = find_invocations(text, &pattern());
        assert_eq!(found[0].args.len(), 3);
    }

    #[test]
    fn test_longer_identifier_is_not_matched() {
        let text = r#"MY_DEBUG(("%d", x)); DEBUGX("%d", x);"#;
        assert!(find_invocations(text, &pattern()).is_empty());
    }

    #[test]
    fn test_unterminated_invocation_is_skipped() {
        let text = r#"DEBUG ((DEBUG_INFO, "oops %d\n", Value"#;
        assert!(find_invocations(text, &pattern()).is_empty());
    }

    #[test]
    fn test_multiline_invocation() {
        let text = "DEBUG ((\n  DEBUG_INFO,\n  \"%d %a\\n\",\n  Index,\n  Name\n  ));";
        let found = find_invocations(text, &pattern());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].args.len(), 4);
    }

    #[test]
    fn test_classify_plain_literal() {
        assert_eq!(
            classify_format_arg(r#""Value: %d\n""#),
            FormatArg::Literal(r"Value: %d\n".to_string())
        );
    }

    #[test]
    fn test_classify_wide_literal() {
        assert_eq!(
            classify_format_arg(r#"L"wide %s""#),
            FormatArg::Literal("wide %s".to_string())
        );
    }

    #[test]
    fn test_classify_adjacent_literals_join() {
        assert_eq!(
            classify_format_arg("\"part one %d \"\n      \"part two %x\\n\""),
            FormatArg::Literal(r"part one %d part two %x\n".to_string())
        );
    }

    #[test]
    fn test_classify_variable_is_non_literal() {
        assert_eq!(classify_format_arg("FormatVar"), FormatArg::NonLiteral);
    }

    #[test]
    fn test_classify_literal_macro_mix_is_non_literal() {
        assert_eq!(
            classify_format_arg(r#""lead %d " TRAILER_MACRO"#),
            FormatArg::NonLiteral
        );
        assert_eq!(
            classify_format_arg(r#"PREFIX "tail %d""#),
            FormatArg::NonLiteral
        );
    }

    #[test]
    fn test_split_blank_list_is_empty() {
        assert_eq!(split_arguments("   "), Some(vec![]));
    }
}
