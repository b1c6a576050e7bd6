//! Printf-style format specifier parsing and argument counting.
//!
//! A specifier has the shape `%[flags][width][.precision][length]conversion`.
//! Width and precision may be the dynamic marker `*`, each occurrence of
//! which consumes one argument on top of the conversion's own. The `%%`
//! escape is a literal percent and consumes nothing. A stray `%` that never
//! reaches a recognized conversion letter is not a specifier at all.

use std::sync::LazyLock;

use regex::Regex;

/// Matches one format specifier.
/// Groups: width, precision (both may be the dynamic marker), conversion.
static FORMAT_SPECIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        // The space flag is deliberately not recognized: prose like "50% of"
        // would otherwise parse as a specifier.
        r"%[#\-+0,]*(?P<width>\*|\d+)?(?P<precision>\.(?:\*|\d+))?[Ll]?(?P<conversion>[aAcdeEfgGnopsSuxX%rt])",
    )
    .unwrap()
});

/// A parsed conversion token and the number of variadic arguments it
/// consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpecifier {
    /// Conversion character (`d`, `s`, `%`, ...).
    pub conversion: char,
    /// Arguments consumed: 0 for `%%`, otherwise 1 plus one per dynamic
    /// width/precision marker.
    pub consumes: usize,
}

/// Parses every specifier in a format string, left to right.
pub fn specifiers(format: &str) -> Vec<FormatSpecifier> {
    FORMAT_SPECIFIER
        .captures_iter(format)
        .map(|caps| {
            let conversion = caps
                .name("conversion")
                .map_or('%', |m| m.as_str().chars().next().unwrap_or('%'));

            let consumes = if conversion == '%' {
                0
            } else {
                let dynamic_width =
                    caps.name("width").is_some_and(|m| m.as_str() == "*") as usize;
                let dynamic_precision = caps
                    .name("precision")
                    .is_some_and(|m| m.as_str() == ".*") as usize;
                1 + dynamic_width + dynamic_precision
            };

            FormatSpecifier {
                conversion,
                consumes,
            }
        })
        .collect()
}

/// Total number of variadic arguments the format string requires.
pub fn required_arguments(format: &str) -> usize {
    specifiers(format).iter().map(|s| s.consumes).sum()
}
