//! Cleanup applied to raw OCR output before segmentation.
//!
//! OCR engines tend to run numbered exercises together on one line
//! (`... = 4 2. Solve ...`) and to emit long runs of empty lines between
//! pages. [`normalize`] undoes both without touching any other character.

use once_cell::sync::Lazy;
use regex::Regex;

/// `1. `, `12. `: digits, a period, one space.
static NUMBERED_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+\. ").unwrap());

/// A line break followed by two or more whitespace-only lines.
static BLANK_LINE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n(?:[^\S\n]*\n){2,}").unwrap());

/// Normalizes raw recognized text.
///
/// 1. Inserts `\n` before every numbered marker that does not already start a line.
/// 2. Collapses every run of two or more blank lines into a single blank line.
/// 3. Trims leading and trailing whitespace.
///
/// Total and idempotent: `normalize(&normalize(x)) == normalize(x)`.
///
/// ```
/// use wrongmath_syntax::normalize;
///
/// assert_eq!(normalize("1. a 2. b"), "1. a \n2. b");
/// assert_eq!(normalize("a\n\n\n\nb"), "a\n\nb");
/// ```
pub fn normalize(raw: &str) -> String {
    let broken = break_numbered_items(raw);
    let collapsed = BLANK_LINE_RUN.replace_all(&broken, "\n\n");
    collapsed.trim().to_string()
}

fn break_numbered_items(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len() + 8);
    let mut copied = 0;

    for marker in NUMBERED_MARKER.find_iter(text) {
        let at = marker.start();
        if at == 0 || bytes[at - 1] == b'\n' {
            continue;
        }
        out.push_str(&text[copied..at]);
        out.push('\n');
        copied = at;
    }
    out.push_str(&text[copied..]);
    out
}
