//! Text cleanup for translated chat lines.
//!
//! Game chat renders neither markup nor most non-ASCII glyphs, so provider
//! output is reduced to plain text:
//! - markup tags (`<...>`) are dropped
//! - color codes (`^` followed by a digit) are dropped
//! - accented letters and a few symbols are spelled out in ASCII

use regex::Regex;
use std::sync::LazyLock;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static COLOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\^[0-9]").expect("valid regex"));

/// Character substitutions, applied in order.
const SUBSTITUTIONS: &[(&str, &str)] = &[
    ("ß", "ss"),
    ("ü", "ue"),
    ("ö", "oe"),
    ("ä", "ae"),
    ("à", "a"),
    ("è", "e"),
    ("é", "e"),
    ("ì", "i"),
    ("ò", "o"),
    ("ù", "u"),
    ("ç", "c"),
    ("€", "euro"),
    ("$", "dollar"),
    ("£", "pound"),
    ("%", "pc"),
    ("\"", "''"),
];

/// Remove every color code, including ones that only appear once an inner
/// code is removed (`^^11` becomes empty, not `^1`).
pub fn strip_colors(input: &str) -> String {
    let mut text = input.to_string();
    while COLOR.is_match(&text) {
        text = COLOR.replace_all(&text, "").into_owned();
    }
    text
}

/// Clean provider output for display in game chat.
pub fn sanitize(input: &str) -> String {
    let text = TAG.replace_all(input, "");
    let mut text = strip_colors(&text);
    for (from, to) in SUBSTITUTIONS {
        if text.contains(from) {
            text = text.replace(from, to);
        }
    }
    text.trim().to_string()
}
