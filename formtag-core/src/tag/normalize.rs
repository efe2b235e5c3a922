//! Repairs for artifacts word processors leave in placeholder text

use strsim::normalized_damerau_levenshtein;
use unicode_normalization::UnicodeNormalization;

/// Similarity a misspelt option key needs to be read as a known one
const KEY_SIMILARITY_CUTOFF: f64 = 0.72;

/// Option keys that can be recovered from mangled input
pub const OPTION_KEYWORDS: &[&str] = &[
    "value",
    "default",
    "options",
    "format",
    "tooltip",
    "width",
    "height",
    "rowheight",
    "cellwidth",
    "columnwidth",
    "label",
    "url",
    "data",
    "calculation",
    "validation",
    "multi",
    "checked",
    "required",
    "readonly",
];

/// Zero-width and hyphenation characters injected when a long token wraps.
pub fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{00AD}'
            | '\u{200B}'
            | '\u{200C}'
            | '\u{200D}'
            | '\u{200E}'
            | '\u{200F}'
            | '\u{2060}'
            | '\u{FEFF}'
    )
}

/// Drops invisible characters and applies NFKC so full-width punctuation matches.
pub fn normalize_text(text: &str) -> String {
    text.chars().filter(|c| !is_invisible(*c)).nfkc().collect()
}

pub fn remove_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Trims and turns every whitespace run into a single space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Maps a possibly mangled option key onto a known keyword.
///
/// Unknown keys come back lowercased and otherwise untouched.
pub fn normalize_option_key(key: &str) -> String {
    let base = remove_whitespace(key).to_lowercase();
    if is_known(&base) {
        return base;
    }

    let trimmed = base.trim_matches(|c: char| !c.is_ascii_alphanumeric());
    if is_known(trimmed) {
        return trimmed.to_string();
    }

    for prefix in ['i', 'l', '1', 'j'] {
        if let Some(rest) = trimmed.strip_prefix(prefix) {
            if is_known(rest) {
                return rest.to_string();
            }
        }
    }

    match closest_keyword(trimmed) {
        Some(known) => known.to_string(),
        None => trimmed.to_string(),
    }
}

/// Keyword most similar to a misspelt `key`, if any is close enough
fn closest_keyword(key: &str) -> Option<&'static str> {
    OPTION_KEYWORDS
        .iter()
        .copied()
        .map(|known| (known, normalized_damerau_levenshtein(key, known)))
        .filter(|(_, score)| *score >= KEY_SIMILARITY_CUTOFF)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(known, _)| known)
}

fn is_known(key: &str) -> bool {
    OPTION_KEYWORDS.contains(&key)
}

/// Known keyword that `text` ends with, longest match first.
pub(crate) fn trailing_keyword(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    OPTION_KEYWORDS
        .iter()
        .copied()
        .filter(|key| lower.ends_with(key))
        .max_by_key(|key| key.len())
}
