//! Field tokenization for the symbol index.
//!
//! Symbols are matched by substring, so tokens are kept whole: no stemming
//! and no stop words. A token is a run of text between whitespace or hyphens,
//! lower-cased, with leading and trailing non-word characters trimmed so that
//! `/api/Widget.html` and `Widget` index the same way at their edges.

/// Returns true for characters that separate tokens.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '-'
}

/// Returns true for characters that may appear at the edge of a token.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Splits text into lower-cased, edge-trimmed tokens. Empty tokens are dropped.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.split(is_separator)
        .filter_map(normalize_token)
        .collect()
}

/// Lower-cases a single token and trims non-word characters from both ends.
fn normalize_token(token: &str) -> Option<String> {
    let trimmed = token.trim_matches(|c: char| !is_word_char(c));
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}
