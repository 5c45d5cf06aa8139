//! Banned-word matching.

use std::collections::BTreeSet;

/// True when any whitespace-separated token of `text`, lower-cased, is in
/// `banned`.
///
/// Tokens are matched exactly. Punctuation stays attached to its token, so
/// `"word."` only matches if the set contains `"word."` itself.
pub fn contains_banned_word(text: &str, banned: &BTreeSet<String>) -> bool {
    if banned.is_empty() {
        return false;
    }
    text.split_whitespace()
        .any(|token| banned.contains(&token.to_lowercase()))
}

/// Trim and lower-case a word for storage. Returns `None` for blank input.
pub fn normalize_word(raw: &str) -> Option<String> {
    let word = raw.trim().to_lowercase();
    if word.is_empty() {
        None
    } else {
        Some(word)
    }
}

/// Split a comma-separated list into normalized words.
///
/// Blank entries are dropped and duplicates collapse onto their first
/// occurrence, preserving input order.
pub fn parse_word_list(csv: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    csv.split(',')
        .filter_map(normalize_word)
        .filter(|w| seen.insert(w.clone()))
        .collect()
}
