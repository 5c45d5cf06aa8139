//! Positional similarity between an original and its translation.

/// More than this many positional mismatches means the translation is worth
/// posting.
pub const MAX_MISMATCHES: usize = 2;

/// True when `translated` is too close to `original` to be worth posting.
///
/// Both sides are trimmed and lower-cased. Identical strings are similar.
/// Otherwise the tokens of `original` are walked in order and a mismatch is
/// counted whenever the translation has no token at that index or a
/// different one. This is a positional diff, not an alignment: an inserted
/// or dropped word shifts every later position.
pub fn are_similar(original: &str, translated: &str) -> bool {
    let original = original.trim().to_lowercase();
    let translated = translated.trim().to_lowercase();

    if original == translated {
        return true;
    }

    let translated_tokens: Vec<&str> = translated.split_whitespace().collect();
    let mut mismatches = 0;
    for (i, token) in original.split_whitespace().enumerate() {
        if translated_tokens.get(i) != Some(&token) {
            mismatches += 1;
            if mismatches > MAX_MISMATCHES {
                return false;
            }
        }
    }

    true
}
