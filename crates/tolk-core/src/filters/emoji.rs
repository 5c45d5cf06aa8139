//! Emoji-only detection.

use unicode_general_category::{get_general_category, GeneralCategory};

/// True when every code point in `text` is a symbol (Sm, Sc, Sk, So) or a
/// non-spacing mark (Mn).
///
/// Non-spacing marks cover variation selectors such as U+FE0F, which ride
/// along with most emoji. Whitespace, joiners (U+200D is Cf), letters and
/// digits all make the answer false. The empty string is vacuously
/// emoji-only.
pub fn is_only_emoji(text: &str) -> bool {
    text.chars().all(is_emoji_code_point)
}

fn is_emoji_code_point(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::MathSymbol
            | GeneralCategory::CurrencySymbol
            | GeneralCategory::ModifierSymbol
            | GeneralCategory::OtherSymbol
            | GeneralCategory::NonspacingMark
    )
}
