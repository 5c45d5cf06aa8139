//! Pure text gates used by the translation pipeline.
//!
//! Every function here is side-effect free and compares text in its
//! normalized form (trimmed, lower-cased) without mutating what gets posted.

pub mod emoji;
pub mod similarity;
pub mod wordban;

pub use emoji::is_only_emoji;
pub use similarity::{are_similar, MAX_MISMATCHES};
pub use wordban::{contains_banned_word, normalize_word, parse_word_list};
