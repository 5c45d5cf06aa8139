//! # tolk-providers
//!
//! Translation and language-detection backends.

pub mod google;
pub mod translate_shell;

pub use google::GoogleTranslate;
pub use translate_shell::TranslateShell;
