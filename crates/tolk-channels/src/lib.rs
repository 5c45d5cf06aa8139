//! # tolk-channels
//!
//! Chat platform channel adapters.

pub mod stdio;

pub use stdio::StdioChannel;
