//! # tolk-core
//!
//! Core types, traits, text filters, configuration, and error handling for
//! the tolk translation bot.

pub mod config;
pub mod error;
pub mod filters;
pub mod message;
pub mod traits;

pub use config::shellexpand;
