//! # tolk-store
//!
//! Durable channel enrollment and banned-word storage (SQLite), plus the
//! in-memory [`Registry`] snapshot the pipeline reads on every message.

pub mod registry;
pub mod store;

pub use registry::{Registry, Snapshot};
pub use store::{ServerChannels, Store};
