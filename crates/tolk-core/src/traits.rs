use crate::{
    error::TolkError,
    message::{IncomingEvent, OutgoingMessage},
};
use async_trait::async_trait;

/// Translation backend: turns foreign text into English.
///
/// Implementations must bound every call with a timeout and report a
/// timeout as [`TolkError::Gateway`].
#[async_trait]
pub trait Translator: Send + Sync {
    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// Translate `text` into English. `source_hint` is a language code
    /// (e.g. `"fr"`) when a detector already identified the source.
    async fn translate(&self, text: &str, source_hint: Option<&str>) -> Result<String, TolkError>;

    /// Check if the backend is reachable / installed.
    async fn is_available(&self) -> bool;
}

/// Language detection backend.
#[async_trait]
pub trait Detector: Send + Sync {
    fn name(&self) -> &str;

    /// Best-guess language code for `text` (e.g. `"en"`, `"fr"`, `"zh-CN"`).
    async fn detect(&self, text: &str) -> Result<String, TolkError>;
}

/// Chat platform channel: delivers events and accepts posts.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// The bot's own user ID on this platform, once known.
    fn self_id(&self) -> Option<String>;

    /// Start listening. Returns a receiver that yields incoming events.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingEvent>, TolkError>;

    /// Post a message to a channel.
    async fn send(&self, message: OutgoingMessage) -> Result<(), TolkError>;

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), TolkError>;
}
