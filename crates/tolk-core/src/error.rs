use thiserror::Error;

/// Top-level error type for tolk.
#[derive(Debug, Error)]
pub enum TolkError {
    /// Bad input to a configuration command.
    #[error("validation error: {0}")]
    Validation(String),

    /// Translation backend failed (spawn, non-zero exit, HTTP status, timeout).
    #[error("gateway error: {0}")]
    Gateway(String),

    /// Translation backend answered with something we could not decode.
    #[error("gateway returned a malformed response: {0}")]
    GatewayDecode(String),

    /// Language detection backend failed.
    #[error("detection error: {0}")]
    Detection(String),

    /// Language detection backend answered with something we could not decode.
    #[error("detector returned a malformed response: {0}")]
    DetectionDecode(String),

    /// Persistence error.
    #[error("store error: {0}")]
    Store(String),

    /// Error from a chat platform channel.
    #[error("channel error: {0}")]
    Channel(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
