use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat message delivered by a platform channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Platform message ID.
    #[serde(default)]
    pub id: String,
    /// Platform user ID of the author.
    pub author_id: String,
    /// Human-readable author name.
    #[serde(default)]
    pub author_name: Option<String>,
    /// Channel the message was posted in.
    pub channel_id: String,
    /// Server (guild) the channel belongs to.
    pub server_id: String,
    /// Raw message text.
    pub text: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

/// A configuration command issued by a user (slash command or `/`-prefixed text).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandInvocation {
    /// Platform interaction ID, echoed back as `reply_to`.
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    pub channel_id: String,
    pub server_id: String,
    /// Command text, e.g. `/banword add foo, bar`.
    pub text: String,
}

/// Everything a channel can hand to the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IncomingEvent {
    Message(InboundMessage),
    Command(CommandInvocation),
}

/// A message to post back through a channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub channel_id: String,
    pub text: String,
    /// Interaction or message being answered, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

/// Why the pipeline declined to post a translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressReason {
    /// The bot wrote the message itself.
    SelfMessage,
    /// The channel is not enrolled on any server.
    NotEnrolled,
    EmojiOnly,
    BannedWord,
    /// Single-token message.
    TrivialContent,
    AlreadyEnglish,
    /// The translation is too close to the original to be worth posting.
    TooSimilar,
}

impl SuppressReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelfMessage => "self_message",
            Self::NotEnrolled => "not_enrolled",
            Self::EmojiOnly => "emoji_only",
            Self::BannedWord => "banned_word",
            Self::TrivialContent => "trivial_content",
            Self::AlreadyEnglish => "already_english",
            Self::TooSimilar => "too_similar",
        }
    }
}

impl std::fmt::Display for SuppressReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of running one message through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Post this text to the source channel.
    Emitted(String),
    Suppressed(SuppressReason),
}

/// Per-message pipeline result. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    pub original: String,
    /// Backend output, when the pipeline got as far as translating.
    pub translated: Option<String>,
    pub decision: Decision,
}

impl TranslationResult {
    /// Result for a message stopped before translation.
    pub fn suppressed(original: &str, reason: SuppressReason) -> Self {
        Self {
            original: original.to_string(),
            translated: None,
            decision: Decision::Suppressed(reason),
        }
    }

    /// The text to post, if the decision is to emit.
    pub fn emitted_text(&self) -> Option<&str> {
        match &self.decision {
            Decision::Emitted(text) => Some(text),
            Decision::Suppressed(_) => None,
        }
    }

    pub fn suppress_reason(&self) -> Option<SuppressReason> {
        match self.decision {
            Decision::Suppressed(reason) => Some(reason),
            Decision::Emitted(_) => None,
        }
    }
}
