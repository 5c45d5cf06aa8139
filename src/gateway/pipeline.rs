//! Translation pipeline: the ordered gates every chat message passes through.
//!
//! Gates short-circuit in this order: self-check, enrollment, emoji-only,
//! banned words, trivial content, language detection, translation,
//! similarity. Evaluation never posts anything; the gateway acts on the
//! returned [`TranslationResult`].

use std::sync::Arc;
use tolk_core::{
    config::Config,
    error::TolkError,
    filters::{are_similar, contains_banned_word, is_only_emoji},
    message::{Decision, InboundMessage, SuppressReason, TranslationResult},
    traits::{Detector, Translator},
};
use tolk_store::{Registry, Snapshot};
use tracing::debug;

/// Gate toggles and output formatting.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub banned_words: bool,
    pub single_word_gate: bool,
    pub label: String,
}

impl PipelineSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            banned_words: cfg.pipeline.banned_words,
            single_word_gate: cfg.pipeline.single_word_gate,
            label: cfg.translator.label.clone(),
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            banned_words: true,
            single_word_gate: false,
            label: "Translated:".to_string(),
        }
    }
}

pub struct Pipeline {
    registry: Arc<Registry>,
    translator: Arc<dyn Translator>,
    detector: Option<Arc<dyn Detector>>,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(
        registry: Arc<Registry>,
        translator: Arc<dyn Translator>,
        detector: Option<Arc<dyn Detector>>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            registry,
            translator,
            detector,
            settings,
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Run every gate for a chat message.
    ///
    /// `self_id` is the bot's own user ID on the channel the message came
    /// from. One snapshot is used for the whole evaluation.
    pub async fn evaluate(
        &self,
        msg: &InboundMessage,
        self_id: Option<&str>,
    ) -> Result<TranslationResult, TolkError> {
        if self_id.is_some_and(|id| id == msg.author_id) {
            return Ok(TranslationResult::suppressed(
                &msg.text,
                SuppressReason::SelfMessage,
            ));
        }

        let snapshot = self.registry.snapshot();
        if !snapshot.is_enrolled(&msg.channel_id) {
            return Ok(TranslationResult::suppressed(
                &msg.text,
                SuppressReason::NotEnrolled,
            ));
        }

        self.evaluate_content(&msg.text, &snapshot).await
    }

    /// Run the content gates (emoji onward) for `text`.
    pub async fn evaluate_content(
        &self,
        text: &str,
        snapshot: &Snapshot,
    ) -> Result<TranslationResult, TolkError> {
        if is_only_emoji(text) {
            return Ok(TranslationResult::suppressed(text, SuppressReason::EmojiOnly));
        }

        if self.settings.banned_words && contains_banned_word(text, snapshot.banned_words()) {
            return Ok(TranslationResult::suppressed(text, SuppressReason::BannedWord));
        }

        let source = if self.settings.single_word_gate {
            match trivial_content_gate(text) {
                Ok(source) => source,
                Err(reason) => return Ok(TranslationResult::suppressed(text, reason)),
            }
        } else {
            text
        };

        let hint = match &self.detector {
            Some(detector) => {
                let lang = detector.detect(source).await?;
                debug!("detected language: {lang}");
                if is_english(&lang) {
                    return Ok(TranslationResult::suppressed(
                        text,
                        SuppressReason::AlreadyEnglish,
                    ));
                }
                Some(lang)
            }
            None => None,
        };

        let translated = self.translator.translate(source, hint.as_deref()).await?;

        if are_similar(source, &translated) {
            return Ok(TranslationResult {
                original: text.to_string(),
                translated: Some(translated),
                decision: Decision::Suppressed(SuppressReason::TooSimilar),
            });
        }

        let emitted = format!("{} {}", self.settings.label, translated);
        Ok(TranslationResult {
            original: text.to_string(),
            translated: Some(translated),
            decision: Decision::Emitted(emitted),
        })
    }
}

/// Single-token messages are suppressed; `en <word>` (lower-case `en` only)
/// yields `<word>`.
fn trivial_content_gate(text: &str) -> Result<&str, SuppressReason> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    match tokens.as_slice() {
        [_] => Err(SuppressReason::TrivialContent),
        [prefix, word] if *prefix == "en" => Ok(*word),
        _ => Ok(text),
    }
}

/// `en`, `en-US`, `en_GB`, case-insensitive.
fn is_english(lang: &str) -> bool {
    let lang = lang.trim().to_ascii_lowercase();
    lang == "en" || lang.starts_with("en-") || lang.starts_with("en_")
}
