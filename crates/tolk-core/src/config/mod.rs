mod defaults;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::TolkError;
use defaults::*;

/// Smallest number of channel slots a server may have.
pub const MIN_CHANNEL_SLOTS: usize = 2;
/// Largest number of channel slots a server may have (matches the table schema).
pub const MAX_CHANNEL_SLOTS: usize = 5;

/// Top-level tolk configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tolk: TolkConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub translator: TranslatorConfig,
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TolkConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Root for logs and the default database location.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Default `tracing` filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TolkConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// SQLite store config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Translation backend config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// `"translate-shell"` or `"google"`.
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Upper bound for one translate or detect call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Prefix placed before every posted translation.
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default)]
    pub translate_shell: TranslateShellConfig,
    #[serde(default)]
    pub google: GoogleConfig,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            timeout_secs: default_timeout_secs(),
            label: default_label(),
            translate_shell: TranslateShellConfig::default(),
            google: GoogleConfig::default(),
        }
    }
}

/// translate-shell (`trans`) CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateShellConfig {
    /// Path to the `trans` executable. Overridden by `TRANSLATE_PATH`.
    #[serde(default = "default_trans_path")]
    pub path: String,
}

impl Default for TranslateShellConfig {
    fn default() -> Self {
        Self {
            path: default_trans_path(),
        }
    }
}

/// Google Cloud Translation v2 settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// Overridden by `GOOGLE_TRANSLATE_API_KEY`.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_google_base_url")]
    pub base_url: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_google_base_url(),
        }
    }
}

/// Language detection config. Detection is skipped when disabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    #[serde(default)]
    pub enabled: bool,
    /// `"translate-shell"` or `"google"`; shares the translator's settings.
    #[serde(default = "default_backend")]
    pub backend: String,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            backend: default_backend(),
        }
    }
}

/// Gate toggles for the translation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Channel slots per server (2..=5).
    #[serde(default = "default_channel_slots")]
    pub channel_slots: usize,
    /// Suppress messages containing a banned word.
    #[serde(default = "default_true")]
    pub banned_words: bool,
    /// Suppress single-token messages; `en <word>` forces translation of `<word>`.
    #[serde(default)]
    pub single_word_gate: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            channel_slots: default_channel_slots(),
            banned_words: true,
            single_word_gate: false,
        }
    }
}

/// Channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChannelConfig {
    pub stdio: Option<StdioConfig>,
}

/// JSON-lines bridge over stdin/stdout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StdioConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// User ID the bridge reports for the bot's own posts.
    #[serde(default = "default_bot_id")]
    pub bot_id: String,
}

impl Default for StdioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bot_id: default_bot_id(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tolk: TolkConfig::default(),
            store: StoreConfig::default(),
            translator: TranslatorConfig::default(),
            detector: DetectorConfig::default(),
            pipeline: PipelineConfig::default(),
            channel: ChannelConfig {
                stdio: Some(StdioConfig::default()),
            },
        }
    }
}

impl Config {
    /// Apply `TRANSLATE_PATH` and `GOOGLE_TRANSLATE_API_KEY` from the environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var("TRANSLATE_PATH").ok(),
            std::env::var("GOOGLE_TRANSLATE_API_KEY").ok(),
        );
    }

    fn apply_overrides(&mut self, trans_path: Option<String>, google_key: Option<String>) {
        if let Some(path) = trans_path.filter(|p| !p.trim().is_empty()) {
            self.translator.translate_shell.path = path;
        }
        if let Some(key) = google_key.filter(|k| !k.trim().is_empty()) {
            self.translator.google.api_key = key;
        }
    }

    /// Reject settings the rest of the bot cannot honour.
    pub fn validate(&self) -> Result<(), TolkError> {
        let slots = self.pipeline.channel_slots;
        if !(MIN_CHANNEL_SLOTS..=MAX_CHANNEL_SLOTS).contains(&slots) {
            return Err(TolkError::Config(format!(
                "pipeline.channel_slots must be between {MIN_CHANNEL_SLOTS} and {MAX_CHANNEL_SLOTS}, got {slots}"
            )));
        }
        if self.translator.timeout_secs == 0 {
            return Err(TolkError::Config(
                "translator.timeout_secs must be greater than zero".into(),
            ));
        }
        for (key, backend) in [
            ("translator.backend", &self.translator.backend),
            ("detector.backend", &self.detector.backend),
        ] {
            if !matches!(backend.as_str(), "translate-shell" | "google") {
                return Err(TolkError::Config(format!("unsupported {key}: {backend}")));
            }
        }
        Ok(())
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist. Environment overrides
/// are applied and the result is validated either way.
pub fn load(path: &str) -> Result<Config, TolkError> {
    let path = Path::new(path);
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TolkError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        parse(&content)?
    } else {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        Config::default()
    };

    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Parse configuration from TOML text without touching the environment.
pub fn parse(content: &str) -> Result<Config, TolkError> {
    toml::from_str(content).map_err(|e| TolkError::Config(format!("failed to parse config: {e}")))
}
