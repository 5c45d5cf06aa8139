//! translate-shell CLI backend.
//!
//! Runs the locally installed `trans` script as a subprocess, feeding the
//! message on stdin. No API keys needed.
//! Docs: <https://github.com/soimort/translate-shell>

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tolk_core::{
    config::TranslatorConfig,
    error::TolkError,
    traits::{Detector, Translator},
};
use tracing::debug;

/// translate-shell subprocess backend.
pub struct TranslateShell {
    /// Path to the `trans` executable.
    path: String,
    /// Upper bound for one subprocess run, including writing stdin.
    timeout: Duration,
}

impl TranslateShell {
    pub fn new(path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            path: path.into(),
            timeout,
        }
    }

    /// Create a backend from config values.
    pub fn from_config(cfg: &TranslatorConfig) -> Self {
        Self::new(
            cfg.translate_shell.path.clone(),
            Duration::from_secs(cfg.timeout_secs),
        )
    }

    /// Check if the `trans` executable runs.
    pub async fn check_cli(path: &str) -> bool {
        Command::new(path)
            .arg("-V")
            .stdin(Stdio::null())
            .output()
            .await
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Run `trans` with `args`, writing `input` to stdin, and return stdout.
    ///
    /// Every failure is wrapped with `wrap`, so the same runner serves
    /// both the translator and the detector.
    async fn run(
        &self,
        args: &[&str],
        input: &str,
        wrap: fn(String) -> TolkError,
    ) -> Result<String, TolkError> {
        let mut cmd = Command::new(&self.path);
        cmd.args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!("executing: {} {}", self.path, args.join(" "));

        let run = async {
            let mut child = cmd
                .spawn()
                .map_err(|e| wrap(format!("failed to run {}: {e}", self.path)))?;
            if let Some(mut stdin) = child.stdin.take() {
                // A child that exits without reading stdin is reported by
                // its exit status below, not as a write error.
                if let Err(e) = stdin.write_all(input.as_bytes()).await {
                    if e.kind() != std::io::ErrorKind::BrokenPipe {
                        return Err(wrap(format!("failed to write to {}: {e}", self.path)));
                    }
                }
                // Dropping stdin closes the pipe so `trans` sees EOF.
            }
            child
                .wait_with_output()
                .await
                .map_err(|e| wrap(format!("failed to wait for {}: {e}", self.path)))
        };

        let output = tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| {
                wrap(format!(
                    "{} timed out after {}s",
                    self.path,
                    self.timeout.as_secs()
                ))
            })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(wrap(format!(
                "{} exited with {}: {}",
                self.path,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Build the `trans` language pair argument, e.g. `:en` or `fr:en`.
fn language_pair(source_hint: Option<&str>) -> String {
    format!("{}:en", source_hint.unwrap_or_default())
}

/// Pull a language code out of `trans -id` output.
///
/// The verbose report has a `Code  <lang>` row; a bare code on the first
/// line is accepted as well.
fn parse_identify_output(stdout: &str) -> Option<String> {
    for line in stdout.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("Code") {
            if let Some(code) = rest.split_whitespace().last() {
                return Some(code.to_string());
            }
        }
    }

    let first = stdout.lines().map(str::trim).find(|l| !l.is_empty())?;
    let looks_like_code = first.len() <= 12
        && first
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    looks_like_code.then(|| first.to_string())
}

#[async_trait]
impl Translator for TranslateShell {
    fn name(&self) -> &str {
        "translate-shell"
    }

    async fn translate(&self, text: &str, source_hint: Option<&str>) -> Result<String, TolkError> {
        let pair = language_pair(source_hint);
        let stdout = self.run(&["-b", &pair], text, TolkError::Gateway).await?;
        let translated = stdout.trim();
        if translated.is_empty() {
            return Err(TolkError::GatewayDecode(format!(
                "{} produced no output",
                self.path
            )));
        }
        Ok(translated.to_string())
    }

    async fn is_available(&self) -> bool {
        Self::check_cli(&self.path).await
    }
}

#[async_trait]
impl Detector for TranslateShell {
    fn name(&self) -> &str {
        "translate-shell"
    }

    async fn detect(&self, text: &str) -> Result<String, TolkError> {
        let stdout = self
            .run(&["-no-ansi", "-id"], text, TolkError::Detection)
            .await?;
        parse_identify_output(&stdout).ok_or_else(|| {
            TolkError::DetectionDecode(format!(
                "no language code in {} output: {}",
                self.path,
                stdout.trim()
            ))
        })
    }
}
