//! Configuration commands: instant replies, no translation backend call.

mod banword;
mod translate;


use tolk_core::error::TolkError;
use tolk_store::Registry;

/// Grouped context for command execution.
pub struct CommandContext<'a> {
    pub registry: &'a Registry,
    /// Server the command was issued on.
    pub server_id: &'a str,
    /// Full command text, including the command word.
    pub text: &'a str,
}

/// Known commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Translate,
    Banword,
    Channels,
    Help,
}

impl Command {
    /// Parse a command from its text. Returns `None` for anything unknown.
    pub fn parse(text: &str) -> Option<Self> {
        let first = text.split_whitespace().next()?;
        // Strip @botname suffix (e.g. "/help@tolk_bot" → "/help").
        let cmd = first.split('@').next().unwrap_or(first);
        match cmd {
            "/translate" => Some(Self::Translate),
            "/banword" => Some(Self::Banword),
            "/channels" => Some(Self::Channels),
            "/help" => Some(Self::Help),
            _ => None,
        }
    }
}

/// Handle a command and return the reply text.
pub async fn handle(cmd: Command, ctx: &CommandContext<'_>) -> String {
    let args = arguments(ctx.text);
    match cmd {
        Command::Translate => translate::handle_translate(ctx.registry, ctx.server_id, args).await,
        Command::Channels => translate::handle_channels(ctx.registry, ctx.server_id),
        Command::Banword => banword::handle_banword(ctx.registry, args).await,
        Command::Help => handle_help(),
    }
}

/// Reply for text that is not a known command.
pub fn unknown_command(text: &str) -> String {
    match text.split_whitespace().next() {
        Some(cmd) => format!("Unknown command: {cmd}. Try /help."),
        None => "Empty command. Try /help.".to_string(),
    }
}

/// Everything after the command word, trimmed.
fn arguments(text: &str) -> &str {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(pos) => text[pos..].trim(),
        None => "",
    }
}

/// Reply text for a failed mutation. Validation messages go out as-is.
fn error_reply(context: &str, err: &TolkError) -> String {
    match err {
        TolkError::Validation(msg) => format!("Error: {msg}"),
        other => format!("{context}: {other}"),
    }
}

fn handle_help() -> String {
    [
        "*tolk commands*",
        "/translate <channel> [<channel> ...] : enable translation (channelN:<channel> targets a slot)",
        "/channels : show this server's translated channels",
        "/banword add <word>, <word> : ban words",
        "/banword remove <word> : unban a word",
        "/banword list : show banned words",
        "/help : this message",
    ]
    .join("\n")
}
