//! `/translate` and `/channels`.

use super::error_reply;
use tolk_store::Registry;

/// Enable translation for the referenced channels.
pub(super) async fn handle_translate(registry: &Registry, server_id: &str, args: &str) -> String {
    let overrides = match parse_channel_refs(args, registry.slots()) {
        Ok(overrides) => overrides,
        Err(msg) => return format!("Error: {msg}"),
    };

    match registry.set_channels(server_id, &overrides).await {
        Ok(_) => format!("Translation enabled for {}", describe_slots(&overrides)),
        Err(e) => error_reply("Failed to enable translation for channels", &e),
    }
}

/// List the server's configured slots.
pub(super) fn handle_channels(registry: &Registry, server_id: &str) -> String {
    let slots = registry.channels_for(server_id);
    if slots.iter().all(Option::is_none) {
        return "No channels are enabled for translation on this server. Use /translate <channel>."
            .to_string();
    }

    let mut out = String::from("Translated channels:");
    for (i, slot) in slots.iter().enumerate() {
        let shown = slot.as_deref().map(mention).unwrap_or_else(|| "-".to_string());
        out.push_str(&format!("\nchannel {}: {shown}", i + 1));
    }
    out
}

/// `channel 1: <#a> and channel 3: <#c>`, skipping untouched slots.
fn describe_slots(overrides: &[Option<String>]) -> String {
    overrides
        .iter()
        .enumerate()
        .filter_map(|(i, slot)| {
            slot.as_deref()
                .map(|id| format!("channel {}: {}", i + 1, mention(id)))
        })
        .collect::<Vec<_>>()
        .join(" and ")
}

fn mention(channel_id: &str) -> String {
    format!("<#{channel_id}>")
}

/// Parse `/translate` arguments into per-slot overrides.
///
/// Bare references fill the lowest unfilled slot; `channelN:<ref>` or
/// `channelN=<ref>` (the reference may also be the next token) targets
/// slot N. A reference is a raw ID or a `<#id>` mention.
pub(super) fn parse_channel_refs(
    args: &str,
    max_slots: usize,
) -> Result<Vec<Option<String>>, String> {
    let mut slots: Vec<Option<String>> = Vec::new();
    let mut tokens = args.split_whitespace();

    while let Some(token) = tokens.next() {
        let (index, raw) = match split_slot_prefix(token) {
            Some((n, rest)) => {
                if n == 0 || n > max_slots {
                    return Err(format!(
                        "channel {n} is out of range: this bot supports {max_slots} channels per server"
                    ));
                }
                let raw = if rest.is_empty() {
                    tokens
                        .next()
                        .ok_or_else(|| format!("Missing channel after {token}"))?
                } else {
                    rest
                };
                (n - 1, raw)
            }
            None => {
                let next = slots
                    .iter()
                    .position(Option::is_none)
                    .unwrap_or(slots.len());
                if next >= max_slots {
                    return Err(format!(
                        "Too many channels: this bot supports {max_slots} channels per server"
                    ));
                }
                (next, token)
            }
        };

        let id = channel_id_from_ref(raw)
            .ok_or_else(|| format!("Invalid channel reference: {raw}"))?;
        if slots.len() <= index {
            slots.resize(index + 1, None);
        }
        slots[index] = Some(id);
    }

    Ok(slots)
}

/// `channel2:rest` / `channel2=rest` → `(2, "rest")`.
fn split_slot_prefix(token: &str) -> Option<(usize, &str)> {
    let rest = token.strip_prefix("channel")?;
    let sep = rest.find(|c: char| c == ':' || c == '=')?;
    let n = rest[..sep].parse().ok()?;
    Some((n, &rest[sep + 1..]))
}

/// `<#123>` → `123`; a raw ID passes through.
fn channel_id_from_ref(raw: &str) -> Option<String> {
    let id = match raw.strip_prefix("<#") {
        Some(rest) => rest.strip_suffix('>')?,
        None => raw,
    };
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.');
    valid.then(|| id.to_string())
}
