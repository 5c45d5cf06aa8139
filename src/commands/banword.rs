//! `/banword add|remove|list`.

use super::error_reply;
use tolk_core::filters::{normalize_word, parse_word_list};
use tolk_store::Registry;

pub(super) async fn handle_banword(registry: &Registry, args: &str) -> String {
    let (sub, rest) = match args.split_once(char::is_whitespace) {
        Some((sub, rest)) => (sub, rest.trim()),
        None => (args, ""),
    };
    match sub.to_lowercase().as_str() {
        "add" => handle_add(registry, rest).await,
        "remove" => handle_remove(registry, rest).await,
        "list" => handle_list(registry).await,
        _ => "Usage: /banword add <word>, <word> | /banword remove <word> | /banword list"
            .to_string(),
    }
}

async fn handle_add(registry: &Registry, rest: &str) -> String {
    let words = parse_word_list(rest);
    if words.is_empty() {
        return "No new words were added to the ban list.".to_string();
    }
    match registry.add_words(&words).await {
        Ok(added) if added.is_empty() => "No new words were added to the ban list.".to_string(),
        Ok(added) => format!("Added words to ban list: {}", added.join(", ")),
        Err(e) => error_reply("Failed to add words to ban list", &e),
    }
}

async fn handle_remove(registry: &Registry, rest: &str) -> String {
    let Some(word) = normalize_word(rest) else {
        return "No word provided to remove.".to_string();
    };
    match registry.remove_word(&word).await {
        Ok(true) => format!("Removed word from ban list: {word}"),
        Ok(false) => format!("Word is not in the ban list: {word}"),
        Err(e) => error_reply(
            &format!("Failed to remove word '{word}' from ban list"),
            &e,
        ),
    }
}

async fn handle_list(registry: &Registry) -> String {
    match registry.list_words().await {
        Ok(words) if words.is_empty() => "The ban list is empty.".to_string(),
        Ok(words) => format!("Banned words: {}", words.join(", ")),
        Err(e) => error_reply("Failed to retrieve banned words", &e),
    }
}
