//! Default value functions for serde.

pub(super) fn default_name() -> String {
    "tolk".to_string()
}
pub(super) fn default_data_dir() -> String {
    "~/.tolk".to_string()
}
pub(super) fn default_log_level() -> String {
    "info".to_string()
}
pub(super) fn default_db_path() -> String {
    "~/.tolk/data/tolk.db".to_string()
}
pub(super) fn default_true() -> bool {
    true
}
pub(super) fn default_backend() -> String {
    "translate-shell".to_string()
}
pub(super) fn default_timeout_secs() -> u64 {
    15
}
pub(super) fn default_label() -> String {
    "Translated:".to_string()
}
pub(super) fn default_trans_path() -> String {
    "trans".to_string()
}
pub(super) fn default_google_base_url() -> String {
    "https://translation.googleapis.com/language/translate/v2".to_string()
}
pub(super) fn default_channel_slots() -> usize {
    3
}
pub(super) fn default_bot_id() -> String {
    "tolk".to_string()
}
