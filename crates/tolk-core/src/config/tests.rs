use super::*;

#[test]
fn test_defaults() {
    let cfg = Config::default();
    assert_eq!(cfg.translator.backend, "translate-shell");
    assert_eq!(cfg.translator.timeout_secs, 15);
    assert_eq!(cfg.translator.label, "Translated:");
    assert_eq!(cfg.pipeline.channel_slots, 3);
    assert!(cfg.pipeline.banned_words);
    assert!(!cfg.pipeline.single_word_gate);
    assert!(!cfg.detector.enabled);
    assert!(cfg.channel.stdio.is_some());
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_empty_toml_uses_section_defaults() {
    let cfg = parse("").unwrap();
    assert_eq!(cfg.tolk.name, "tolk");
    assert_eq!(cfg.store.db_path, "~/.tolk/data/tolk.db");
    assert_eq!(cfg.translator.translate_shell.path, "trans");
    assert!(cfg.channel.stdio.is_none());
}

#[test]
fn test_full_toml() {
    let cfg = parse(
        r#"
        [tolk]
        log_level = "debug"

        [translator]
        backend = "google"
        timeout_secs = 5
        label = "EN:"

        [translator.google]
        api_key = "k"

        [detector]
        enabled = true
        backend = "google"

        [pipeline]
        channel_slots = 5
        single_word_gate = true

        [channel.stdio]
        bot_id = "bot-1"
        "#,
    )
    .unwrap();
    assert_eq!(cfg.tolk.log_level, "debug");
    assert_eq!(cfg.translator.backend, "google");
    assert_eq!(cfg.translator.timeout_secs, 5);
    assert_eq!(cfg.translator.label, "EN:");
    assert_eq!(cfg.translator.google.api_key, "k");
    assert!(cfg
        .translator
        .google
        .base_url
        .starts_with("https://translation.googleapis.com"));
    assert!(cfg.detector.enabled);
    assert_eq!(cfg.pipeline.channel_slots, 5);
    assert!(cfg.pipeline.single_word_gate);
    assert!(cfg.pipeline.banned_words);
    let stdio = cfg.channel.stdio.unwrap();
    assert!(stdio.enabled);
    assert_eq!(stdio.bot_id, "bot-1");
}

#[test]
fn test_channel_slots_out_of_range() {
    let mut cfg = Config::default();
    cfg.pipeline.channel_slots = 1;
    assert!(matches!(cfg.validate(), Err(TolkError::Config(_))));
    cfg.pipeline.channel_slots = 6;
    assert!(cfg.validate().is_err());
    cfg.pipeline.channel_slots = 2;
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_unknown_backend_rejected() {
    let mut cfg = Config::default();
    cfg.detector.backend = "deepl".into();
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("detector.backend"));
}

#[test]
fn test_zero_timeout_rejected() {
    let mut cfg = Config::default();
    cfg.translator.timeout_secs = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn test_env_overrides_ignore_blank_values() {
    let mut cfg = Config::default();
    cfg.apply_overrides(Some("/opt/trans".into()), Some("  ".into()));
    assert_eq!(cfg.translator.translate_shell.path, "/opt/trans");
    assert!(cfg.translator.google.api_key.is_empty());

    cfg.apply_overrides(None, Some("secret".into()));
    assert_eq!(cfg.translator.translate_shell.path, "/opt/trans");
    assert_eq!(cfg.translator.google.api_key, "secret");
}

#[test]
fn test_malformed_toml_is_config_error() {
    assert!(matches!(parse("[pipeline"), Err(TolkError::Config(_))));
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let cfg = load("/nonexistent/__tolk_test__/config.toml").unwrap();
    assert_eq!(cfg.pipeline.channel_slots, 3);
}

#[test]
fn test_shellexpand_leaves_absolute_paths() {
    assert_eq!(shellexpand("/var/lib/tolk.db"), "/var/lib/tolk.db");
    assert_eq!(shellexpand(":memory:"), ":memory:");
}

#[test]
fn test_example_config_parses_and_validates() {
    let cfg = parse(include_str!("../../../../config.example.toml")).unwrap();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.pipeline.channel_slots, 3);
    assert!(cfg.channel.stdio.is_some_and(|s| s.enabled));
}
