use super::*;
use crate::error::PolyglotError;
use crate::language::{Language, Source};
use std::time::Duration;

fn parse(toml_str: &str) -> toml::Table {
    toml_str.parse().unwrap()
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn test_defaults_when_empty() {
    let settings = Settings::resolve(&toml::Table::new(), no_env);
    assert_eq!(settings.default_source, Source::Auto);
    assert_eq!(settings.default_target.code(), "en");
    assert!(settings.display_translator_name);
    assert_eq!(settings.translator_name, "^7[^1T^7]");
    assert_eq!(settings.message_prefix, "^3");
    assert_eq!(settings.min_sentence_length, 6);
    assert_eq!(settings.min_time_between, Duration::from_secs(30));
    assert_eq!(settings.provider, ProviderKind::Google);
    assert_eq!(settings.dispatch, DispatchMode::Background);
    assert_eq!(settings.auto_translate, AutoTranslatePolicy::PerClient);
    assert!(settings.enabled);
}

#[test]
fn test_full_settings_from_toml() {
    let table = parse(
        r#"
        [settings]
        default_source_language = "fr"
        default_target_language = "de"
        display_translator_name = false
        translator_name = "[TR]"
        message_prefix = ""
        min_sentence_length = 3
        min_time_between = 0
        provider = "Google"
        dispatch = "inline"
        auto_translate = "shared"
    "#,
    );
    let settings = Settings::resolve(&table, no_env);
    assert_eq!(settings.default_source, Source::Lang(Language::lookup("fr").unwrap()));
    assert_eq!(settings.default_target.code(), "de");
    assert!(!settings.display_translator_name);
    assert_eq!(settings.translator_name, "[TR]");
    assert_eq!(settings.message_prefix, "");
    assert_eq!(settings.min_sentence_length, 3);
    assert!(!settings.rate_limited());
    assert_eq!(settings.dispatch, DispatchMode::Inline);
    assert_eq!(settings.auto_translate, AutoTranslatePolicy::Shared);
}

#[test]
fn test_invalid_field_does_not_affect_others() {
    let table = parse(
        r#"
        [settings]
        default_source_language = "klingon"
        default_target_language = "it"
        display_translator_name = "maybe"
        min_sentence_length = -4
        min_time_between = "soon"
        translator_name = "[X]"
        dispatch = "threads"
    "#,
    );
    let settings = Settings::resolve(&table, no_env);
    assert_eq!(settings.default_source, Source::Auto);
    assert_eq!(settings.default_target.code(), "it");
    assert!(settings.display_translator_name);
    assert_eq!(settings.min_sentence_length, 6);
    assert_eq!(settings.min_time_between, Duration::from_secs(30));
    assert_eq!(settings.translator_name, "[X]");
    assert_eq!(settings.dispatch, DispatchMode::Background);
}

#[test]
fn test_empty_source_means_auto() {
    let table = parse("[settings]\ndefault_source_language = \"\"\n");
    assert_eq!(Settings::resolve(&table, no_env).default_source, Source::Auto);
}

#[test]
fn test_ini_style_booleans() {
    let table = parse("[settings]\ndisplay_translator_name = \"off\"\n");
    assert!(!Settings::resolve(&table, no_env).display_translator_name);
    let table = parse("[settings]\ndisplay_translator_name = \"yes\"\n");
    assert!(Settings::resolve(&table, no_env).display_translator_name);
}

#[test]
fn test_settings_not_a_table_uses_defaults() {
    let table = parse("settings = 5\n");
    let settings = Settings::resolve(&table, no_env);
    assert_eq!(settings.min_sentence_length, 6);
    assert!(settings.enabled);
}

#[test]
fn test_microsoft_without_credentials_disables() {
    let table = parse(
        r#"
        [settings]
        provider = "microsoft"
        [microsoft]
        client_id = "abc"
    "#,
    );
    let settings = Settings::resolve(&table, no_env);
    assert_eq!(settings.provider, ProviderKind::Microsoft);
    assert!(!settings.enabled);
    assert!(matches!(
        settings.ensure_enabled(),
        Err(PolyglotError::MisconfiguredProvider(_))
    ));
}

#[test]
fn test_microsoft_credentials_complete() {
    let table = parse(
        r#"
        [settings]
        provider = "microsoft"
        [microsoft]
        client_id = "abc"
        client_secret = "s3cret"
    "#,
    );
    let settings = Settings::resolve(&table, no_env);
    assert!(settings.enabled);
    assert!(settings.ensure_enabled().is_ok());
    assert!(!format!("{:?}", settings.microsoft).contains("s3cret"));
}

#[test]
fn test_microsoft_credentials_from_env() {
    let table = parse("[settings]\nprovider = \"microsoft\"\n");
    let env = |key: &str| match key {
        ENV_MS_CLIENT_ID => Some("env-id".to_string()),
        ENV_MS_CLIENT_SECRET => Some("env-secret".to_string()),
        _ => None,
    };
    let settings = Settings::resolve(&table, env);
    assert!(settings.enabled);
    assert_eq!(settings.microsoft.client_id, "env-id");
    assert_eq!(settings.microsoft.client_secret, "env-secret");
}

#[test]
fn test_google_ignores_missing_credentials() {
    let settings = Settings::resolve(&parse("[settings]\nprovider = \"google\"\n"), no_env);
    assert!(settings.enabled);
}

#[test]
fn test_inline_dispatch_forces_shared_policy() {
    let table = parse("[settings]\ndispatch = \"inline\"\nauto_translate = \"per_client\"\n");
    let settings = Settings::resolve(&table, no_env);
    assert_eq!(settings.effective_auto_translate(), AutoTranslatePolicy::Shared);

    let table = parse("[settings]\nauto_translate = \"per_client\"\n");
    let settings = Settings::resolve(&table, no_env);
    assert_eq!(
        settings.effective_auto_translate(),
        AutoTranslatePolicy::PerClient
    );
}

#[test]
fn test_general_and_console_sections() {
    let table = parse(
        r##"
        [polyglot]
        log_level = "debug"
        log_file = "/tmp/polyglot.log"

        [console]
        command_prefixes = ["!", "#"]
    "##,
    );
    let cfg = Config::from_table(&table);
    assert_eq!(cfg.polyglot.log_level, "debug");
    assert_eq!(cfg.polyglot.log_file.as_deref(), Some("/tmp/polyglot.log"));
    assert_eq!(cfg.console.command_prefixes, vec!['!', '#']);
}

#[test]
fn test_malformed_console_section_falls_back() {
    let cfg = Config::from_table(&parse("[console]\ncommand_prefixes = \"!\"\n"));
    assert_eq!(cfg.console.command_prefixes, vec!['!', '@', '&', '/']);
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let cfg = load("/nonexistent/__polyglot_test__/config.toml").unwrap();
    assert_eq!(cfg.polyglot.log_level, "info");
    assert_eq!(cfg.settings.min_sentence_length, 6);
}

#[test]
fn test_load_rejects_invalid_toml() {
    let path = std::env::temp_dir().join(format!(
        "__polyglot_bad_config_{}__.toml",
        std::process::id()
    ));
    std::fs::write(&path, "[settings\nmin_sentence_length = ").unwrap();
    let result = load(path.to_str().unwrap());
    let _ = std::fs::remove_file(&path);
    assert!(matches!(result, Err(PolyglotError::Config(_))));
}
