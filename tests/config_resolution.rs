#![allow(clippy::unwrap_used)]
//! Config resolution contract tests.
//!
//! These tests verify how the config file turns into validated settings.
//! Priority order (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (API keys, bot token)
//! 3. Config file values
//! 4. Built-in defaults

use nickbot::bot::AppContext;
use nickbot::chat::FailureMode;
use nickbot::config::{ConfigFile, ConfigManager, ResolveOptions, resolve_settings};
use std::time::Duration;
use tempfile::TempDir;

const FULL_CONFIG: &str = r#"
[bot]
token_env = "NICKBOT_IT_UNSET_TOKEN"
guild_id = 1111
command_prefix = "?"
welcome_channel_id = 2222
goodbye_channel_id = 3333

[translation]
language = "Japanese"
cache_capacity = 5
max_name_length = 40

[rate_limit]
max_requests = 5
window_seconds = 10

[chatbot]
bot_name = "Leo"
personality = "You are cheerful."
max_history = 6
channels = [10, 20]
on_failure = "silent"

[providers.groq]
endpoint = "https://api.groq.com/openai/v1"
api_key = "inline-key"
models = ["llama-3.3-70b-versatile"]

[features.welcome]
provider = "groq"
model = "llama-3.3-70b-versatile"

[features.goodbye]
provider = "groq"
model = "llama-3.3-70b-versatile"
max_tokens = 80

[features.translation]
provider = "groq"
model = "llama-3.3-70b-versatile"
retries = 2

[features.chat]
provider = "groq"
model = "llama-3.3-70b-versatile"
timeout_seconds = 30
"#;

fn parse(toml: &str) -> ConfigFile {
    toml::from_str(toml).unwrap()
}

#[test]
fn test_full_config_resolves() {
    let settings = resolve_settings(&ResolveOptions::default(), &parse(FULL_CONFIG)).unwrap();

    assert_eq!(settings.discord_token, None);
    assert_eq!(settings.guild_id, Some(1111));
    assert_eq!(settings.command_prefix, "?");
    assert_eq!(settings.welcome_channel_id, Some(2222));
    assert_eq!(settings.goodbye_channel_id, Some(3333));
    assert_eq!(settings.language.code, "ja");
    assert_eq!(settings.cache_capacity.get(), 5);
    assert_eq!(settings.max_name_length, 40);
    assert_eq!(settings.rate_limit.max_requests, 5);
    assert_eq!(settings.rate_limit.window, Duration::from_secs(10));
    assert_eq!(settings.chatbot.max_history.get(), 6);
    assert_eq!(settings.chatbot.channels, vec![10, 20]);
    assert_eq!(settings.chatbot.profile.failure_mode, FailureMode::Silent);

    let goodbye = settings.features.goodbye.as_ref().unwrap();
    assert_eq!(goodbye.max_tokens, 80);
    assert_eq!(goodbye.api_key.as_deref(), Some("inline-key"));

    let translation = settings.features.translation.as_ref().unwrap();
    assert_eq!(translation.retries, 2);
    assert_eq!(translation.timeout, Duration::from_secs(10));

    let chat = settings.features.chat.as_ref().unwrap();
    assert_eq!(chat.timeout, Duration::from_secs(30));
}

#[test]
fn test_cli_language_overrides_config() {
    let options = ResolveOptions {
        language: Some("ko".to_string()),
    };
    let settings = resolve_settings(&options, &parse(FULL_CONFIG)).unwrap();
    assert_eq!(settings.language.name, "Korean");
}

#[test]
fn test_empty_config_uses_defaults_and_no_features() {
    let settings = resolve_settings(&ResolveOptions::default(), &parse("")).unwrap();

    assert_eq!(settings.language.name, "Japanese");
    assert_eq!(settings.command_prefix, "!");
    assert_eq!(settings.chatbot.profile.bot_name, "Leo");
    assert!(settings.features.welcome.is_none());
    assert!(settings.features.goodbye.is_none());
    assert!(settings.features.translation.is_none());
    assert!(settings.features.chat.is_none());
}

#[test]
fn test_invalid_values_rejected() {
    let cases = [
        ("[translation]\nlanguage = \"Klingon\"", "Invalid language"),
        ("[rate_limit]\nmax_requests = 0", "max_requests"),
        ("[translation]\nmax_name_length = 0", "max_name_length"),
        ("[bot]\ncommand_prefix = \" \"", "command_prefix"),
        (
            "[features.translation]\nprovider = \"nowhere\"\nmodel = \"m\"",
            "No providers configured",
        ),
    ];

    for (toml, expected) in cases {
        let err = resolve_settings(&ResolveOptions::default(), &parse(toml)).unwrap_err();
        assert!(
            err.to_string().contains(expected),
            "expected '{expected}' in error for {toml:?}, got: {err}"
        );
    }
}

#[test]
fn test_empty_model_rejected() {
    let toml = r#"
[providers.local]
endpoint = "http://localhost:11434/v1"

[features.chat]
provider = "local"
model = " "
"#;
    let err = resolve_settings(&ResolveOptions::default(), &parse(toml)).unwrap_err();
    assert!(err.to_string().contains("features.chat.model"));
}

#[test]
fn test_config_manager_loads_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, FULL_CONFIG).unwrap();
    let manager = ConfigManager::with_path(&path);

    let loaded = manager.load().unwrap();

    let settings = resolve_settings(&ResolveOptions::default(), &loaded).unwrap();
    assert_eq!(settings.guild_id, Some(1111));
    assert!(settings.features.chat.is_some());
}

#[test]
fn test_allocation_sizes_have_upper_bound() {
    let cases = [
        (
            "[rate_limit]\nmax_requests = 9223372036854775807",
            "'rate_limit.max_requests' must be at most",
        ),
        (
            "[translation]\ncache_capacity = 9223372036854775807",
            "'translation.cache_capacity' must be at most",
        ),
    ];

    for (toml, expected) in cases {
        let err = resolve_settings(&ResolveOptions::default(), &parse(toml)).unwrap_err();
        assert!(
            err.to_string().contains(expected),
            "expected '{expected}' in error for {toml:?}, got: {err}"
        );
    }
}

#[test]
fn test_largest_accepted_limits_build_context() {
    let toml = "[rate_limit]\nmax_requests = 10000\n\n[translation]\ncache_capacity = 100000";
    let settings = resolve_settings(&ResolveOptions::default(), &parse(toml)).unwrap();

    let app = AppContext::new(settings);

    assert_eq!(app.settings().rate_limit.max_requests, 10_000);
    assert_eq!(app.llm_stats().unwrap().total, 0);
}

#[test]
fn test_malformed_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[bot\nguild_id = ").unwrap();

    let err = ConfigManager::with_path(&path).load().unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}
