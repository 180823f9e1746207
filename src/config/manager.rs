use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::chat::{ChatbotProfile, FailureMode};
use crate::llm::{GenerateOptions, MAX_RETRIES};
use crate::paths;
use crate::translation::{Language, validate_language};

const DEFAULT_TOKEN_ENV: &str = "DISCORD_BOT_TOKEN";
const DEFAULT_PREFIX: &str = "!";
const DEFAULT_LANGUAGE: &str = "Japanese";
const DEFAULT_CACHE_CAPACITY: usize = 100;
const DEFAULT_MAX_NAME_LENGTH: usize = 100;
const DEFAULT_MAX_REQUESTS: usize = 50;
const MAX_CACHE_CAPACITY: usize = 100_000;
const MAX_REQUESTS_LIMIT: usize = 10_000;
const DEFAULT_WINDOW_SECONDS: u64 = 60;
const DEFAULT_BOT_NAME: &str = "Leo";
const DEFAULT_PERSONALITY: &str = "You are friendly, helpful and concise.";
const DEFAULT_MAX_HISTORY: usize = 20;
const DEFAULT_FAILURE_MESSAGE: &str =
    "I'm having trouble thinking right now. Can you try again in a moment?";

/// `[bot]` section: Discord connection and channel routing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BotConfig {
    /// Token stored directly in config (not recommended).
    #[serde(default)]
    pub token: Option<String>,
    /// Environment variable containing the token. Defaults to `DISCORD_BOT_TOKEN`.
    #[serde(default)]
    pub token_env: Option<String>,
    /// Only events from this guild are handled when set.
    #[serde(default)]
    pub guild_id: Option<u64>,
    #[serde(default)]
    pub command_prefix: Option<String>,
    #[serde(default)]
    pub welcome_channel_id: Option<u64>,
    #[serde(default)]
    pub goodbye_channel_id: Option<u64>,
}

/// `[translation]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslationConfig {
    /// Target language, ISO code or English name.
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub cache_capacity: Option<usize>,
    #[serde(default)]
    pub max_name_length: Option<usize>,
}

/// `[rate_limit]` section, shared by every LLM call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default)]
    pub max_requests: Option<usize>,
    #[serde(default)]
    pub window_seconds: Option<u64>,
}

/// `[chatbot]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatbotConfig {
    #[serde(default)]
    pub bot_name: Option<String>,
    #[serde(default)]
    pub personality: Option<String>,
    /// Turns kept per channel.
    #[serde(default)]
    pub max_history: Option<usize>,
    /// Channels enabled at startup.
    #[serde(default)]
    pub channels: Vec<u64>,
    #[serde(default)]
    pub on_failure: Option<FailureMode>,
    #[serde(default)]
    pub failure_message: Option<String>,
}

/// Configuration for an LLM provider.
///
/// Each provider has an endpoint and optional API key settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// The OpenAI-compatible API base URL (requests go to `<endpoint>/chat/completions`).
    pub endpoint: String,
    /// API key stored directly in config (not recommended).
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// List of available models for this provider.
    #[serde(default)]
    pub models: Vec<String>,
}

impl ProviderConfig {
    /// Gets the API key, preferring environment variable over config file.
    pub fn get_api_key(&self) -> Option<String> {
        read_env(self.api_key_env.as_deref()).or_else(|| self.api_key.clone())
    }

    /// Returns `true` if this provider requires an API key.
    pub const fn requires_api_key(&self) -> bool {
        self.api_key.is_some() || self.api_key_env.is_some()
    }
}

/// `[features.<name>]`: which provider and model a bot feature uses.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureConfig {
    pub provider: String,
    pub model: String,
    /// Feature-specific key, so features can draw on separate quotas.
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub retries: Option<u8>,
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/nickbot/config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub chatbot: ChatbotConfig,
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Feature profiles keyed by feature name.
    #[serde(default)]
    pub features: HashMap<String, FeatureConfig>,
}

/// Bot features that talk to an LLM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Welcome,
    Goodbye,
    Translation,
    Chat,
}

impl Feature {
    pub const ALL: [Self; 4] = [Self::Welcome, Self::Goodbye, Self::Translation, Self::Chat];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Goodbye => "goodbye",
            Self::Translation => "translation",
            Self::Chat => "chat",
        }
    }

    const fn default_max_tokens(self) -> u32 {
        match self {
            Self::Welcome | Self::Goodbye => 150,
            Self::Translation => 50,
            Self::Chat => 200,
        }
    }

    const fn default_timeout_seconds(self) -> u64 {
        match self {
            Self::Chat => 15,
            _ => 10,
        }
    }
}

/// LLM options for every configured feature; `None` means the feature runs
/// without a model (canned greetings, no nickname translation, no chatbot).
#[derive(Debug, Clone, Default)]
pub struct FeatureProfiles {
    pub welcome: Option<GenerateOptions>,
    pub goodbye: Option<GenerateOptions>,
    pub translation: Option<GenerateOptions>,
    pub chat: Option<GenerateOptions>,
}

impl FeatureProfiles {
    pub const fn get(&self, feature: Feature) -> Option<&GenerateOptions> {
        match feature {
            Feature::Welcome => self.welcome.as_ref(),
            Feature::Goodbye => self.goodbye.as_ref(),
            Feature::Translation => self.translation.as_ref(),
            Feature::Chat => self.chat.as_ref(),
        }
    }

    fn slot(&mut self, feature: Feature) -> &mut Option<GenerateOptions> {
        match feature {
            Feature::Welcome => &mut self.welcome,
            Feature::Goodbye => &mut self.goodbye,
            Feature::Translation => &mut self.translation,
            Feature::Chat => &mut self.chat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSettings {
    pub max_requests: usize,
    pub window: Duration,
}

#[derive(Debug, Clone)]
pub struct ChatbotSettings {
    pub profile: ChatbotProfile,
    pub max_history: NonZeroUsize,
    pub channels: Vec<u64>,
}

/// Immutable, validated configuration shared by every component.
#[derive(Clone)]
pub struct Settings {
    pub discord_token: Option<String>,
    pub token_env: String,
    pub guild_id: Option<u64>,
    pub command_prefix: String,
    pub welcome_channel_id: Option<u64>,
    pub goodbye_channel_id: Option<u64>,
    pub language: &'static Language,
    pub cache_capacity: NonZeroUsize,
    pub max_name_length: usize,
    pub rate_limit: RateLimitSettings,
    pub chatbot: ChatbotSettings,
    pub features: FeatureProfiles,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("discord_token", &self.discord_token.as_ref().map(|_| "<redacted>"))
            .field("guild_id", &self.guild_id)
            .field("command_prefix", &self.command_prefix)
            .field("welcome_channel_id", &self.welcome_channel_id)
            .field("goodbye_channel_id", &self.goodbye_channel_id)
            .field("language", &self.language.name)
            .field("cache_capacity", &self.cache_capacity)
            .field("max_name_length", &self.max_name_length)
            .field("rate_limit", &self.rate_limit)
            .field("chatbot", &self.chatbot)
            .field("features", &self.features)
            .finish()
    }
}

/// Options for resolving configuration.
///
/// Contains CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Target language override.
    pub language: Option<String>,
}

/// Validates the config file once and produces the settings every component
/// is built from.
///
/// # Errors
///
/// Returns an error for zero-sized bounds, unknown languages, features or
/// providers, and providers whose required API key is missing.
pub fn resolve_settings(options: &ResolveOptions, config_file: &ConfigFile) -> Result<Settings> {
    let bot = &config_file.bot;
    let token_env = bot
        .token_env
        .clone()
        .unwrap_or_else(|| DEFAULT_TOKEN_ENV.to_string());
    let discord_token = read_env(Some(&token_env)).or_else(|| bot.token.clone());

    let command_prefix = bot
        .command_prefix
        .clone()
        .unwrap_or_else(|| DEFAULT_PREFIX.to_string());
    if command_prefix.trim().is_empty() {
        bail!("Invalid configuration: 'bot.command_prefix' must not be empty");
    }

    // Resolve language
    let language_input = options
        .language
        .as_deref()
        .or(config_file.translation.language.as_deref())
        .unwrap_or(DEFAULT_LANGUAGE);
    let language = validate_language(language_input)?;

    let cache_capacity = bounded(
        "translation.cache_capacity",
        config_file
            .translation
            .cache_capacity
            .unwrap_or(DEFAULT_CACHE_CAPACITY),
        MAX_CACHE_CAPACITY,
    )?;
    let max_name_length = non_zero(
        "translation.max_name_length",
        config_file
            .translation
            .max_name_length
            .unwrap_or(DEFAULT_MAX_NAME_LENGTH),
    )?
    .get();

    let window_seconds = config_file
        .rate_limit
        .window_seconds
        .unwrap_or(DEFAULT_WINDOW_SECONDS);
    if window_seconds == 0 {
        bail!("Invalid configuration: 'rate_limit.window_seconds' must be greater than 0");
    }
    let rate_limit = RateLimitSettings {
        max_requests: bounded(
            "rate_limit.max_requests",
            config_file
                .rate_limit
                .max_requests
                .unwrap_or(DEFAULT_MAX_REQUESTS),
            MAX_REQUESTS_LIMIT,
        )?
        .get(),
        window: Duration::from_secs(window_seconds),
    };

    let chatbot = resolve_chatbot(&config_file.chatbot)?;
    let features = resolve_features(config_file)?;

    Ok(Settings {
        discord_token,
        token_env,
        guild_id: bot.guild_id,
        command_prefix,
        welcome_channel_id: bot.welcome_channel_id,
        goodbye_channel_id: bot.goodbye_channel_id,
        language,
        cache_capacity,
        max_name_length,
        rate_limit,
        chatbot,
        features,
    })
}

fn resolve_chatbot(config: &ChatbotConfig) -> Result<ChatbotSettings> {
    Ok(ChatbotSettings {
        profile: ChatbotProfile {
            bot_name: config
                .bot_name
                .clone()
                .unwrap_or_else(|| DEFAULT_BOT_NAME.to_string()),
            personality: config
                .personality
                .clone()
                .unwrap_or_else(|| DEFAULT_PERSONALITY.to_string()),
            failure_mode: config.on_failure.unwrap_or_default(),
            failure_message: config
                .failure_message
                .clone()
                .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
        },
        max_history: non_zero(
            "chatbot.max_history",
            config.max_history.unwrap_or(DEFAULT_MAX_HISTORY),
        )?,
        channels: config.channels.clone(),
    })
}

fn resolve_features(config_file: &ConfigFile) -> Result<FeatureProfiles> {
    let mut profiles = FeatureProfiles::default();

    for name in config_file.features.keys() {
        if !Feature::ALL.iter().any(|f| f.as_str() == name) {
            bail!(
                "Unknown feature '{name}' in [features]\n\n\
                 Known features: welcome, goodbye, translation, chat"
            );
        }
    }

    for feature in Feature::ALL {
        let Some(feature_config) = config_file.features.get(feature.as_str()) else {
            continue;
        };
        *profiles.slot(feature) = Some(resolve_feature(feature, feature_config, config_file)?);
    }

    Ok(profiles)
}

fn resolve_feature(
    feature: Feature,
    config: &FeatureConfig,
    config_file: &ConfigFile,
) -> Result<GenerateOptions> {
    let name = feature.as_str();
    let provider_name = &config.provider;

    // Get provider config
    let provider = config_file.providers.get(provider_name).ok_or_else(|| {
        let available: Vec<_> = config_file.providers.keys().map(String::as_str).collect();
        if available.is_empty() {
            anyhow::anyhow!(
                "Provider '{provider_name}' for feature '{name}' not found\n\n\
                 No providers configured. Add [providers.<name>] to the config file"
            )
        } else {
            anyhow::anyhow!(
                "Provider '{provider_name}' for feature '{name}' not found\n\n\
                 Available providers:\n  \
                 - {}",
                available.join("\n  - ")
            )
        }
    })?;

    if config.model.trim().is_empty() {
        bail!("Missing required configuration: 'features.{name}.model'");
    }

    // Warn if model is not in provider's models list
    if !provider.models.is_empty() && !provider.models.contains(&config.model) {
        warn!(
            feature = name,
            model = %config.model,
            provider = %provider_name,
            "Model is not in the provider's configured models list, proceeding anyway"
        );
    }

    let api_key = read_env(config.api_key_env.as_deref()).or_else(|| provider.get_api_key());

    // Check if API key is required but missing
    if (provider.requires_api_key() || config.api_key_env.is_some()) && api_key.is_none() {
        let env_var = config
            .api_key_env
            .as_deref()
            .or(provider.api_key_env.as_deref())
            .unwrap_or("API_KEY");
        bail!(
            "Feature '{name}' (provider '{provider_name}') requires an API key\n\n\
             Set the {env_var} environment variable:\n  \
             export {env_var}=\"your-api-key\"\n\n\
             Or set api_key under [providers.{provider_name}]"
        );
    }

    let retries = config.retries.unwrap_or(1);
    if retries > MAX_RETRIES {
        warn!(
            feature = name,
            retries,
            max = MAX_RETRIES,
            "Retry count capped"
        );
    }

    Ok(GenerateOptions {
        endpoint: provider.endpoint.clone(),
        model: config.model.clone(),
        api_key,
        max_tokens: config
            .max_tokens
            .unwrap_or_else(|| feature.default_max_tokens()),
        timeout: Duration::from_secs(
            config
                .timeout_seconds
                .unwrap_or_else(|| feature.default_timeout_seconds())
                .max(1),
        ),
        retries: retries.min(MAX_RETRIES),
    })
}

fn non_zero(key: &str, value: usize) -> Result<NonZeroUsize> {
    NonZeroUsize::new(value)
        .ok_or_else(|| anyhow::anyhow!("Invalid configuration: '{key}' must be greater than 0"))
}

/// Like [`non_zero`], with an upper limit for values that size allocations.
fn bounded(key: &str, value: usize, max: usize) -> Result<NonZeroUsize> {
    if value > max {
        bail!("Invalid configuration: '{key}' must be at most {max}, got {value}");
    }
    non_zero(key, value)
}

fn read_env(var: Option<&str>) -> Option<String> {
    var.and_then(|name| std::env::var(name).ok())
        .filter(|value| !value.is_empty())
}

/// Locates and loads the configuration file.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a config manager for the default location.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/nickbot/config.toml`
    /// or `~/.config/nickbot/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Self {
        Self {
            config_path: paths::config_dir().join("config.toml"),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile = toml::from_str(&contents).with_context(|| {
            format!("Failed to parse config file: {}", self.config_path.display())
        })?;

        Ok(config_file)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
