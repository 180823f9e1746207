//! Configuration file loading and resolution into validated [`Settings`].

mod manager;

pub use manager::{
    BotConfig, ChatbotConfig, ChatbotSettings, ConfigFile, ConfigManager, Feature, FeatureConfig,
    FeatureProfiles, ProviderConfig, RateLimitConfig, RateLimitSettings, ResolveOptions, Settings,
    TranslationConfig, resolve_settings,
};
