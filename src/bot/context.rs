use std::sync::Arc;
use tracing::info;

use crate::chat::{Chatbot, HistoryStore};
use crate::config::{Feature, Settings};
use crate::llm::{GenerateOptions, LlmClient, LlmStats, RateLimiter, TextGenerator};
use crate::translation::Translator;

/// Everything event handlers share, built once at startup from [`Settings`].
///
/// Components whose feature has no model configured are left out: without a
/// translation profile members keep their names, without a chat profile the
/// chatbot commands report that it is unavailable.
pub struct AppContext {
    settings: Settings,
    generator: Arc<dyn TextGenerator>,
    llm: Option<Arc<LlmClient>>,
    translator: Option<Translator>,
    chatbot: Option<Chatbot>,
}

impl AppContext {
    /// Wires the real HTTP client and the shared rate limiter.
    pub fn new(settings: Settings) -> Self {
        let limiter = Arc::new(RateLimiter::new(
            settings.rate_limit.max_requests,
            settings.rate_limit.window,
        ));
        let llm = Arc::new(LlmClient::new(limiter));
        let generator: Arc<dyn TextGenerator> = Arc::<LlmClient>::clone(&llm);

        let mut context = Self::with_generator(settings, generator);
        context.llm = Some(llm);
        context
    }

    /// Builds the context around any generator; no usage statistics are kept.
    pub fn with_generator(settings: Settings, generator: Arc<dyn TextGenerator>) -> Self {
        let translator = settings.features.translation.clone().map(|options| {
            Translator::new(
                Arc::clone(&generator),
                options,
                settings.language,
                settings.cache_capacity,
                settings.max_name_length,
            )
        });

        let chatbot = settings.features.chat.clone().map(|options| {
            Chatbot::new(
                Arc::clone(&generator),
                options,
                settings.chatbot.profile.clone(),
                HistoryStore::new(settings.chatbot.max_history),
                settings.chatbot.channels.iter().copied(),
            )
        });

        for feature in Feature::ALL {
            info!(
                feature = feature.as_str(),
                enabled = settings.features.get(feature).is_some(),
                "Feature configured"
            );
        }

        Self {
            settings,
            generator,
            llm: None,
            translator,
            chatbot,
        }
    }

    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    pub const fn translator(&self) -> Option<&Translator> {
        self.translator.as_ref()
    }

    pub const fn chatbot(&self) -> Option<&Chatbot> {
        self.chatbot.as_ref()
    }

    pub fn generator(&self) -> &dyn TextGenerator {
        self.generator.as_ref()
    }

    pub const fn feature(&self, feature: Feature) -> Option<&GenerateOptions> {
        self.settings.features.get(feature)
    }

    pub fn llm_stats(&self) -> Option<LlmStats> {
        self.llm.as_ref().map(|llm| llm.stats())
    }

    /// Logs final statistics. HTTP connections close when the context drops.
    pub fn shutdown(&self) {
        if let Some(stats) = self.llm_stats() {
            info!(
                total = stats.total,
                successful = stats.successful,
                failed = stats.failed,
                last_error = stats.last_error.as_deref().unwrap_or("none"),
                "LLM usage at shutdown"
            );
        }
        if let Some(translator) = &self.translator {
            let cache = translator.cache_stats();
            info!(
                entries = translator.cached_entries(),
                hits = cache.hits,
                misses = cache.misses,
                evictions = cache.evictions,
                "Translation cache at shutdown"
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{ConfigFile, ResolveOptions, resolve_settings};

    #[test]
    fn test_new_shares_one_client_for_stats() {
        let settings =
            resolve_settings(&ResolveOptions::default(), &ConfigFile::default()).unwrap();

        let app = AppContext::new(settings);

        assert_eq!(app.llm_stats(), Some(LlmStats::default()));
        assert!(app.translator().is_none());
        assert!(app.chatbot().is_none());
        app.shutdown();
    }
}
