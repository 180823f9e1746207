use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

use super::language::{Language, is_in_native_script};
use super::prompt::build_name_prompt;
use super::transliterate::transliterate;
use crate::cache::{CacheKey, CacheStats, TranslationCache, normalize_name};
use crate::llm::{GenerateOptions, LlmError, TextGenerator};

/// Longest cleaned model answer kept as a name.
const MAX_RESPONSE_CHARS: usize = 32;

type SharedTranslation = Shared<BoxFuture<'static, Result<String, LlmError>>>;

struct State {
    cache: TranslationCache,
    in_flight: HashMap<CacheKey, SharedTranslation>,
}

/// Name translation with an LRU cache in front of the LLM and a
/// transliteration fallback behind it.
///
/// Concurrent misses for the same key share a single upstream request.
pub struct Translator {
    generator: Arc<dyn TextGenerator>,
    options: GenerateOptions,
    language: &'static Language,
    max_name_length: usize,
    state: Mutex<State>,
}

impl Translator {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        options: GenerateOptions,
        language: &'static Language,
        capacity: NonZeroUsize,
        max_name_length: usize,
    ) -> Self {
        Self {
            generator,
            options,
            language,
            max_name_length,
            state: Mutex::new(State {
                cache: TranslationCache::new(capacity),
                in_flight: HashMap::new(),
            }),
        }
    }

    /// The configured default target language.
    pub const fn language(&self) -> &'static Language {
        self.language
    }

    /// Translates into the configured default language.
    pub async fn translate_default(&self, name: &str) -> String {
        self.translate(name, self.language).await
    }

    /// Translates `name` into `language`. Never fails: on any upstream error
    /// the deterministic transliteration is returned instead, uncached.
    pub async fn translate(&self, name: &str, language: &Language) -> String {
        let normalized = normalize_name(name);
        if normalized.is_empty() {
            return name.to_string();
        }

        if is_in_native_script(&normalized, language) {
            debug!(name = %normalized, language = language.name, "Name already in target script");
            return name.to_string();
        }

        let source = truncate_chars(&normalized, self.max_name_length);
        let key = CacheKey::new(&source, language.code);

        let request = {
            let mut state = self.lock();
            if let Some(hit) = state.cache.get(&key) {
                debug!(name = %source, "Translation cache hit");
                return hit;
            }
            state
                .in_flight
                .entry(key.clone())
                .or_insert_with(|| self.start_request(&source, language))
                .clone()
        };

        let result = request.clone().await;

        let mut state = self.lock();
        if state
            .in_flight
            .get(&key)
            .is_some_and(|current| current.ptr_eq(&request))
        {
            state.in_flight.remove(&key);
        }

        match result {
            Ok(translated) => {
                state.cache.put(key, translated.clone());
                drop(state);
                info!(name = %source, translated = %translated, language = language.name, "Translated name");
                translated
            }
            Err(e) => {
                drop(state);
                let fallback = transliterate(&source, language);
                warn!(error = %e, name = %source, fallback = %fallback, "Translation failed, using transliteration");
                fallback
            }
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.lock().cache.stats()
    }

    pub fn cached_entries(&self) -> usize {
        self.lock().cache.len()
    }

    pub fn is_cached(&self, name: &str, language: &Language) -> bool {
        let source = truncate_chars(&normalize_name(name), self.max_name_length);
        self.lock()
            .cache
            .contains(&CacheKey::new(&source, language.code))
    }

    fn start_request(&self, source: &str, language: &Language) -> SharedTranslation {
        let generator = Arc::clone(&self.generator);
        let options = self.options.clone();
        let prompt = build_name_prompt(source, language.name);

        async move {
            let raw = generator.generate(&prompt, &options).await?;
            clean_name_response(&raw).ok_or_else(|| {
                LlmError::ProviderFailure("translation response contained no name".to_string())
            })
        }
        .boxed()
        .shared()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Reduces a model answer to the bare name it contains.
fn clean_name_response(raw: &str) -> Option<String> {
    let line = raw.lines().map(str::trim).find(|l| !l.is_empty())?;
    let mut name: String = line
        .chars()
        .filter(|c| !matches!(c, '"' | '\'' | '`' | '「' | '」'))
        .collect();

    if name.chars().count() > MAX_RESPONSE_CHARS
        && let Some(end) = name.find(['.', ',', '。', '、'])
    {
        name.truncate(end);
    }

    let name = truncate_chars(name.trim().trim_end_matches(['.', '。']), MAX_RESPONSE_CHARS);
    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
