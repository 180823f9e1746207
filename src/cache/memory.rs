use lru::LruCache;
use std::num::NonZeroUsize;
use tracing::debug;

/// Collapses runs of whitespace into single spaces and trims the ends.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cache key: normalized source text plus target language code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub source: String,
    pub language: String,
}

impl CacheKey {
    pub fn new(source: &str, language: &str) -> Self {
        Self {
            source: normalize_name(source),
            language: language.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// Least-recently-used map of translations with a fixed capacity.
///
/// Not synchronized; the owner wraps it in a lock together with whatever
/// other state must change in the same step.
pub struct TranslationCache {
    entries: LruCache<CacheKey, String>,
    stats: CacheStats,
}

impl TranslationCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
            stats: CacheStats::default(),
        }
    }

    /// Returns the cached value and marks it most recently used.
    pub fn get(&mut self, key: &CacheKey) -> Option<String> {
        let hit = self.entries.get(key).cloned();
        if hit.is_some() {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
        }
        hit
    }

    /// Inserts a value, returning the key evicted to make room, if any.
    pub fn put(&mut self, key: CacheKey, value: String) -> Option<CacheKey> {
        match self.entries.push(key, value) {
            // push also returns the old pair when the key was already present
            Some((evicted, _)) if !self.entries.contains(&evicted) => {
                self.stats.evictions += 1;
                debug!(source = %evicted.source, language = %evicted.language, "Evicted translation");
                Some(evicted)
            }
            _ => None,
        }
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub const fn stats(&self) -> CacheStats {
        self.stats
    }
}
