//! Bounded in-memory cache of verified name translations.

mod memory;

pub use memory::{CacheKey, CacheStats, TranslationCache, normalize_name};
