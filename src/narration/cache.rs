/*!
 * Synthesis caching functionality.
 *
 * This module provides an in-memory cache for synthesis results so repeated
 * chunks (identical headings, boilerplate paragraphs) are not sent to the
 * engine twice within one run.
 */

use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::RwLock;
use log::debug;

use crate::engine::SynthesisResult;

/// Cache key combining the voice and the audio-bound text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    /// Voice identifier
    voice: String,

    /// Audio-bound text sent to the engine
    text: String,
}

impl CacheKey {
    /// Create a new cache key
    pub fn new(voice: &str, text: &str) -> Self {
        Self {
            voice: voice.to_string(),
            text: text.to_string(),
        }
    }
}

/// Synthesis cache for storing and retrieving engine results
pub struct SynthesisCache {
    /// Internal cache storage
    cache: Arc<RwLock<HashMap<CacheKey, SynthesisResult>>>,

    /// Cache hit counter
    hits: Arc<RwLock<usize>>,

    /// Cache miss counter
    misses: Arc<RwLock<usize>>,

    /// Whether caching is enabled
    enabled: bool,
}

impl SynthesisCache {
    /// Create a new synthesis cache
    pub fn new(enabled: bool) -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            hits: Arc::new(RwLock::new(0)),
            misses: Arc::new(RwLock::new(0)),
            enabled,
        }
    }

    /// Get a synthesis result from the cache
    pub fn get(&self, voice: &str, text: &str) -> Option<SynthesisResult> {
        if !self.enabled {
            return None;
        }

        let key = CacheKey::new(voice, text);
        let cache = self.cache.read();

        match cache.get(&key) {
            Some(result) => {
                let mut hits = self.hits.write();
                *hits += 1;

                debug!("Cache hit for '{}' ({})", truncate_text(text, 30), voice);

                Some(result.clone())
            }
            None => {
                let mut misses = self.misses.write();
                *misses += 1;

                debug!("Cache miss for '{}' ({})", truncate_text(text, 30), voice);

                None
            }
        }
    }

    /// Store a synthesis result in the cache
    pub fn store(&self, voice: &str, text: &str, result: &SynthesisResult) {
        if !self.enabled {
            return;
        }

        let key = CacheKey::new(voice, text);
        let mut cache = self.cache.write();

        cache.insert(key, result.clone());

        debug!("Cached synthesis for '{}' ({})", truncate_text(text, 30), voice);
    }

    /// Get cache statistics
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = *self.hits.read();
        let misses = *self.misses.read();
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }
}

impl Default for SynthesisCache {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Truncate text for log lines
fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{}…", truncated)
    }
}
