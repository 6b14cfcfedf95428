//! Cached access to the keyword dictionary.

use std::time::Duration;

use kwlink_cache::{CacheBucket, CacheBucketExt};
use kwlink_store::DocumentStore;

use crate::dictionary::Dictionary;

/// Cache key the dictionary is stored under.
pub const DICTIONARY_CACHE_KEY: &str = "keyword_dictionary";

/// Default lifetime of a cached dictionary.
pub const DEFAULT_DICTIONARY_TTL: Duration = Duration::from_secs(3600);

/// Serves the keyword dictionary from a cache bucket, rebuilding it from the
/// document store on a miss.
///
/// The returned [`Dictionary`] is an owned copy; callers filter it per
/// document without affecting the cached value.
pub struct DictionaryProvider<'a> {
    store: &'a dyn DocumentStore,
    cache: Box<dyn CacheBucket>,
    ttl: Duration,
}

impl<'a> DictionaryProvider<'a> {
    /// Create a provider with the default TTL.
    #[must_use]
    pub fn new(store: &'a dyn DocumentStore, cache: Box<dyn CacheBucket>) -> Self {
        Self {
            store,
            cache,
            ttl: DEFAULT_DICTIONARY_TTL,
        }
    }

    /// Set the lifetime of cached dictionaries.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Cached dictionary, or a freshly built one on a miss.
    ///
    /// A store failure yields an empty dictionary, which is not cached.
    pub fn dictionary(&self) -> Dictionary {
        if let Some(dictionary) = self.cache.get_json::<Dictionary>(DICTIONARY_CACHE_KEY) {
            tracing::debug!(entries = dictionary.len(), "keyword dictionary cache hit");
            return dictionary;
        }

        tracing::debug!("keyword dictionary cache miss");
        match self.rebuild() {
            Some(dictionary) => {
                self.cache
                    .set_json(DICTIONARY_CACHE_KEY, &dictionary, self.ttl);
                dictionary
            }
            None => Dictionary::default(),
        }
    }

    /// Build the dictionary from the store, bypassing the cache.
    ///
    /// Returns `None` when the store cannot be read.
    pub fn rebuild(&self) -> Option<Dictionary> {
        match self.store.documents() {
            Ok(documents) => {
                let dictionary = Dictionary::build(&documents);
                tracing::debug!(
                    documents = documents.len(),
                    entries = dictionary.len(),
                    "built keyword dictionary"
                );
                Some(dictionary)
            }
            Err(e) => {
                tracing::warn!("failed to read documents for keyword dictionary: {e}");
                None
            }
        }
    }

    /// Drop the cached dictionary so the next lookup rebuilds it.
    pub fn invalidate(&self) {
        self.cache.remove(DICTIONARY_CACHE_KEY);
        tracing::debug!("keyword dictionary cache invalidated");
    }
}
