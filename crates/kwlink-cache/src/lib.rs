//! Cache abstraction layer for kwlink.
//!
//! This crate provides generic caching traits that decouple cache consumers
//! (the keyword dictionary provider) from the underlying storage mechanism.
//! Two traits form the core API:
//!
//! - [`Cache`]: Factory for named cache buckets
//! - [`CacheBucket`]: Key-value store with time-to-live expiry
//!
//! # Implementations
//!
//! - [`NullCache`] / [`NullCacheBucket`]: No-op implementations (always miss)
//! - [`MemoryCache`]: Process-local implementation shared across bucket handles
//! - [`FileCache`]: File-based implementation with version validation
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use kwlink_cache::{Cache, NullCache};
//!
//! let cache = NullCache;
//! let bucket = cache.bucket("dictionary");
//! bucket.set("keyword_dictionary", b"{}", Duration::from_secs(3600));
//! assert_eq!(bucket.get("keyword_dictionary"), None); // NullCache always misses
//! ```

mod ext;
mod file;
mod memory;

use std::time::Duration;

pub use ext::CacheBucketExt;
pub use file::FileCache;
pub use memory::MemoryCache;

/// A named partition within a [`Cache`].
///
/// Each bucket stores key-value pairs that expire after a caller-chosen
/// time-to-live. An expired entry is indistinguishable from a missing one.
pub trait CacheBucket: Send + Sync {
    /// Retrieve a cached value.
    ///
    /// Returns `None` on cache miss or when the entry has expired.
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Store a value in the cache.
    ///
    /// Overwrites any existing entry for the same key. The entry expires
    /// `ttl` after this call; a zero `ttl` stores an already-expired entry.
    ///
    /// # Arguments
    ///
    /// * `key` - Cache key (e.g., `"keyword_dictionary"`)
    /// * `value` - Raw bytes to cache
    /// * `ttl` - Time-to-live of the entry
    fn set(&self, key: &str, value: &[u8], ttl: Duration);

    /// Remove an entry, if present.
    ///
    /// This is the manual invalidation trigger: the next `get` misses.
    fn remove(&self, key: &str);
}

/// Factory for named cache [`CacheBucket`]s.
///
/// A `Cache` produces buckets that are logically isolated from each other.
/// For example, a file-based cache stores each bucket in a separate
/// subdirectory.
pub trait Cache: Send + Sync {
    /// Open or create a named bucket.
    ///
    /// Calling `bucket` multiple times with the same name may return
    /// independent handles that share the same underlying storage.
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket>;
}

/// No-op [`CacheBucket`] that never stores or retrieves data.
///
/// Every `get` returns `None`; every `set` is silently discarded.
/// Used as the bucket type for [`NullCache`].
pub struct NullCacheBucket;

impl CacheBucket for NullCacheBucket {
    fn get(&self, _key: &str) -> Option<Vec<u8>> {
        None
    }

    fn set(&self, _key: &str, _value: &[u8], _ttl: Duration) {}

    fn remove(&self, _key: &str) {}
}

/// No-op [`Cache`] that always returns [`NullCacheBucket`]s.
///
/// Use when caching is disabled: the dictionary is then rebuilt on every
/// lookup.
pub struct NullCache;

impl Cache for NullCache {
    fn bucket(&self, _name: &str) -> Box<dyn CacheBucket> {
        Box::new(NullCacheBucket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn test_null_cache_always_misses() {
        let cache = NullCache;
        let bucket = cache.bucket("dictionary");

        assert_eq!(bucket.get("key"), None);

        // Setting a value and reading it back still returns None
        bucket.set("key", b"hello", HOUR);
        assert_eq!(bucket.get("key"), None);
    }

    #[test]
    fn test_null_cache_remove_is_noop() {
        let bucket = NullCache.bucket("dictionary");
        bucket.remove("missing");
        assert_eq!(bucket.get("missing"), None);
    }
}
