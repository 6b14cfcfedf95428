//! Extension trait for [`CacheBucket`] with typed convenience methods.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::CacheBucket;

/// Typed convenience methods for [`CacheBucket`].
///
/// Provides `get_json`/`set_json` for serde-serializable types. These are
/// default methods on an extension trait so that [`CacheBucket`] stays
/// object-safe and implementors only handle raw bytes.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use kwlink_cache::{Cache, CacheBucketExt, MemoryCache};
///
/// let cache = MemoryCache::new();
/// let bucket = cache.bucket("dictionary");
///
/// bucket.set_json("words", &vec!["shop".to_owned()], Duration::from_secs(60));
/// let words: Option<Vec<String>> = bucket.get_json("words");
/// assert_eq!(words, Some(vec!["shop".to_owned()]));
/// ```
pub trait CacheBucketExt: CacheBucket {
    /// Retrieve a JSON-deserialized value from the cache.
    ///
    /// Returns `None` on cache miss, expiry, or deserialization failure.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = self.get(key)?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!("discarding undecodable cache entry {key}: {e}");
                None
            }
        }
    }

    /// Store a value as JSON in the cache.
    ///
    /// Silently does nothing if serialization fails.
    fn set_json<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        if let Ok(bytes) = serde_json::to_vec(value) {
            self.set(key, &bytes, ttl);
        }
    }
}

impl<B: CacheBucket + ?Sized> CacheBucketExt for B {}
