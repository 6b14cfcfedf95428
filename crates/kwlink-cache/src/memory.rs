//! In-process cache implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::{Cache, CacheBucket};

type Entries = HashMap<(String, String), (Option<Instant>, Vec<u8>)>;

/// Process-local [`Cache`].
///
/// All bucket handles created from one `MemoryCache` (or its clones) share
/// the same storage, so a value set through one handle is visible through
/// another handle for the same bucket name. Entries are keyed by
/// `(bucket, key)`.
#[derive(Clone, Default)]
pub struct MemoryCache {
    entries: Arc<RwLock<Entries>>,
}

impl MemoryCache {
    /// Create an empty in-memory cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cache for MemoryCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        Box::new(MemoryCacheBucket {
            name: name.to_owned(),
            entries: Arc::clone(&self.entries),
        })
    }
}

struct MemoryCacheBucket {
    name: String,
    entries: Arc<RwLock<Entries>>,
}

impl MemoryCacheBucket {
    fn entry_key(&self, key: &str) -> (String, String) {
        (self.name.clone(), key.to_owned())
    }
}

impl CacheBucket for MemoryCacheBucket {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let entries = self.entries.read().ok()?;
        let (expires_at, value) = entries.get(&self.entry_key(key))?;
        // `None` means the deadline overflowed `Instant`; treat as never expiring.
        match expires_at {
            Some(deadline) if Instant::now() >= *deadline => None,
            _ => Some(value.clone()),
        }
    }

    fn set(&self, key: &str, value: &[u8], ttl: Duration) {
        let expires_at = Instant::now().checked_add(ttl);
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(self.entry_key(key), (expires_at, value.to_vec()));
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(&self.entry_key(key));
        }
    }
}
