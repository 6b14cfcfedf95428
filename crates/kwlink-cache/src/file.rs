//! File-based cache implementation.
//!
//! [`FileCache`] stores cache entries as files on disk, organized into buckets
//! (subdirectories). Each entry is a single file with a binary header followed
//! by the data:
//!
//! ```text
//! [expires_at_unix_ms: u64 LE][data bytes]
//! ```
//!
//! On read, only the header is read first to check expiry. The full data
//! is read only on cache hit.
//!
//! On construction, [`FileCache`] validates a `VERSION` file in the cache root.
//! If the version mismatches or is missing, the entire cache directory is wiped
//! and recreated. This ensures stale caches from previous builds are never used.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::{Cache, CacheBucket};

/// File-based [`Cache`] rooted at a directory on disk.
///
/// Directory layout:
/// ```text
/// {root}/
/// +-- VERSION                  # contains the cache version string
/// +-- dictionary/              # bucket "dictionary"
///     +-- keyword_dictionary   # cache entry
/// ```
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    /// Create a new file-based cache at `root`, validating the cache version.
    ///
    /// If the `VERSION` file inside `root` does not match `version`, the entire
    /// cache directory is removed and recreated with the new version. Errors
    /// during validation are logged but never fatal.
    #[must_use]
    pub fn new(root: PathBuf, version: &str) -> Self {
        validate_version(&root, version);
        Self { root }
    }
}

impl Cache for FileCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        Box::new(FileCacheBucket {
            dir: self.root.join(name),
        })
    }
}

/// A single bucket backed by a directory on disk.
struct FileCacheBucket {
    dir: PathBuf,
}

/// Milliseconds since the Unix epoch (0 if the clock is before the epoch).
fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

impl CacheBucket for FileCacheBucket {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let path = self.dir.join(key);
        let mut file = File::open(&path).ok()?;

        let mut header = [0u8; 8];
        file.read_exact(&mut header).ok()?;
        let expires_at = u64::from_le_bytes(header);

        if now_millis() >= expires_at {
            return None;
        }

        let mut data = Vec::new();
        file.read_to_end(&mut data).ok()?;
        Some(data)
    }

    fn set(&self, key: &str, value: &[u8], ttl: Duration) {
        let path = self.dir.join(key);

        // Cache writes are best effort
        let Some(parent) = path.parent() else {
            return;
        };
        if fs::create_dir_all(parent).is_err() {
            return;
        }

        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        let expires_at = now_millis().saturating_add(ttl_ms);

        let mut buf = Vec::with_capacity(8 + value.len());
        buf.extend_from_slice(&expires_at.to_le_bytes());
        buf.extend_from_slice(value);

        let _ = fs::write(&path, &buf);
    }

    fn remove(&self, key: &str) {
        let path = self.dir.join(key);
        if let Err(e) = fs::remove_file(&path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!("failed to remove cache entry {}: {e}", path.display());
        }
    }
}

/// Validate the cache version, wiping the directory on mismatch.
fn validate_version(root: &Path, version: &str) {
    let version_file = root.join("VERSION");

    match fs::read_to_string(&version_file) {
        Ok(stored) if stored == version => {
            tracing::debug!("cache version matches: {version}");
            return;
        }
        Ok(stored) => {
            tracing::info!(
                "cache version mismatch (stored={stored}, current={version}), wiping cache"
            );
        }
        Err(_) => {
            tracing::info!("no cache VERSION file found, initializing cache");
        }
    }

    if root.exists()
        && let Err(e) = fs::remove_dir_all(root)
    {
        tracing::warn!("failed to remove cache directory: {e}");
    }
    if let Err(e) = fs::create_dir_all(root) {
        tracing::warn!("failed to create cache directory: {e}");
        return;
    }
    if let Err(e) = fs::write(&version_file, version) {
        tracing::warn!("failed to write cache VERSION file: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn test_file_bucket_set_and_get() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path().join("cache"), "v1");
        let bucket = cache.bucket("dictionary");

        bucket.set("keyword_dictionary", b"[]", HOUR);
        assert_eq!(bucket.get("keyword_dictionary"), Some(b"[]".to_vec()));
    }

    #[test]
    fn test_file_bucket_zero_ttl_is_expired() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path().join("cache"), "v1");
        let bucket = cache.bucket("dictionary");

        bucket.set("key", b"data", Duration::ZERO);
        assert_eq!(bucket.get("key"), None);
    }

    #[test]
    fn test_file_bucket_get_nonexistent_key() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path().join("cache"), "v1");
        let bucket = cache.bucket("dictionary");

        assert_eq!(bucket.get("nonexistent"), None);
    }

    #[test]
    fn test_file_bucket_overwrite() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path().join("cache"), "v1");
        let bucket = cache.bucket("dictionary");

        bucket.set("key", b"first", HOUR);
        bucket.set("key", b"second", HOUR);

        assert_eq!(bucket.get("key"), Some(b"second".to_vec()));
    }

    #[test]
    fn test_file_bucket_remove_invalidates() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path().join("cache"), "v1");
        let bucket = cache.bucket("dictionary");

        bucket.set("key", b"data", HOUR);
        bucket.remove("key");
        assert_eq!(bucket.get("key"), None);

        // Removing again is harmless
        bucket.remove("key");
    }

    #[test]
    fn test_file_bucket_truncated_header_is_a_miss() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("cache");
        let cache = FileCache::new(root.clone(), "v1");
        let bucket = cache.bucket("dictionary");

        fs::create_dir_all(root.join("dictionary")).unwrap();
        fs::write(root.join("dictionary/key"), b"abc").unwrap();
        assert_eq!(bucket.get("key"), None);
    }

    #[test]
    fn test_file_cache_buckets_are_isolated() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path().join("cache"), "v1");

        let bucket_a = cache.bucket("alpha");
        let bucket_b = cache.bucket("beta");

        bucket_a.set("key", b"alpha-data", HOUR);
        bucket_b.set("key", b"beta-data", HOUR);

        assert_eq!(bucket_a.get("key"), Some(b"alpha-data".to_vec()));
        assert_eq!(bucket_b.get("key"), Some(b"beta-data".to_vec()));
    }

    #[test]
    fn test_version_match_keeps_cache() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("cache");

        let cache = FileCache::new(root.clone(), "v1");
        cache.bucket("dictionary").set("key", b"preserved", HOUR);

        let cache2 = FileCache::new(root, "v1");
        assert_eq!(
            cache2.bucket("dictionary").get("key"),
            Some(b"preserved".to_vec())
        );
    }

    #[test]
    fn test_version_mismatch_wipes_cache() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("cache");

        let cache = FileCache::new(root.clone(), "v1");
        cache.bucket("dictionary").set("key", b"will-be-wiped", HOUR);

        let cache2 = FileCache::new(root.clone(), "v2");
        assert_eq!(cache2.bucket("dictionary").get("key"), None);

        let version = fs::read_to_string(root.join("VERSION")).unwrap();
        assert_eq!(version, "v2");
    }

    #[test]
    fn test_nonexistent_root_creates_version() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("deeply/nested/cache");
        assert!(!root.exists());

        let _cache = FileCache::new(root.clone(), "v1");

        assert!(root.exists());
        let version = fs::read_to_string(root.join("VERSION")).unwrap();
        assert_eq!(version, "v1");
    }
}
