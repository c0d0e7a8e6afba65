//! In-memory LRU image cache implementation.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::domain::entities::{CacheKey, DecodedImage};
use crate::domain::ports::ImageCachePort;

/// Default maximum number of images to cache in memory.
pub const DEFAULT_CACHE_SIZE: usize = 100;

/// Default budget for decoded pixel data (128 MiB).
pub const DEFAULT_MAX_BYTES: usize = 128 * 1024 * 1024;

struct Entries {
    lru: LruCache<CacheKey, Arc<DecodedImage>>,
    total_bytes: usize,
}

impl Entries {
    fn remove(&mut self, key: &CacheKey) -> bool {
        if let Some(old) = self.lru.pop(key) {
            self.total_bytes -= old.byte_size();
            true
        } else {
            false
        }
    }
}

/// In-memory LRU cache for decoded images.
///
/// Bounded both by entry count and by the total size of decoded pixels;
/// least recently used entries go first when either bound is exceeded.
pub struct MemoryImageCache {
    entries: Mutex<Entries>,
    max_bytes: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryImageCache {
    /// Creates a new cache with the given entry capacity and byte budget.
    #[must_use]
    pub fn new(capacity: usize, max_bytes: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(Entries {
                lru: LruCache::new(cap),
                total_bytes: 0,
            }),
            max_bytes,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Creates a new cache with the default limits.
    #[must_use]
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CACHE_SIZE, DEFAULT_MAX_BYTES)
    }

    /// Returns cache statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        let entries = self.entries.lock();
        CacheStats {
            hits,
            misses,
            hit_rate,
            size: entries.lru.len(),
            bytes: entries.total_bytes,
        }
    }

    /// Peeks at an image without promoting it in the LRU or touching stats.
    pub fn peek(&self, key: &CacheKey) -> Option<Arc<DecodedImage>> {
        self.entries.lock().lru.peek(key).cloned()
    }

    /// Returns the total size of cached pixel data in bytes.
    #[must_use]
    pub fn total_bytes(&self) -> usize {
        self.entries.lock().total_bytes
    }
}

impl Default for MemoryImageCache {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

impl std::fmt::Debug for MemoryImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryImageCache")
            .field("max_bytes", &self.max_bytes)
            .field("stats", &self.stats())
            .finish()
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of cached images.
    pub size: usize,
    /// Decoded bytes currently held.
    pub bytes: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {} images ({} KiB), {:.1}% hit rate ({} hits, {} misses)",
            self.size,
            self.bytes / 1024,
            self.hit_rate,
            self.hits,
            self.misses
        )
    }
}

impl ImageCachePort for MemoryImageCache {
    fn lookup(&self, key: &CacheKey) -> Option<Arc<DecodedImage>> {
        let mut entries = self.entries.lock();
        if let Some(img) = entries.lru.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "Memory cache hit");
            Some(Arc::clone(img))
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "Memory cache miss");
            None
        }
    }

    fn insert(&self, key: CacheKey, image: Arc<DecodedImage>) {
        let size = image.byte_size();
        let mut entries = self.entries.lock();
        entries.remove(&key);

        if size > self.max_bytes {
            debug!(key = %key, size, "Image exceeds cache budget, not cached");
            return;
        }

        debug!(key = %key, size, "Storing image in memory cache");
        if let Some((evicted, old)) = entries.lru.push(key, image) {
            entries.total_bytes -= old.byte_size();
            trace!(key = %evicted, "Evicted image over entry capacity");
        }
        entries.total_bytes += size;

        while entries.total_bytes > self.max_bytes {
            match entries.lru.pop_lru() {
                Some((evicted, old)) => {
                    entries.total_bytes -= old.byte_size();
                    trace!(key = %evicted, "Evicted image over byte budget");
                }
                None => break,
            }
        }
    }

    fn evict(&self, key: &CacheKey) {
        if self.entries.lock().remove(key) {
            debug!(key = %key, "Evicted image from memory cache");
        }
    }

    fn len(&self) -> usize {
        self.entries.lock().lru.len()
    }

    fn clear(&self) {
        let mut entries = self.entries.lock();
        entries.lru.clear();
        entries.total_bytes = 0;
        debug!("Cleared memory image cache");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;

    fn rgb(width: u32, height: u32) -> Arc<DecodedImage> {
        Arc::new(DecodedImage::new(DynamicImage::new_rgb8(width, height)))
    }

    #[test]
    fn test_cache_insert_and_lookup() {
        let cache = MemoryImageCache::new(10, DEFAULT_MAX_BYTES);
        let key = CacheKey::new("https://img.test/1.png");
        let img = rgb(100, 100);

        cache.insert(key.clone(), img.clone());
        let retrieved = cache.lookup(&key).unwrap();

        assert_eq!(retrieved.width(), 100);
        assert_eq!(retrieved.pixels().as_bytes(), img.pixels().as_bytes());
    }

    #[test]
    fn test_cache_miss() {
        let cache = MemoryImageCache::default();
        assert!(cache.lookup(&CacheKey::new("nonexistent")).is_none());
    }

    #[test]
    fn test_insert_replaces() {
        let cache = MemoryImageCache::default();
        let key = CacheKey::new("k");

        cache.insert(key.clone(), rgb(10, 10));
        cache.insert(key.clone(), rgb(20, 5));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.lookup(&key).unwrap().width(), 20);
        assert_eq!(cache.total_bytes(), 20 * 5 * 3);
    }

    #[test]
    fn test_cache_eviction_by_count() {
        let cache = MemoryImageCache::new(2, DEFAULT_MAX_BYTES);

        let k1 = CacheKey::new("test1");
        let k2 = CacheKey::new("test2");
        let k3 = CacheKey::new("test3");
        let img = rgb(10, 10);

        cache.insert(k1.clone(), img.clone());
        cache.insert(k2.clone(), img.clone());
        cache.insert(k3.clone(), img);

        // k1 should be evicted (LRU)
        assert!(cache.lookup(&k1).is_none());
        assert!(cache.lookup(&k2).is_some());
        assert!(cache.lookup(&k3).is_some());
        assert_eq!(cache.total_bytes(), 2 * 10 * 10 * 3);
    }

    #[test]
    fn test_cache_eviction_by_bytes() {
        // Room for two 10x10 RGB images (300 bytes each).
        let cache = MemoryImageCache::new(100, 600);
        let k1 = CacheKey::new("a");
        let k2 = CacheKey::new("b");
        let k3 = CacheKey::new("c");

        cache.insert(k1.clone(), rgb(10, 10));
        cache.insert(k2.clone(), rgb(10, 10));
        // Touch k1 so k2 becomes least recently used.
        let _ = cache.lookup(&k1);
        cache.insert(k3.clone(), rgb(10, 10));

        assert!(cache.peek(&k1).is_some());
        assert!(cache.peek(&k2).is_none());
        assert!(cache.peek(&k3).is_some());
        assert!(cache.total_bytes() <= 600);
    }

    #[test]
    fn test_oversized_image_not_retained() {
        let cache = MemoryImageCache::new(10, 100);
        let key = CacheKey::new("huge");

        cache.insert(key.clone(), rgb(100, 100));

        assert!(cache.lookup(&key).is_none());
        assert!(cache.is_empty());
        assert_eq!(cache.total_bytes(), 0);
    }

    #[test]
    fn test_cache_stats() {
        let cache = MemoryImageCache::default();
        let key = CacheKey::new("test1");

        cache.insert(key.clone(), rgb(10, 10));

        // Hit
        let _ = cache.lookup(&key);
        // Miss
        let _ = cache.lookup(&CacheKey::new("missing"));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
        assert_eq!(stats.bytes, 300);
    }

    #[test]
    fn test_peek_does_not_promote() {
        let cache = MemoryImageCache::new(2, DEFAULT_MAX_BYTES);

        let k1 = CacheKey::new("test1");
        let k2 = CacheKey::new("test2");
        let img = rgb(10, 10);

        cache.insert(k1.clone(), img.clone());
        cache.insert(k2.clone(), img.clone());

        // Peek at k1 (should not promote it)
        let _ = cache.peek(&k1);

        // Add k3, should evict k1 (since peek doesn't promote)
        cache.insert(CacheKey::new("test3"), img);

        assert!(cache.peek(&k1).is_none());
    }

    #[test]
    fn test_evict_and_clear() {
        let cache = MemoryImageCache::default();
        let k1 = CacheKey::new("a");
        let k2 = CacheKey::new("b");
        cache.insert(k1.clone(), rgb(4, 4));
        cache.insert(k2.clone(), rgb(4, 4));

        cache.evict(&k1);
        assert!(cache.peek(&k1).is_none());
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.total_bytes(), 0);
    }

    #[test]
    fn test_concurrent_inserts_same_key() {
        let cache = Arc::new(MemoryImageCache::default());
        let key = CacheKey::new("shared");

        let handles: Vec<_> = (1..=8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                let key = key.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        cache.insert(key.clone(), rgb(i, i));
                        let _ = cache.lookup(&key);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let last = cache.lookup(&key).unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.total_bytes(), last.byte_size());
    }
}
