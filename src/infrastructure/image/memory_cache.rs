//! In-memory LRU image cache bounded by decoded byte size.

use lru::LruCache;
use tracing::{debug, trace};

use crate::domain::entities::{CacheStats, CachedImage, ResourceKey};
use crate::domain::ports::ImageCachePort;

/// Fraction of the process memory budget given to the cache.
pub const DEFAULT_BUDGET_DIVISOR: u64 = 8;

/// LRU cache for decoded images, bounded by the sum of their byte sizes.
pub struct MemoryImageCache {
    entries: LruCache<ResourceKey, CachedImage>,
    capacity_bytes: usize,
    size_bytes: usize,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl MemoryImageCache {
    /// Creates a cache holding at most `capacity_bytes` of decoded pixels.
    #[must_use]
    pub fn new(capacity_bytes: usize) -> Self {
        Self {
            entries: LruCache::unbounded(),
            capacity_bytes,
            size_bytes: 0,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Creates a cache sized to `budget_bytes / divisor`.
    #[must_use]
    pub fn from_memory_budget(budget_bytes: u64, divisor: u64) -> Self {
        let capacity = budget_bytes / divisor.max(1);
        Self::new(usize::try_from(capacity).unwrap_or(usize::MAX))
    }

    fn trim_to_capacity(&mut self) {
        while self.size_bytes > self.capacity_bytes {
            let Some((key, image)) = self.entries.pop_lru() else {
                break;
            };
            self.size_bytes -= image.byte_size();
            self.evictions += 1;
            debug!(key = %key, bytes = image.byte_size(), "Evicted image from memory cache");
        }
    }
}

impl ImageCachePort for MemoryImageCache {
    fn get(&mut self, key: &ResourceKey) -> Option<CachedImage> {
        if let Some(image) = self.entries.get(key) {
            self.hits += 1;
            trace!(key = %key, "Memory cache hit");
            Some(image.clone())
        } else {
            self.misses += 1;
            trace!(key = %key, "Memory cache miss");
            None
        }
    }

    fn peek(&self, key: &ResourceKey) -> Option<&CachedImage> {
        self.entries.peek(key)
    }

    fn contains(&self, key: &ResourceKey) -> bool {
        self.entries.contains(key)
    }

    /// The existing entry is left untouched on a repeated key and capacity is
    /// not charged again. An image larger than the whole capacity is evicted
    /// by the same trim that makes room for it.
    fn put(&mut self, key: ResourceKey, image: CachedImage) -> bool {
        if self.entries.contains(&key) {
            trace!(key = %key, "Already cached, ignoring put");
            return false;
        }

        debug!(key = %key, bytes = image.byte_size(), "Storing image in memory cache");
        self.size_bytes += image.byte_size();
        self.entries.put(key, image);
        self.trim_to_capacity();
        true
    }

    fn evict(&mut self, key: &ResourceKey) -> Option<CachedImage> {
        let image = self.entries.pop(key)?;
        self.size_bytes -= image.byte_size();
        self.evictions += 1;
        debug!(key = %key, "Evicted image from memory cache");
        Some(image)
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.size_bytes = 0;
        debug!("Cleared memory image cache");
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }

    #[allow(clippy::cast_precision_loss)]
    fn stats(&self) -> CacheStats {
        let total = self.hits + self.misses;
        let hit_rate = if total > 0 {
            (self.hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            hit_rate,
            entries: self.entries.len(),
            size_bytes: self.size_bytes,
            capacity_bytes: self.capacity_bytes,
            evictions: self.evictions,
        }
    }
}

impl std::fmt::Debug for MemoryImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryImageCache")
            .field("entries", &self.entries.len())
            .field("size_bytes", &self.size_bytes)
            .field("capacity_bytes", &self.capacity_bytes)
            .finish_non_exhaustive()
    }
}
