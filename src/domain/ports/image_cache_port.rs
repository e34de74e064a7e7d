//! Port definition for the decoded image cache.

use crate::domain::entities::{CacheStats, CachedImage, ResourceKey};

/// Byte-bounded store of decoded images.
///
/// The cache has a single owner and is mutated through `&mut self` only,
/// so implementations need no interior locking. `get` and `put` both count
/// as an access for recency.
pub trait ImageCachePort: Send {
    /// Returns the image for `key` and marks it most recently used.
    fn get(&mut self, key: &ResourceKey) -> Option<CachedImage>;

    /// Looks at an entry without promoting it or touching statistics.
    fn peek(&self, key: &ResourceKey) -> Option<&CachedImage>;

    /// Returns true if `key` is cached. Does not count as an access.
    fn contains(&self, key: &ResourceKey) -> bool {
        self.peek(key).is_some()
    }

    /// Inserts `image` unless `key` is already cached, then evicts least
    /// recently used entries until the cache fits its capacity.
    /// Returns false if the key was already present.
    fn put(&mut self, key: ResourceKey, image: CachedImage) -> bool;

    /// Removes `key` if present.
    fn evict(&mut self, key: &ResourceKey) -> Option<CachedImage>;

    /// Drops every entry.
    fn clear(&mut self);

    /// Number of cached images.
    fn len(&self) -> usize;

    /// Returns true if nothing is cached.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of the byte sizes of all cached images.
    fn size_bytes(&self) -> usize;

    /// Upper bound for [`Self::size_bytes`].
    fn capacity_bytes(&self) -> usize;

    /// Returns cache statistics.
    fn stats(&self) -> CacheStats;
}
