/// Statistics about cache performance.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of cached images.
    pub entries: usize,
    /// Bytes currently charged.
    pub size_bytes: usize,
    /// Configured capacity in bytes.
    pub capacity_bytes: usize,
    /// Entries dropped to stay within capacity.
    pub evictions: u64,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {} images, {}/{} KiB, {:.1}% hit rate ({} hits, {} misses, {} evictions)",
            self.entries,
            self.size_bytes / 1024,
            self.capacity_bytes / 1024,
            self.hit_rate,
            self.hits,
            self.misses,
            self.evictions
        )
    }
}
