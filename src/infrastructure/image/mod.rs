//! Image handling infrastructure.
//!
//! This module provides:
//! - Memory caching with LRU eviction by decoded byte size
//! - The HTTP fetcher
//! - Memory budget probing for cache sizing

pub mod http_fetcher;
pub mod memory_budget;
pub mod memory_cache;

pub use http_fetcher::{HttpFetcherConfig, HttpImageFetcher};
pub use memory_budget::{FALLBACK_MEMORY_BUDGET, resolve_memory_budget};
pub use memory_cache::{DEFAULT_BUDGET_DIVISOR, MemoryImageCache};
