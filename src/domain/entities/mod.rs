//! Domain entity definitions.

mod cache_stats;
mod resource;
mod visibility;

pub use cache_stats::CacheStats;
pub use resource::{CachedImage, FetchStatus, ResourceKey, SlotContent};
pub use visibility::{ScrollState, VisibilityWindow};
