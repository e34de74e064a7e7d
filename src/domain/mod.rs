//! Domain layer with core entities and port definitions.

/// Cooperative cancellation.
pub mod cancellation;
/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use cancellation::CancelFlag;
pub use entities::{
    CacheStats, CachedImage, ResourceKey, ScrollState, SlotContent, VisibilityWindow,
};
pub use errors::FetchError;
pub use ports::{ImageCachePort, ImageFetcherPort, PhotoWallView};
