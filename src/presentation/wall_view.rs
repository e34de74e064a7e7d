//! Headless grid view used by the command-line driver.

use std::collections::HashMap;

use tracing::info;

use crate::domain::entities::{CachedImage, ResourceKey, VisibilityWindow};
use crate::domain::ports::PhotoWallView;
use crate::infrastructure::ResourceCatalog;

/// What a slot currently displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayedImage {
    /// Decoded width in pixels.
    pub width: u32,
    /// Decoded height in pixels.
    pub height: u32,
    /// Bytes charged in the cache.
    pub byte_size: usize,
}

/// Grid view over a catalog that records what each slot shows instead of
/// drawing it. Slots are tagged by resource key, so a delivered image lands
/// on every position showing that key.
#[derive(Debug)]
pub struct HeadlessWallView {
    catalog: ResourceCatalog,
    displayed: HashMap<ResourceKey, DisplayedImage>,
}

impl HeadlessWallView {
    #[must_use]
    pub fn new(catalog: ResourceCatalog) -> Self {
        Self {
            catalog,
            displayed: HashMap::new(),
        }
    }

    #[must_use]
    pub fn displayed(&self, key: &ResourceKey) -> Option<DisplayedImage> {
        self.displayed.get(key).copied()
    }

    /// Number of positions in `window` that show an image.
    #[must_use]
    pub fn filled_in(&self, window: VisibilityWindow) -> usize {
        window
            .indices()
            .filter_map(|index| self.catalog.key_for_index(index))
            .filter(|key| self.displayed.contains_key(key))
            .count()
    }

    /// Number of positions in `window` that exist in the catalog.
    #[must_use]
    pub fn slots_in(&self, window: VisibilityWindow) -> usize {
        window
            .indices()
            .filter(|index| self.catalog.key_for_index(*index).is_some())
            .count()
    }

    #[must_use]
    pub fn is_filled(&self, window: VisibilityWindow) -> bool {
        self.filled_in(window) == self.slots_in(window)
    }
}

impl PhotoWallView for HeadlessWallView {
    fn resource_key_for_index(&self, index: usize) -> Option<ResourceKey> {
        self.catalog.key_for_index(index).cloned()
    }

    fn on_image_ready(&mut self, key: &ResourceKey, image: &CachedImage) {
        let shown = DisplayedImage {
            width: image.width(),
            height: image.height(),
            byte_size: image.byte_size(),
        };
        if self.displayed.insert(key.clone(), shown).is_none() {
            info!(
                key = %key,
                width = shown.width,
                height = shown.height,
                kib = shown.byte_size / 1024,
                "Image displayed"
            );
        }
    }
}
