//! Port implemented by the grid view layer.

use crate::domain::entities::{CachedImage, ResourceKey};

/// What the scheduler needs from the grid that displays images.
///
/// Both methods are called on the task that owns the scheduler.
pub trait PhotoWallView {
    /// Maps a grid position to the address of its image.
    /// Returns `None` for positions past the end of the data set.
    fn resource_key_for_index(&self, index: usize) -> Option<ResourceKey>;

    /// An image for `key` is available; apply it to whichever slot is
    /// currently tagged with `key`, if any.
    fn on_image_ready(&mut self, key: &ResourceKey, image: &CachedImage);
}

#[cfg(test)]
pub mod mock {
    use super::*;

    /// View backed by a fixed list of keys that records every delivery.
    pub struct RecordingView {
        keys: Vec<ResourceKey>,
        delivered: Vec<ResourceKey>,
    }

    impl RecordingView {
        /// Creates a view of `count` items keyed `img-0`, `img-1`, ...
        pub fn with_items(count: usize) -> Self {
            Self {
                keys: (0..count)
                    .map(|i| ResourceKey::new(format!("img-{i}")))
                    .collect(),
                delivered: Vec::new(),
            }
        }

        /// Creates a view over explicit keys (duplicates allowed).
        pub fn with_keys(keys: &[&str]) -> Self {
            Self {
                keys: keys.iter().map(|k| ResourceKey::new(*k)).collect(),
                delivered: Vec::new(),
            }
        }

        pub fn delivered(&self) -> &[ResourceKey] {
            &self.delivered
        }

        pub fn delivered_count(&self, key: &str) -> usize {
            self.delivered.iter().filter(|k| k.as_str() == key).count()
        }
    }

    impl PhotoWallView for RecordingView {
        fn resource_key_for_index(&self, index: usize) -> Option<ResourceKey> {
            self.keys.get(index).cloned()
        }

        fn on_image_ready(&mut self, key: &ResourceKey, _image: &CachedImage) {
            self.delivered.push(key.clone());
        }
    }
}
