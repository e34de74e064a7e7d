//! Port definition for fetching and decoding remote images.

use crate::domain::CancelFlag;
use crate::domain::entities::{CachedImage, ResourceKey};
use crate::domain::errors::FetchResult;

/// Port for turning a resource address into a decoded image.
/// Implementations must be thread-safe; calls run on worker tasks.
#[async_trait::async_trait]
pub trait ImageFetcherPort: Send + Sync {
    /// Downloads and decodes the image at `key`.
    ///
    /// Implementations check `cancel` at each suspension point and return
    /// `FetchError::Cancelled` once they observe it.
    async fn fetch(&self, key: &ResourceKey, cancel: &CancelFlag) -> FetchResult<CachedImage>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::errors::FetchError;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tokio::sync::watch;

    /// Scripted fetcher for tests.
    ///
    /// Every key yields a tiny image unless a size or error was scripted.
    /// A held fetcher parks every call until `release` is called.
    pub struct MockImageFetcher {
        sizes: Mutex<HashMap<ResourceKey, usize>>,
        errors: Mutex<HashMap<ResourceKey, FetchError>>,
        calls: Mutex<Vec<ResourceKey>>,
        gate: watch::Sender<bool>,
        observe_cancel: bool,
    }

    impl MockImageFetcher {
        /// Creates a fetcher that answers immediately.
        pub fn new() -> Self {
            Self {
                sizes: Mutex::new(HashMap::new()),
                errors: Mutex::new(HashMap::new()),
                calls: Mutex::new(Vec::new()),
                gate: watch::Sender::new(true),
                observe_cancel: true,
            }
        }

        /// Creates a fetcher whose calls block until released.
        pub fn held() -> Self {
            let fetcher = Self::new();
            fetcher.gate.send_replace(false);
            fetcher
        }

        /// Never reports cancellation, like a worker that missed the flag.
        pub fn ignoring_cancel(mut self) -> Self {
            self.observe_cancel = false;
            self
        }

        /// Charges `key` with `bytes` against cache capacity.
        pub fn with_size(self, key: &str, bytes: usize) -> Self {
            self.sizes
                .lock()
                .unwrap()
                .insert(ResourceKey::new(key), bytes);
            self
        }

        /// Makes every fetch of `key` fail with `error`.
        pub fn with_error(self, key: &str, error: FetchError) -> Self {
            self.errors
                .lock()
                .unwrap()
                .insert(ResourceKey::new(key), error);
            self
        }

        /// Unblocks all parked and future calls.
        pub fn release(&self) {
            self.gate.send_replace(true);
        }

        /// Keys requested so far, in call order.
        pub fn calls(&self) -> Vec<ResourceKey> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self, key: &str) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|k| k.as_str() == key)
                .count()
        }
    }

    impl Default for MockImageFetcher {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait::async_trait]
    impl ImageFetcherPort for MockImageFetcher {
        async fn fetch(&self, key: &ResourceKey, cancel: &CancelFlag) -> FetchResult<CachedImage> {
            self.calls.lock().unwrap().push(key.clone());

            let mut gate = self.gate.subscribe();
            let _ = gate.wait_for(|open| *open).await;

            if self.observe_cancel && cancel.is_cancelled() {
                return Err(FetchError::Cancelled);
            }

            if let Some(error) = self.errors.lock().unwrap().get(key).cloned() {
                return Err(error);
            }

            let image = Arc::new(image::DynamicImage::new_rgba8(2, 2));
            let size = self.sizes.lock().unwrap().get(key).copied().unwrap_or(16);
            Ok(CachedImage::with_byte_size(image, size))
        }
    }
}
