mod image_cache_port;
mod image_fetcher_port;
mod photo_wall_view_port;

pub use image_cache_port::ImageCachePort;
pub use image_fetcher_port::ImageFetcherPort;
pub use photo_wall_view_port::PhotoWallView;

#[cfg(test)]
pub mod mocks {
    pub use super::image_fetcher_port::mock::MockImageFetcher;
    pub use super::photo_wall_view_port::mock::RecordingView;
}
