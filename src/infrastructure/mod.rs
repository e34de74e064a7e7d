//! Infrastructure layer with external service adapters.

/// Image address catalog.
pub mod catalog;
/// Application configuration.
pub mod config;
/// Image handling (caching, HTTP fetching).
pub mod image;

pub use catalog::{CatalogError, ResourceCatalog};
pub use config::{AppConfig, CliArgs, ConfigError, LogLevel, StorageManager};
pub use image::{HttpFetcherConfig, HttpImageFetcher, MemoryImageCache};
