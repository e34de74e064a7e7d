//! Photowall - a scrolling wall of remote images.
//!
//! This crate loads images for a scrollable grid on demand: only the
//! visible window is fetched, fetches are cancelled while the grid
//! scrolls, and decoded images live in a byte-bounded LRU cache.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the fetch scheduler.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;
/// Presentation layer containing the grid view.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "photowall";
