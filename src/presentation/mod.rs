//! Presentation layer: the view side of the photo wall.

/// Headless grid view.
pub mod wall_view;

pub use wall_view::{DisplayedImage, HeadlessWallView};
