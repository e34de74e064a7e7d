//! Domain types for remote images and grid slots.

use std::sync::Arc;

/// Address of a fetchable image.
/// Doubles as the memory cache key and the fetch deduplication key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey(String);

impl ResourceKey {
    /// Creates a new `ResourceKey` from any string-like input.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ResourceKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ResourceKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for ResourceKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A decoded image together with its measured memory footprint.
///
/// Cloning is cheap: the pixel data is shared.
#[derive(Clone)]
pub struct CachedImage {
    image: Arc<image::DynamicImage>,
    byte_size: usize,
}

impl CachedImage {
    /// Wraps a decoded image, measuring its decoded byte footprint.
    #[must_use]
    pub fn new(image: image::DynamicImage) -> Self {
        let byte_size = image.as_bytes().len();
        Self {
            image: Arc::new(image),
            byte_size,
        }
    }

    /// Wraps an image with an explicitly charged size.
    #[must_use]
    pub fn with_byte_size(image: Arc<image::DynamicImage>, byte_size: usize) -> Self {
        Self { image, byte_size }
    }

    /// Returns the shared decoded image.
    #[must_use]
    pub fn image(&self) -> &Arc<image::DynamicImage> {
        &self.image
    }

    /// Returns the number of bytes this image is charged against cache capacity.
    #[must_use]
    pub const fn byte_size(&self) -> usize {
        self.byte_size
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Returns true if both values share the same pixel buffer.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.image, &other.image)
    }
}

impl std::fmt::Debug for CachedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedImage")
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .field("byte_size", &self.byte_size)
            .finish()
    }
}

/// Lifecycle of a single fetch task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    /// Task has been spawned and has not finished.
    #[default]
    Running,
    /// Cancellation was requested; the worker may still be winding down.
    Cancelled,
    /// The worker reported a result.
    Completed,
}

impl FetchStatus {
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    #[must_use]
    pub const fn is_cancelled(self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl std::fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// What a bound grid slot should show.
#[derive(Debug, Clone)]
pub enum SlotContent {
    /// The image is cached and can be shown right away.
    Image(ResourceKey, CachedImage),
    /// The image is not available yet; show the placeholder.
    Placeholder(ResourceKey),
    /// No resource exists at this position.
    Empty,
}

impl SlotContent {
    #[must_use]
    pub const fn is_image(&self) -> bool {
        matches!(self, Self::Image(..))
    }

    #[must_use]
    pub const fn key(&self) -> Option<&ResourceKey> {
        match self {
            Self::Image(key, _) | Self::Placeholder(key) => Some(key),
            Self::Empty => None,
        }
    }
}
