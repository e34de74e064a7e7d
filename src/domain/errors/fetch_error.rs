//! Fetch error types.

use thiserror::Error;

/// Result type for a single image fetch.
pub type FetchResult<T> = Result<T, FetchError>;

/// Ways a single image fetch can end without an image.
///
/// None of these are fatal: the slot keeps its placeholder and the next
/// idle pass retries because the cache still misses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum FetchError {
    #[error("connect timed out: {url}")]
    ConnectTimeout { url: String },

    #[error("read timed out: {url}")]
    ReadTimeout { url: String },

    #[error("network failure for {url}: {message}")]
    NetworkFailure { url: String, message: String },

    #[error("failed to decode {url}: {message}")]
    DecodeFailure { url: String, message: String },

    #[error("fetch cancelled")]
    Cancelled,
}

impl FetchError {
    /// Creates a network failure error.
    #[must_use]
    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NetworkFailure {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a decode failure error.
    #[must_use]
    pub fn decode(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DecodeFailure {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Returns true for cooperative cancellation, which is not a failure.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns true if the error is a timeout of either phase.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::ConnectTimeout { .. } | Self::ReadTimeout { .. })
    }
}
