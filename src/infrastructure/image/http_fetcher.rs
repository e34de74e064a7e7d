//! HTTP image fetcher: download with fixed timeouts, then decode.

use std::time::Duration;

use bytes::BytesMut;
use tracing::{debug, trace};

use crate::domain::CancelFlag;
use crate::domain::entities::{CachedImage, ResourceKey};
use crate::domain::errors::{FetchError, FetchResult};
use crate::domain::ports::ImageFetcherPort;

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcherConfig {
    /// Time allowed to establish the connection.
    pub connect_timeout: Duration,
    /// Time allowed between reads once connected.
    pub read_timeout: Duration,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(10),
            user_agent: format!("{}/{}", crate::NAME, crate::VERSION),
        }
    }
}

/// Fetches images with a plain HTTP GET and decodes them off the async runtime.
#[derive(Clone)]
pub struct HttpImageFetcher {
    http_client: reqwest::Client,
    config: HttpFetcherConfig,
}

impl std::fmt::Debug for HttpImageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpImageFetcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HttpImageFetcher {
    /// Creates a fetcher with the given configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: HttpFetcherConfig) -> FetchResult<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::network("", format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Creates a fetcher with the default 5s connect and 10s read timeouts.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn with_defaults() -> FetchResult<Self> {
        Self::new(HttpFetcherConfig::default())
    }

    #[must_use]
    pub const fn config(&self) -> &HttpFetcherConfig {
        &self.config
    }

    /// Downloads the full body. The response, and with it the connection,
    /// is dropped on every return path.
    async fn download(&self, url: &str, cancel: &CancelFlag) -> FetchResult<BytesMut> {
        let mut response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_request_error(url, &e))?;

        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }

        if !response.status().is_success() {
            return Err(FetchError::network(
                url,
                format!(
                    "HTTP {}: {}",
                    response.status().as_u16(),
                    response.status().canonical_reason().unwrap_or("Unknown")
                ),
            ));
        }

        let mut body = BytesMut::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| classify_request_error(url, &e))?
        {
            if cancel.is_cancelled() {
                return Err(FetchError::Cancelled);
            }
            body.extend_from_slice(&chunk);
        }

        trace!(url, bytes = body.len(), "Downloaded image body");
        Ok(body)
    }
}

#[async_trait::async_trait]
impl ImageFetcherPort for HttpImageFetcher {
    async fn fetch(&self, key: &ResourceKey, cancel: &CancelFlag) -> FetchResult<CachedImage> {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }

        let url = key.as_str();
        debug!(url, "Downloading image from network");
        let body = self.download(url, cancel).await?;

        let decoded = decode_image(url, body.freeze()).await?;

        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }

        let image = CachedImage::new(decoded);
        debug!(url, bytes = image.byte_size(), "Image decoded");
        Ok(image)
    }
}

/// Decodes on the blocking pool; decoding is CPU-bound.
async fn decode_image(url: &str, bytes: bytes::Bytes) -> FetchResult<image::DynamicImage> {
    tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await
        .map_err(|e| FetchError::decode(url, format!("Decode task panicked: {e}")))?
        .map_err(|e| FetchError::decode(url, e.to_string()))
}

fn classify_request_error(url: &str, error: &reqwest::Error) -> FetchError {
    if error.is_timeout() && error.is_connect() {
        FetchError::ConnectTimeout {
            url: url.to_string(),
        }
    } else if error.is_timeout() {
        FetchError::ReadTimeout {
            url: url.to_string(),
        }
    } else {
        FetchError::network(url, error.to_string())
    }
}
