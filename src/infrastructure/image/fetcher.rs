//! Artwork fetcher: memory cache first, then a single network GET.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared, WeakShared};
use image::{DynamicImage, ImageDecoder, ImageReader};
use parking_lot::Mutex;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::domain::entities::{
    CacheKey, DecodedImage, FetchRequest, FetchedImage, ImageSource, Transform,
};
use crate::domain::errors::FetchError;
use crate::domain::ports::{FetchResult, ImageCachePort, ImageFetcherPort};

use super::memory_cache::CacheStats;

const DEFAULT_USER_AGENT: &str = concat!("arcade/", env!("CARGO_PKG_VERSION"));

type Retrieval = BoxFuture<'static, FetchResult<Arc<DecodedImage>>>;
type SharedRetrieval = Shared<Retrieval>;
type InFlight = Arc<Mutex<HashMap<CacheKey, WeakShared<Retrieval>>>>;

/// Configuration for the image fetcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageFetcherConfig {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Share one download between concurrent misses for the same URL.
    pub coalesce_requests: bool,
}

impl Default for ImageFetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            coalesce_requests: true,
        }
    }
}

/// Resolves image URLs to decoded, transformed images.
///
/// Meant to be built once and shared (`Arc<ImageFetcher>`) so that request
/// coalescing covers every caller.
pub struct ImageFetcher {
    cache: Arc<dyn ImageCachePort>,
    stats_source: Option<Arc<super::MemoryImageCache>>,
    http_client: reqwest::Client,
    in_flight: InFlight,
    config: ImageFetcherConfig,
}

impl std::fmt::Debug for ImageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFetcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ImageFetcher {
    /// Creates a fetcher over `cache` with a fresh HTTP client.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(
        config: ImageFetcherConfig,
        cache: Arc<dyn ImageCachePort>,
    ) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self::with_client(config, cache, http_client))
    }

    /// Creates a fetcher reusing an existing HTTP client.
    #[must_use]
    pub fn with_client(
        config: ImageFetcherConfig,
        cache: Arc<dyn ImageCachePort>,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            cache,
            stats_source: None,
            http_client,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            config,
        }
    }

    /// Creates a fetcher over a memory cache, exposing its statistics.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn with_memory_cache(
        config: ImageFetcherConfig,
        cache: Arc<super::MemoryImageCache>,
    ) -> Result<Self, reqwest::Error> {
        let mut fetcher = Self::new(config, cache.clone())?;
        fetcher.stats_source = Some(cache);
        Ok(fetcher)
    }

    /// Returns the cache this fetcher reads and populates.
    #[must_use]
    pub fn cache(&self) -> &Arc<dyn ImageCachePort> {
        &self.cache
    }

    /// Returns memory cache statistics when built over a memory cache.
    #[must_use]
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.stats_source.as_ref().map(|c| c.stats())
    }

    /// Fetches `url` and applies `transform`.
    ///
    /// # Errors
    /// `InvalidUrl` for unparsable or non-HTTP URLs, `RequestFailed` for
    /// transport errors and non-200 responses, `InvalidImage` when the body
    /// does not decode.
    pub async fn fetch(&self, url: &str, transform: Transform) -> FetchResult<FetchedImage> {
        validate_url(url)?;
        let key = CacheKey::new(url);

        if let Some(cached) = self.cache.lookup(&key) {
            trace!(key = %key, transform = %transform, "Serving image from cache");
            return Ok(FetchedImage {
                image: transform.apply(&cached),
                key,
                source: ImageSource::Cache,
            });
        }

        let result = if self.config.coalesce_requests {
            self.coalesced_retrieval(&key).await
        } else {
            retrieve(self.http_client.clone(), Arc::clone(&self.cache), key.clone()).await
        };

        let decoded =
            result.inspect_err(|e| trace!(key = %key, error = %e, "Image fetch returned error"))?;

        Ok(FetchedImage {
            image: transform.apply(&decoded),
            key,
            source: ImageSource::Network,
        })
    }

    /// Fetches a prepared request.
    ///
    /// # Errors
    /// Same as [`ImageFetcher::fetch`].
    pub async fn fetch_request(&self, request: &FetchRequest) -> FetchResult<FetchedImage> {
        self.fetch(&request.url, request.transform).await
    }

    /// Fetches `url` unless `token` fires first.
    ///
    /// A cancelled fetch never writes to the cache on its own behalf; a
    /// download shared with other callers keeps running for them.
    ///
    /// # Errors
    /// `Cancelled` when the token fires first, otherwise as
    /// [`ImageFetcher::fetch`].
    pub async fn fetch_cancellable(
        &self,
        url: &str,
        transform: Transform,
        token: &CancellationToken,
    ) -> FetchResult<FetchedImage> {
        tokio::select! {
            biased;
            () = token.cancelled() => {
                debug!(url = %url, "Image fetch cancelled by caller");
                Err(FetchError::cancelled(url))
            }
            result = self.fetch(url, transform) => result,
        }
    }

    async fn coalesced_retrieval(&self, key: &CacheKey) -> FetchResult<Arc<DecodedImage>> {
        let retrieval = self.join_or_start(key);
        retrieval.await
    }

    fn join_or_start(&self, key: &CacheKey) -> SharedRetrieval {
        let mut in_flight = self.in_flight.lock();

        if let Some(existing) = in_flight.get(key).and_then(WeakShared::upgrade) {
            trace!(key = %key, "Joining in-flight download");
            return existing;
        }

        let entry = InFlightEntry {
            registry: Arc::clone(&self.in_flight),
            key: key.clone(),
            settled: false,
        };
        let download = retrieve(
            self.http_client.clone(),
            Arc::clone(&self.cache),
            key.clone(),
        );
        let retrieval = async move {
            let result = download.await;
            entry.settle();
            result
        }
        .boxed()
        .shared();

        if let Some(weak) = retrieval.downgrade() {
            in_flight.insert(key.clone(), weak);
        }
        retrieval
    }
}

/// Registration of one shared retrieval in the in-flight map.
///
/// Owned by the retrieval future, so it is dropped both when the download
/// finishes and when every waiter abandons it.
struct InFlightEntry {
    registry: InFlight,
    key: CacheKey,
    settled: bool,
}

impl InFlightEntry {
    /// Removes the entry on completion. The retrieval is still alive here, so
    /// the entry under `key` is this one.
    fn settle(mut self) {
        self.registry.lock().remove(&self.key);
        self.settled = true;
    }
}

impl Drop for InFlightEntry {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        // Abandoned: the owning retrieval is gone, so a dead entry under
        // `key` is this one. A live entry belongs to a newer retrieval.
        let mut in_flight = self.registry.lock();
        let current = in_flight.get(&self.key).map(WeakShared::upgrade);
        if matches!(current, Some(None)) {
            in_flight.remove(&self.key);
            trace!(key = %self.key, "Dropped abandoned download");
        }
        // `current` may hold the last handle to a newer retrieval; release
        // the lock before it is dropped.
        drop(in_flight);
        drop(current);
    }
}

#[async_trait::async_trait]
impl ImageFetcherPort for ImageFetcher {
    async fn fetch(&self, url: &str, transform: Transform) -> FetchResult<FetchedImage> {
        Self::fetch(self, url, transform).await
    }
}

/// Checks that `url` is an absolute HTTP(S) URL.
///
/// # Errors
/// Returns `InvalidUrl` describing the problem.
pub fn validate_url(url: &str) -> FetchResult<Url> {
    let parsed = Url::parse(url).map_err(|e| FetchError::invalid_url(url, e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(FetchError::invalid_url(
            url,
            format!("unsupported scheme {:?}", parsed.scheme()),
        ));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(FetchError::invalid_url(url, "missing host"));
    }

    Ok(parsed)
}

/// Decodes raw bytes into an image, keeping the decoder's orientation.
///
/// # Errors
/// Returns the decoder error when the bytes are not a supported image.
pub fn decode_image(bytes: &[u8]) -> image::ImageResult<DecodedImage> {
    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_decoder()?;
    let orientation = decoder.orientation()?;
    let pixels = DynamicImage::from_decoder(decoder)?;

    Ok(DecodedImage::new(pixels).with_orientation(orientation))
}

/// Downloads, decodes and caches the untransformed image for `key`.
///
/// Failures are logged here once, however many callers share the download.
async fn retrieve(
    http_client: reqwest::Client,
    cache: Arc<dyn ImageCachePort>,
    key: CacheKey,
) -> FetchResult<Arc<DecodedImage>> {
    let result = load(&http_client, cache.as_ref(), &key).await;
    if let Err(e) = &result {
        if e.is_cancelled() {
            debug!(key = %key, "Image download cancelled");
        } else {
            warn!(key = %key, error = %e, "Image fetch failed");
        }
    }
    result
}

async fn load(
    http_client: &reqwest::Client,
    cache: &dyn ImageCachePort,
    key: &CacheKey,
) -> FetchResult<Arc<DecodedImage>> {
    debug!(key = %key, "Downloading image from network");
    let bytes = download(http_client, key.as_str()).await?;

    let decoded = tokio::task::spawn_blocking(move || decode_image(&bytes))
        .await
        .map_err(|e| {
            if e.is_cancelled() {
                FetchError::cancelled(key.as_str())
            } else {
                FetchError::invalid_image(key.as_str(), format!("decode task panicked: {e}"))
            }
        })?
        .map_err(|e| FetchError::invalid_image(key.as_str(), e.to_string()))?;

    let image = Arc::new(decoded);
    cache.insert(key.clone(), Arc::clone(&image));

    debug!(
        key = %key,
        width = image.width(),
        height = image.height(),
        "Image loaded from network"
    );
    Ok(image)
}

/// Issues a single GET and returns the body of a 200 response.
async fn download(http_client: &reqwest::Client, url: &str) -> FetchResult<Bytes> {
    let response = http_client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            FetchError::request_failed(url, "request timed out")
        } else if e.is_connect() {
            FetchError::request_failed(url, format!("failed to connect: {e}"))
        } else {
            FetchError::request_failed(url, e.to_string())
        }
    })?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::bad_status(
            url,
            status.as_u16(),
            status.canonical_reason(),
        ));
    }

    response
        .bytes()
        .await
        .map_err(|e| FetchError::request_failed(url, format!("failed to read body: {e}")))
}
