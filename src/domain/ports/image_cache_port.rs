//! Port definitions for artwork caching and fetching.

use std::sync::Arc;

use crate::domain::entities::{CacheKey, DecodedImage, FetchedImage, Transform};
use crate::domain::errors::FetchError;

/// Result type for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Port for the decoded image cache.
///
/// Implementations must be thread-safe and non-blocking. Entries may vanish
/// at any time, so callers must tolerate a miss on a key they just inserted.
pub trait ImageCachePort: Send + Sync {
    /// Returns the cached image, or `None` if absent or evicted.
    fn lookup(&self, key: &CacheKey) -> Option<Arc<DecodedImage>>;

    /// Stores or replaces the image for `key`.
    fn insert(&self, key: CacheKey, image: Arc<DecodedImage>);

    /// Removes an image from the cache.
    fn evict(&self, key: &CacheKey);

    /// Returns the current number of cached images.
    fn len(&self) -> usize;

    /// Returns true if the cache is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all images from the cache.
    fn clear(&self);
}

/// Port for resolving an image URL to a ready-to-display image.
#[async_trait::async_trait]
pub trait ImageFetcherPort: Send + Sync {
    /// Fetches `url`, consulting the cache first, then applies `transform`.
    async fn fetch(&self, url: &str, transform: Transform) -> FetchResult<FetchedImage>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::entities::ImageSource;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fetcher that serves solid images for URLs ending in `.png` and fails otherwise.
    pub struct MockImageFetcher {
        width: u32,
        height: u32,
        calls: AtomicUsize,
    }

    impl MockImageFetcher {
        /// Creates new mock producing `width x height` images.
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                calls: AtomicUsize::new(0),
            }
        }

        /// Number of fetches issued so far.
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl ImageFetcherPort for MockImageFetcher {
        async fn fetch(&self, url: &str, transform: Transform) -> FetchResult<FetchedImage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !url.ends_with(".png") {
                return Err(FetchError::bad_status(url, 404, Some("Not Found")));
            }
            let image = Arc::new(DecodedImage::new(image::DynamicImage::new_rgb8(
                self.width,
                self.height,
            )));
            Ok(FetchedImage {
                key: CacheKey::new(url),
                image: transform.apply(&image),
                source: ImageSource::Network,
            })
        }
    }
}
