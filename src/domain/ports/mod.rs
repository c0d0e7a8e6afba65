mod catalog_port;
mod image_cache_port;

pub use catalog_port::GameCatalogPort;
pub use image_cache_port::{FetchResult, ImageCachePort, ImageFetcherPort};

#[cfg(test)]
pub mod mocks {
    pub use super::catalog_port::mock::MockGameCatalog;
    pub use super::image_cache_port::mock::MockImageFetcher;
}
