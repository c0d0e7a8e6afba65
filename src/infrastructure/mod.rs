//! Infrastructure layer with external service adapters.

/// Catalog API client.
pub mod catalog;
/// Application configuration.
pub mod config;
/// Image handling (caching, fetching, decoding).
pub mod image;

pub use catalog::CatalogClient;
pub use config::{
    AppConfig, CliArgs, Command, ConfigOrigin, ConfigStore, LoadedConfig, LogLevel,
};
pub use self::image::{CacheStats, ImageFetcher, ImageFetcherConfig, MemoryImageCache};
