//! Image handling infrastructure.
//!
//! This module provides:
//! - Memory caching with LRU eviction bounded by entries and decoded bytes
//! - The artwork fetcher (cache, then network, decode, transform)

pub mod fetcher;
pub mod memory_cache;

pub use fetcher::{ImageFetcher, ImageFetcherConfig, decode_image, validate_url};
pub use memory_cache::{CacheStats, MemoryImageCache};
