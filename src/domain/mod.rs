//! Domain layer with core entities, errors and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{CacheKey, DecodedImage, FetchedImage, Game, GameDetail, Transform};
pub use errors::{CatalogError, FetchError};
pub use ports::{FetchResult, GameCatalogPort, ImageCachePort, ImageFetcherPort};
