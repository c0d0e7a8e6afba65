//! Domain error types.

mod catalog_error;
mod fetch_error;

pub use catalog_error::CatalogError;
pub use fetch_error::FetchError;
