//! Game catalog API adapter.

pub mod client;

pub use client::{CATALOG_API_BASE, CatalogClient};
