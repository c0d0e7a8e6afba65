//! Arcade - a free-to-play game catalog client.
//!
//! The interesting part is the artwork pipeline: an injectable in-memory
//! image cache and a shared fetcher that turns a URL into a decoded,
//! optionally center-cropped image while coalescing concurrent downloads.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;
/// Presentation layer containing terminal output.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "arcade";
