//! Application configuration.

pub mod app_config;
pub mod args;
pub mod storage;

pub use app_config::{AppConfig, ArtworkConfig, CacheConfig, CatalogConfig, LogLevel};
pub use args::{CliArgs, Command};
pub use storage::{ConfigError, ConfigOrigin, ConfigStore, LoadedConfig};
