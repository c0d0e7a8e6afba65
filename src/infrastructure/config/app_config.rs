//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::infrastructure::catalog::CATALOG_API_BASE;
use crate::infrastructure::image::ImageFetcherConfig;
use crate::infrastructure::image::memory_cache::{DEFAULT_CACHE_SIZE, DEFAULT_MAX_BYTES};

use super::args::CliArgs;
use super::storage::ConfigError;

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, read from `config.toml` and overridden by CLI flags.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log file path. Logs go to stderr when unset.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Memory cache limits.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Image fetcher settings.
    #[serde(default)]
    pub fetcher: ImageFetcherConfig,

    /// Catalog API settings.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Artwork batch loading settings.
    #[serde(default)]
    pub artwork: ArtworkConfig,
}

/// Memory cache limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of decoded images kept.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Maximum decoded bytes kept.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            max_bytes: default_max_bytes(),
        }
    }
}

/// Catalog API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// API root URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Artwork batch loading settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtworkConfig {
    /// Maximum thumbnails fetched at once.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Crop thumbnails to squares.
    #[serde(default = "default_true")]
    pub crop_thumbnails: bool,
}

impl Default for ArtworkConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            crop_thumbnails: true,
        }
    }
}

const fn default_max_entries() -> usize {
    DEFAULT_CACHE_SIZE
}

const fn default_max_bytes() -> usize {
    DEFAULT_MAX_BYTES
}

fn default_base_url() -> String {
    CATALOG_API_BASE.to_string()
}

const fn default_max_concurrent() -> usize {
    8
}

const fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(api_base) = &args.api_base {
            self.catalog.base_url.clone_from(api_base);
        }
        if let Some(timeout) = args.timeout_secs {
            self.fetcher.timeout_secs = timeout;
        }
        if let Some(coalesce) = args.coalesce_requests {
            self.fetcher.coalesce_requests = coalesce;
        }
        if let Some(max_entries) = args.cache_entries {
            self.cache.max_entries = max_entries;
        }
    }

    /// Rejects limits that would leave the cache, fetcher or batch loader
    /// unable to do any work.
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let zero_checks = [
            ("cache.max_entries", self.cache.max_entries == 0),
            ("cache.max_bytes", self.cache.max_bytes == 0),
            ("fetcher.timeout_secs", self.fetcher.timeout_secs == 0),
            ("artwork.max_concurrent", self.artwork.max_concurrent == 0),
        ];
        if let Some((field, _)) = zero_checks.iter().find(|(_, is_zero)| *is_zero) {
            return Err(ConfigError::invalid(*field, "must be greater than zero"));
        }

        let base_url_ok = reqwest::Url::parse(&self.catalog.base_url)
            .is_ok_and(|url| matches!(url.scheme(), "http" | "https"));
        if !base_url_ok {
            return Err(ConfigError::invalid(
                "catalog.base_url",
                format!("{:?} is not an http(s) URL", self.catalog.base_url),
            ));
        }

        Ok(())
    }
}
