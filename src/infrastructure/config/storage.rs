//! Locating, creating and reading `config.toml`.

use super::app_config::AppConfig;
use directories::ProjectDirs;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "arcade";
const APP_NAME: &str = "arcade";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors raised while locating, reading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform has no per-user configuration directory.
    #[error("no platform configuration directory is available")]
    ConfigDirNotFound,

    /// The config file could not be read or written.
    #[error("config file {}: {source}", .path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Defaults could not be serialized.
    #[error("failed to serialize default config: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// A value is out of range.
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        /// Dotted key, e.g. `cache.max_entries`.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl ConfigError {
    /// Creates an out-of-range error for `field`.
    #[must_use]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }

    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Where a loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Parsed from the existing file.
    File,
    /// The file was missing; defaults were written to it.
    CreatedDefault,
    /// The file does not parse. Defaults are in use and the file is left as is.
    Fallback {
        /// Parser message for the broken file.
        reason: String,
    },
}

/// A configuration together with the file it belongs to.
#[derive(Debug)]
pub struct LoadedConfig {
    /// The configuration in effect.
    pub config: AppConfig,
    /// File it was read from or written to.
    pub path: PathBuf,
    /// How `config` was obtained.
    pub origin: ConfigOrigin,
}

/// Reads the configuration file at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Uses `config.toml` in the platform configuration directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigDirNotFound` if the platform has no such directory.
    pub fn platform_default() -> Result<Self, ConfigError> {
        let dirs = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .ok_or(ConfigError::ConfigDirNotFound)?;

        Ok(Self::at(dirs.config_dir().join(CONFIG_FILE_NAME)))
    }

    /// Uses the file at `path`.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the configuration, writing defaults when the file is missing.
    ///
    /// A file that does not parse yields defaults with
    /// [`ConfigOrigin::Fallback`]; the caller decides how to report it.
    /// Values are not range-checked here, see [`AppConfig::validate`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or the defaults
    /// cannot be written.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        if !self.path.exists() {
            let config = self.write_defaults()?;
            return Ok(self.loaded(config, ConfigOrigin::CreatedDefault));
        }

        let content = fs::read_to_string(&self.path).map_err(ConfigError::io(&self.path))?;
        let loaded = match toml::from_str::<AppConfig>(&content) {
            Ok(config) => self.loaded(config, ConfigOrigin::File),
            Err(e) => self.loaded(
                AppConfig::default(),
                ConfigOrigin::Fallback {
                    reason: e.message().to_string(),
                },
            ),
        };
        Ok(loaded)
    }

    fn loaded(&self, config: AppConfig, origin: ConfigOrigin) -> LoadedConfig {
        LoadedConfig {
            config,
            path: self.path.clone(),
            origin,
        }
    }

    fn write_defaults(&self) -> Result<AppConfig, ConfigError> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).map_err(ConfigError::io(parent))?;

        let config = AppConfig::default();
        let content = toml::to_string_pretty(&config)?;

        let mut temp_file =
            tempfile::NamedTempFile::new_in(parent).map_err(ConfigError::io(parent))?;
        temp_file
            .write_all(content.as_bytes())
            .map_err(ConfigError::io(temp_file.path()))?;
        temp_file
            .persist(&self.path)
            .map_err(|e| ConfigError::io(&self.path)(e.error))?;

        debug!(path = %self.path.display(), "Wrote default configuration");
        Ok(config)
    }
}
