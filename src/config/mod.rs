//! Configuration management for adminui.
//!
//! Settings are read from `<config_dir>/adminui/config.toml`. A missing file
//! means defaults. The `ADMINUI_ENDPOINT` environment variable overrides the
//! configured endpoint; command-line flags are applied on top by the binary.

mod settings;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

pub use settings::{Settings, DEFAULT_ENDPOINT, DEFAULT_TICK_RATE_MS};

/// Environment variable that overrides the configured endpoint.
pub const ENDPOINT_ENV: &str = "ADMINUI_ENDPOINT";

/// Name of the configuration file.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform configuration directory could not be determined.
    #[error("Could not determine configuration directory")]
    NoConfigDir,

    /// The configuration directory could not be created.
    #[error("Failed to create configuration directory: {0}")]
    CreateDirError(#[source] std::io::Error),

    /// The configuration file could not be read.
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[source] std::io::Error),

    /// The configuration file could not be written.
    #[error("Failed to write configuration file: {0}")]
    WriteError(#[source] std::io::Error),

    /// The configuration file is not valid TOML for [`Settings`].
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The settings could not be serialized.
    #[error("Failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// A setting has an invalid value.
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Loaded configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// The application settings.
    pub settings: Settings,
}

impl Config {
    /// Default location of the configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoConfigDir` if the platform has no config directory.
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(base.join("adminui").join(CONFIG_FILE_NAME))
    }

    /// Load configuration from a file, falling back to defaults if it does not exist.
    ///
    /// The `ADMINUI_ENDPOINT` override is applied after the file is read.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut settings = if path.exists() {
            debug!(path = %path.display(), "Reading configuration");
            let contents = fs::read_to_string(path).map_err(ConfigError::ReadError)?;
            toml::from_str::<Settings>(&contents)?
        } else {
            debug!(path = %path.display(), "No configuration file, using defaults");
            Settings::default()
        };

        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                debug!(%endpoint, "Endpoint overridden from environment");
                settings.endpoint = endpoint;
            }
        }

        Ok(Self { settings })
    }

    /// Write the settings to a file, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::CreateDirError)?;
        }
        let contents = toml::to_string_pretty(&self.settings)?;
        fs::write(path, contents).map_err(ConfigError::WriteError)?;
        info!(path = %path.display(), "Configuration written");
        Ok(())
    }
}
