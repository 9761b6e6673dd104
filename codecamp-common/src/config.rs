//! Configuration loading and root folder resolution
//!
//! Bootstrap configuration comes from a TOML file. A missing file is not an
//! error: a warning is logged and compiled defaults are used. Runtime values
//! (the API shared secret) live in the database `settings` table.
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. `CODECAMP_ROOT_FOLDER` environment variable
//! 3. TOML config file `root_folder`
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "CODECAMP_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "codecamp.db";

/// Bootstrap configuration loaded from TOML file
///
/// Every field has a default so that a partial file is valid.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Root folder holding the database (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub uploads: UploadConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            bind_address: default_bind_address(),
            port: default_port(),
            logging: LoggingConfig::default(),
            uploads: UploadConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Speaker image upload limits
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Largest accepted upload, in bytes (before resizing)
    #[serde(default = "default_max_image_size_bytes")]
    pub max_image_size_bytes: usize,

    /// Stored images are resized to fit inside a square of this many pixels
    #[serde(default = "default_image_bounding_box")]
    pub image_bounding_box: u32,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_image_size_bytes: default_max_image_size_bytes(),
            image_bounding_box: default_image_bounding_box(),
        }
    }
}

/// API authentication tuning
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// How old a request timestamp may be, in milliseconds
    #[serde(default = "default_timestamp_window_ms")]
    pub timestamp_window_ms: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            timestamp_window_ms: default_timestamp_window_ms(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5780
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_image_size_bytes() -> usize {
    2_000_000
}

fn default_image_bounding_box() -> u32 {
    300
}

fn default_timestamp_window_ms() -> i64 {
    1000
}

/// Load the TOML bootstrap configuration
///
/// With `explicit_path` set, that file is read; otherwise the platform config
/// locations are searched. A missing file yields defaults; a file that exists
/// but does not parse is an error.
pub fn load_toml_config(explicit_path: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit_path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) => path,
            None => {
                warn!("No config file found, using compiled defaults");
                return Ok(TomlConfig::default());
            }
        },
    };

    if !path.exists() {
        warn!("Config file {} not found, using compiled defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(&path)?;
    let config = parse_toml_config(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Parse TOML text into a [`TomlConfig`]
pub fn parse_toml_config(content: &str) -> std::result::Result<TomlConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Platform config file location, if one exists
///
/// Linux checks `~/.config/codecamp/config.toml`, then
/// `/etc/codecamp/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("codecamp").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/codecamp/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Get OS-dependent default root folder path
pub fn get_default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("codecamp"))
        .unwrap_or_else(|| PathBuf::from("./codecamp_data"))
}

/// Resolves the root folder following the priority order in the module docs
#[derive(Debug, Clone)]
pub struct RootFolderResolver {
    module_name: String,
    cli_arg: Option<PathBuf>,
    toml_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            cli_arg: None,
            toml_root: None,
        }
    }

    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    pub fn with_toml_config(mut self, config: &TomlConfig) -> Self {
        self.toml_root = config.root_folder.clone();
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            info!("[{}] Root folder from command line: {}", self.module_name, path.display());
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.is_empty() {
                info!("[{}] Root folder from {}: {}", self.module_name, ROOT_FOLDER_ENV, path);
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml_root {
            info!("[{}] Root folder from config file: {}", self.module_name, path.display());
            return path.clone();
        }

        let path = get_default_root_folder();
        info!("[{}] Root folder (default): {}", self.module_name, path.display());
        path
    }
}

/// Prepares the resolved root folder for use
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    /// Create the root folder if it is missing
    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            info!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }
}
