//! Configuration loading
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (clap `env` fallbacks, surfaced as overrides)
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing or malformed TOML file never aborts startup: it is logged and
//! the compiled defaults are used instead.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::{Error, Result};

/// Application directory name under the platform config/data dirs
pub const APP_DIR: &str = "carcass-viewer";

/// Bootstrap configuration file contents (every key optional)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// SQLite database holding `carcass_analysis`
    pub database_path: Option<PathBuf>,
    /// Root containing `original_images/`, `legacy_images/`, `processed_images/`
    pub images_dir: Option<PathBuf>,
    /// Built front-end to serve at `/` (optional)
    pub static_dir: Option<PathBuf>,
    pub bind: Option<String>,
    pub port: Option<u16>,

    /// Viewer: base URL of the `/api` surface
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub refresh_interval_secs: Option<u64>,

    #[serde(default)]
    pub logging: LoggingConfig,
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

fn default_log_level() -> String {
    "info".to_string()
}

/// Compiled-in defaults for the current platform
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub database_path: PathBuf,
    pub images_dir: PathBuf,
    pub bind: String,
    pub port: u16,
    pub api_url: String,
    pub timeout: Duration,
    pub refresh_interval: Duration,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        let data_dir = default_data_dir();
        Self {
            database_path: data_dir.join("marbling.db"),
            images_dir: data_dir.join("images"),
            bind: "0.0.0.0".to_string(),
            port: 5000,
            api_url: "http://127.0.0.1:5000/api".to_string(),
            timeout: Duration::from_secs(10),
            refresh_interval: Duration::from_secs(30),
            log_level: default_log_level(),
        }
    }
}

/// `~/.local/share/carcass-viewer` and platform equivalents
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("./carcass_data"))
}

/// Locate the TOML config file
///
/// An explicit path wins. Otherwise the user config dir is tried, then
/// `/etc/carcass-viewer/config.toml` on Linux.
pub fn find_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let user_config = dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc").join(APP_DIR).join("config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Parse a TOML config file
pub fn parse_config_file(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
}

/// Load the TOML config, falling back to an empty config on any problem
pub fn load_toml_config(explicit: Option<&Path>) -> TomlConfig {
    let Some(path) = find_config_file(explicit) else {
        info!("No config file found, using defaults");
        return TomlConfig::default();
    };

    match parse_config_file(&path) {
        Ok(config) => {
            info!("Loaded config file: {}", path.display());
            config
        }
        Err(e) => {
            warn!("Ignoring config file ({}), using defaults", e);
            TomlConfig::default()
        }
    }
}

/// Values taken from the command line / environment
#[derive(Debug, Clone, Default)]
pub struct ServerOverrides {
    pub database_path: Option<PathBuf>,
    pub images_dir: Option<PathBuf>,
    pub static_dir: Option<PathBuf>,
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

/// Resolved server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub database_path: PathBuf,
    pub images_dir: PathBuf,
    pub static_dir: Option<PathBuf>,
    pub bind: String,
    pub port: u16,
    pub log_level: String,
}

impl ServerConfig {
    pub fn resolve(overrides: ServerOverrides, file: &TomlConfig) -> Self {
        let defaults = CompiledDefaults::for_current_platform();
        Self {
            database_path: overrides
                .database_path
                .or_else(|| file.database_path.clone())
                .unwrap_or(defaults.database_path),
            images_dir: overrides
                .images_dir
                .or_else(|| file.images_dir.clone())
                .unwrap_or(defaults.images_dir),
            static_dir: overrides.static_dir.or_else(|| file.static_dir.clone()),
            bind: overrides
                .bind
                .or_else(|| file.bind.clone())
                .unwrap_or(defaults.bind),
            port: overrides.port.or(file.port).unwrap_or(defaults.port),
            log_level: overrides
                .log_level
                .unwrap_or_else(|| file.logging.level.clone()),
        }
    }
}

/// Values taken from the command line / environment
#[derive(Debug, Clone, Default)]
pub struct ViewerOverrides {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub refresh_interval_secs: Option<u64>,
    pub log_level: Option<String>,
}

/// Resolved viewer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub api_url: String,
    pub timeout: Duration,
    pub refresh_interval: Duration,
    pub log_level: String,
}

impl ViewerConfig {
    pub fn resolve(overrides: ViewerOverrides, file: &TomlConfig) -> Self {
        let defaults = CompiledDefaults::for_current_platform();
        Self {
            api_url: overrides
                .api_url
                .or_else(|| file.api_url.clone())
                .unwrap_or(defaults.api_url)
                .trim_end_matches('/')
                .to_string(),
            timeout: overrides
                .timeout_secs
                .or(file.timeout_secs)
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            refresh_interval: overrides
                .refresh_interval_secs
                .or(file.refresh_interval_secs)
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.refresh_interval),
            log_level: overrides
                .log_level
                .unwrap_or_else(|| file.logging.level.clone()),
        }
    }
}
