//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Case-data source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// CSV export of per-district daily case counts
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Directory served under `/static`; holds `js/hongkong.json`
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    #[serde(default = "default_hotspot_count")]
    pub hotspot_count: usize,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("./data/hk_district_cases.csv")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("./static")
}

fn default_hotspot_count() -> usize {
    5
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            static_dir: default_static_dir(),
            hotspot_count: default_hotspot_count(),
        }
    }
}

impl SourceConfig {
    /// Path of the shape resource on disk
    pub fn shape_file(&self) -> PathBuf {
        self.static_dir.join("js").join("hongkong.json")
    }
}

/// Dashboard client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Base URL of the dashboard server
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Path of the data endpoint, relative to `api_url`
    #[serde(default = "default_data_path")]
    pub data_path: String,

    /// Path of the shape resource, relative to `api_url`
    #[serde(default = "default_shape_path")]
    pub shape_path: String,

    /// Identifier the shape resource is registered under
    #[serde(default = "default_map_name")]
    pub map_name: String,

    /// Client-side timeout for the data request
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_window")]
    pub moving_average_window: usize,

    /// Districts shown in the ranking panel
    #[serde(default = "default_top_n")]
    pub district_top_n: usize,
}

fn default_api_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_data_path() -> String {
    "/api/data".to_string()
}

fn default_shape_path() -> String {
    "/static/js/hongkong.json".to_string()
}

fn default_map_name() -> String {
    "HK".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_window() -> usize {
    7
}

fn default_top_n() -> usize {
    10
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            data_path: default_data_path(),
            shape_path: default_shape_path(),
            map_name: default_map_name(),
            timeout_secs: default_timeout(),
            moving_average_window: default_window(),
            district_top_n: default_top_n(),
        }
    }
}

impl DashboardConfig {
    pub fn data_url(&self) -> String {
        join_url(&self.api_url, &self.data_path)
    }

    pub fn shape_url(&self) -> String {
        join_url(&self.api_url, &self.shape_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("epidash").join("config.toml")),
            Some(PathBuf::from("/etc/epidash/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // API overrides
        if let Some(host) = var("EPIDASH_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("EPIDASH_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // Source overrides
        if let Some(data_file) = var("EPIDASH_DATA_FILE") {
            self.source.data_file = PathBuf::from(data_file);
        }
        if let Some(static_dir) = var("EPIDASH_STATIC_DIR") {
            self.source.static_dir = PathBuf::from(static_dir);
        }

        // Dashboard overrides
        if let Some(url) = var("EPIDASH_API_URL") {
            self.dashboard.api_url = url;
        }

        // Logging overrides
        if let Some(level) = var("EPIDASH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("EPIDASH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Epidash Configuration
#
# Environment variables override these settings:
# - EPIDASH_HOST
# - EPIDASH_PORT
# - EPIDASH_DATA_FILE
# - EPIDASH_STATIC_DIR
# - EPIDASH_API_URL
# - EPIDASH_LOG_LEVEL
# - EPIDASH_LOG_FORMAT

[api]
# Server host
host = "0.0.0.0"

# Server port
port = 5000

# Request timeout in seconds
request_timeout_secs = 30

[source]
# CSV export of per-district daily case counts
data_file = "./data/hk_district_cases.csv"

# Directory served under /static (must contain js/hongkong.json)
static_dir = "./static"

# Number of hotspot districts reported
hotspot_count = 5

[dashboard]
# Dashboard server the CLI renders against
api_url = "http://localhost:5000"
data_path = "/api/data"
shape_path = "/static/js/hongkong.json"

# Identifier the district shapes are registered under
map_name = "HK"

# Data request timeout in seconds
timeout_secs = 10

# Window of the growth-rate moving average
moving_average_window = 7

# Districts shown in the ranking panel
district_top_n = 10

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
