//! Configuration management for scopehound
//!
//! Configuration is loaded from `./config/scopehound.toml` when the file
//! exists. A missing file is not an error: the compiled-in template below
//! supplies every default, so the tool runs out of the box.

use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};
use std::fs;
use std::io::Write;
use thiserror::Error;

/// Configuration file path relative to working directory
pub const CONFIG_PATH: &str = "./config/scopehound.toml";

/// Default configuration file content - this is the ONLY place defaults exist
pub const DEFAULT_CONFIG: &str = include_str!("../config/scopehound.toml");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Configuration field '{field}' cannot be empty")]
    EmptyRequired { field: String },

    #[error("Configuration field '{field}' must be greater than zero")]
    ZeroNotAllowed { field: String },
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// External tool paths and per-invocation timeouts
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsConfig {
    /// Path to the subfinder binary
    #[serde(default = "default_subfinder_path")]
    pub subfinder_path: String,
    /// Path to the amass binary
    #[serde(default = "default_amass_path")]
    pub amass_path: String,
    /// Path to the httpx binary
    #[serde(default = "default_httpx_path")]
    pub httpx_path: String,
    /// Path to the waybackurls binary
    #[serde(default = "default_waybackurls_path")]
    pub waybackurls_path: String,
    /// Timeout for subfinder execution in seconds (0 = no timeout)
    #[serde(default)]
    pub subfinder_timeout_secs: u64,
    /// Timeout for amass execution in seconds (0 = no timeout)
    #[serde(default)]
    pub amass_timeout_secs: u64,
    /// Timeout for httpx execution in seconds (0 = no timeout)
    #[serde(default)]
    pub httpx_timeout_secs: u64,
    /// Timeout for each waybackurls invocation in seconds (0 = no timeout)
    #[serde(default)]
    pub waybackurls_timeout_secs: u64,
}

fn default_subfinder_path() -> String {
    "subfinder".to_string()
}

fn default_amass_path() -> String {
    "amass".to_string()
}

fn default_httpx_path() -> String {
    "httpx".to_string()
}

fn default_waybackurls_path() -> String {
    "waybackurls".to_string()
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            subfinder_path: default_subfinder_path(),
            amass_path: default_amass_path(),
            httpx_path: default_httpx_path(),
            waybackurls_path: default_waybackurls_path(),
            subfinder_timeout_secs: 0,
            amass_timeout_secs: 0,
            httpx_timeout_secs: 0,
            waybackurls_timeout_secs: 0,
        }
    }
}

/// HTTP client configuration for the crt.sh API
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("scopehound/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Request rate limits
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Certificate-transparency queries per second (0 = unthrottled)
    #[serde(default = "default_crtsh_requests_per_second")]
    pub crtsh_requests_per_second: u32,
}

fn default_crtsh_requests_per_second() -> u32 {
    1
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            crtsh_requests_per_second: default_crtsh_requests_per_second(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tools: ToolsConfig::default(),
            http: HttpConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path, falling back to defaults
    /// when no file exists. A file that exists but fails to parse or
    /// validate is an error.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Self::load_or_default_from(Path::new(CONFIG_PATH))
    }

    pub fn load_or_default_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_path(path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.user_agent.is_empty() {
            return Err(ConfigError::EmptyRequired {
                field: "http.user_agent".to_string(),
            });
        }
        if self.http.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroNotAllowed {
                field: "http.request_timeout_secs".to_string(),
            });
        }

        for (field, value) in [
            ("tools.subfinder_path", &self.tools.subfinder_path),
            ("tools.amass_path", &self.tools.amass_path),
            ("tools.httpx_path", &self.tools.httpx_path),
            ("tools.waybackurls_path", &self.tools.waybackurls_path),
        ] {
            if value.is_empty() {
                return Err(ConfigError::EmptyRequired {
                    field: field.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Create default configuration file at the standard location
    pub fn create_default_config() -> Result<PathBuf, ConfigError> {
        let path = Path::new(CONFIG_PATH);

        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write default config
        let mut file = fs::File::create(path)?;
        file.write_all(DEFAULT_CONFIG.as_bytes())?;

        Ok(path.to_path_buf())
    }
}
