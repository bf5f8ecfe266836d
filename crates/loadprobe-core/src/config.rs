//! Configuration management for the probe server.
//!
//! Supports multiple configuration sources with precedence:
//! 1. Environment variables (highest priority)
//! 2. TOML configuration file
//! 3. Default values (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "loadprobe.toml";

/// Paths served by the host itself.
pub const RESERVED_ROUTES: [&str; 2] = ["/health", "/metrics"];

/// Main configuration structure.
///
/// Can be loaded from TOML file or constructed with defaults.
/// Environment variables override TOML settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Response identity and transient storage
    #[serde(default)]
    pub probe: ProbeConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration (host, port, probe route)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP port (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path the probe endpoint is mounted on (default: "/api/probe")
    #[serde(default = "default_route")]
    pub route: String,
}

/// Identity reported in every response, plus where the I/O workload writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Fixed `message` field (default: "Rust example function")
    #[serde(default = "default_message")]
    pub message: String,

    /// `runtime` field and `x-runtime` header (default: "rust")
    #[serde(default = "default_runtime")]
    pub runtime: String,

    /// Directory for I/O workload files (default: OS temp dir)
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error (default: "info")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty (default: "pretty")
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_route() -> String {
    "/api/probe".to_string()
}

fn default_message() -> String {
    "Rust example function".to_string()
}

fn default_runtime() -> String {
    "rust".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            route: default_route(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            message: default_message(),
            runtime: default_runtime(),
            temp_dir: None,
        }
    }
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
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file doesn't exist or has invalid TOML syntax.
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::TomlError { path, source: e })
    }

    /// Load configuration with environment variable overrides.
    ///
    /// An explicit `path` must exist. Without one, `LOADPROBE_CONFIG` is
    /// consulted, then `./loadprobe.toml` if present, then defaults.
    ///
    /// Supported environment variables:
    /// - `LOADPROBE_HOST`, `LOADPROBE_PORT`, `LOADPROBE_ROUTE`
    /// - `LOADPROBE_MESSAGE`, `LOADPROBE_RUNTIME`, `LOADPROBE_TEMP_DIR`
    /// - `LOADPROBE_LOG_LEVEL`, `LOADPROBE_LOG_FORMAT`
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("LOADPROBE_CONFIG").map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Numeric values that fail to parse are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("LOADPROBE_HOST") {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("LOADPROBE_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }

        if let Ok(route) = std::env::var("LOADPROBE_ROUTE") {
            self.server.route = route;
        }

        if let Ok(message) = std::env::var("LOADPROBE_MESSAGE") {
            self.probe.message = message;
        }

        if let Ok(runtime) = std::env::var("LOADPROBE_RUNTIME") {
            self.probe.runtime = runtime;
        }

        if let Some(dir) = std::env::var_os("LOADPROBE_TEMP_DIR") {
            self.probe.temp_dir = Some(PathBuf::from(dir));
        }

        if let Ok(level) = std::env::var("LOADPROBE_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(format) = std::env::var("LOADPROBE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be non-zero".to_string(),
            ));
        }

        if !self.server.route.starts_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "server.route must start with '/', got '{}'",
                self.server.route
            )));
        }

        if RESERVED_ROUTES.contains(&self.server.route.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "server.route cannot be one of: {}",
                RESERVED_ROUTES.join(", ")
            )));
        }

        if self.probe.runtime.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "probe.runtime cannot be empty".to_string(),
            ));
        }

        // The runtime label is sent verbatim as a header value
        if !self
            .probe
            .runtime
            .bytes()
            .all(|b| b.is_ascii_graphic() || b == b' ')
        {
            return Err(ConfigError::ValidationError(
                "probe.runtime must be printable ASCII".to_string(),
            ));
        }

        if let Some(dir) = &self.probe.temp_dir {
            if !dir.is_dir() {
                return Err(ConfigError::ValidationError(format!(
                    "probe.temp_dir does not exist or is not a directory: {}",
                    dir.display()
                )));
            }
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of: {}",
                valid_levels.join(", ")
            )));
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.format must be one of: {}",
                valid_formats.join(", ")
            )));
        }

        Ok(())
    }

    /// `host:port` string suitable for socket address parsing.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading configuration file
    #[error("Failed to read config file {path:?}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// TOML parsing error
    #[error("Failed to parse TOML in {path:?}: {source}")]
    TomlError {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
