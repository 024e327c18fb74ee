//! Configuration loading from weather-mcp.toml, `.env`, and the environment.

use serde::Deserialize;
use std::collections::HashMap;
use std::io::{self, Read};
use std::path::Path;
use weather::{DEFAULT_BASE_URL, Endpoint};

/// Environment variables for the API key, in lookup order.
const API_KEY_VARS: [&str; 2] = ["ACCUWEATHER_API_KEY", "API_KEY"];

/// Environment variables for the base URL, in lookup order.
const BASE_URL_VARS: [&str; 2] = ["ACCUWEATHER_BASE_URL", "BASE_URL"];

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Upstream API settings.
    #[serde(default)]
    pub accuweather: AccuWeatherConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Upstream API configuration.
#[derive(Deserialize)]
pub struct AccuWeatherConfig {
    /// AccuWeather API key, sent as `apikey` on every request.
    pub api_key: Option<String>,

    /// API origin; tool paths are appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for AccuWeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
        }
    }
}

impl std::fmt::Debug for AccuWeatherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccuWeatherConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
pub struct LogConfig {
    /// `tracing` filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Override file values with environment variables.
    ///
    /// `lookup` is `std::env::var` in production. Empty values count as unset.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let first_set = |names: &[&str]| {
            names
                .iter()
                .filter_map(|name| lookup(name))
                .find(|value| !value.trim().is_empty())
        };

        if let Some(key) = first_set(&API_KEY_VARS) {
            self.accuweather.api_key = Some(key);
        }
        if let Some(url) = first_set(&BASE_URL_VARS) {
            self.accuweather.base_url = url;
        }
    }

    /// Build the upstream endpoint.
    ///
    /// Requires an API key from the file or the environment.
    pub fn endpoint(&self) -> Result<Endpoint, ConfigError> {
        let api_key = self
            .accuweather
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        Ok(Endpoint::new(&self.accuweather.base_url, api_key)?)
    }
}

/// Variables defined in a dotenv file. A missing file defines none.
pub fn read_dotenv(path: impl AsRef<Path>) -> Result<HashMap<String, String>, ConfigError> {
    match std::fs::File::open(path.as_ref()) {
        Ok(file) => parse_dotenv(file),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(HashMap::new()),
        Err(e) => Err(e.into()),
    }
}

fn parse_dotenv(reader: impl Read) -> Result<HashMap<String, String>, ConfigError> {
    dotenvy::from_read_iter(reader)
        .map(|item| item.map_err(|e| ConfigError::Dotenv(e.to_string())))
        .collect()
}

/// Look names up in the process environment first, then in `dotenv`.
///
/// An empty process value does not hide the dotenv one.
pub fn env_with_dotenv<'a>(
    process: impl Fn(&str) -> Option<String> + 'a,
    dotenv: &'a HashMap<String, String>,
) -> impl Fn(&str) -> Option<String> + 'a {
    move |name| {
        process(name)
            .filter(|value| !value.is_empty())
            .or_else(|| dotenv.get(name).cloned())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("failed to parse .env: {0}")]
    Dotenv(String),

    #[error("API key not configured: set ACCUWEATHER_API_KEY or accuweather.api_key")]
    MissingApiKey,

    #[error("invalid upstream endpoint: {0}")]
    Endpoint(#[from] weather::Error),
}
