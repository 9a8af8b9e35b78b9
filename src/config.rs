//! Configuration management for qagen
//!
//! Parses TOML configuration files, applies `GEMINI_API_KEY` / `GEMINI_MODEL`
//! environment overrides, and validates the result once at startup.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::str::FromStr;

/// Config file consulted when no `--config` path is given
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Environment variable holding the model API credential
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Environment variable holding the model identifier
pub const MODEL_ENV: &str = "GEMINI_MODEL";

/// Default base URL of the Generative Language REST API
pub const DEFAULT_MODEL_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Resolve the listen address; `host` must be an IP literal
    pub fn socket_addr(&self) -> AppResult<SocketAddr> {
        let ip: IpAddr = self.host.trim().parse().map_err(|_| {
            AppError::Config(format!(
                "server host '{}' is not a valid IP address",
                self.host
            ))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Hosted model configuration
///
/// Fields are private so the validated credential and model name cannot be
/// changed after startup. The only ways in are deserialization and
/// [`Config::with_overrides`].
#[derive(Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default = "default_base_url")]
    base_url: String,
}

impl ModelConfig {
    /// Get the API credential (empty until validated)
    pub fn api_key(&self) -> &str {
        self.api_key.as_deref().unwrap_or_default()
    }

    /// Get the model identifier (empty until validated)
    ///
    /// A leading `models/` resource prefix is dropped, so `models/gemini-pro`
    /// and `gemini-pro` name the same model.
    pub fn name(&self) -> &str {
        let name = self.name.as_deref().unwrap_or_default();
        name.strip_prefix("models/").unwrap_or(name)
    }

    /// Get the API base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            name: None,
            base_url: default_base_url(),
        }
    }
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn default_base_url() -> String {
    DEFAULT_MODEL_BASE_URL.to_string()
}

/// Static asset configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetsConfig {
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            static_dir: default_static_dir(),
        }
    }
}

fn default_static_dir() -> String {
    "static".to_string()
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Credential and model values taken from the process environment
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
}

impl EnvOverrides {
    /// Read `GEMINI_API_KEY` and `GEMINI_MODEL`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through an arbitrary lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v: &String| !v.is_empty());
        Self {
            api_key: non_empty(API_KEY_ENV),
            model: non_empty(MODEL_ENV),
        }
    }
}

impl Config {
    /// Load the startup configuration
    ///
    /// An explicit `path` must exist. Without one, `config.toml` is used if
    /// present and built-in defaults otherwise. `GEMINI_API_KEY` and
    /// `GEMINI_MODEL` from the process environment are applied before
    /// validation, so a missing credential or model name fails here and the
    /// server never starts.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        Self::load_with(path, EnvOverrides::from_env())
    }

    /// Same as [`Config::load`] with explicit overrides instead of the process environment
    pub fn load_with(path: Option<&Path>, overrides: EnvOverrides) -> AppResult<Self> {
        let (source, config) = match path {
            Some(p) => (p.display().to_string(), Self::read(p)?),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => (
                DEFAULT_CONFIG_PATH.to_string(),
                Self::read(Path::new(DEFAULT_CONFIG_PATH))?,
            ),
            None => ("<defaults>".to_string(), Self::default()),
        };

        let config = config.with_overrides(overrides);

        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: source,
                reason: e.to_string(),
            })?;

        tracing::debug!(model = %config.model.name(), "Configuration loaded");
        Ok(config)
    }

    fn read(path: &Path) -> AppResult<Self> {
        let path_display = path.display().to_string();

        let content =
            std::fs::read_to_string(path).map_err(|source| AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            })?;

        toml::from_str(&content).map_err(|source| AppError::ConfigParseFailed {
            path: path_display,
            source,
        })
    }

    /// Replace the credential and model name with any values present in `overrides`
    pub fn with_overrides(mut self, overrides: EnvOverrides) -> Self {
        if let Some(api_key) = overrides.api_key {
            self.model.api_key = Some(api_key);
        }
        if let Some(model) = overrides.model {
            self.model.name = Some(model);
        }
        self
    }

    /// Validate configuration after parsing
    ///
    /// Called by `from_str()` and `load_with()`.
    pub fn validate(&self) -> AppResult<()> {
        if self.model.api_key().trim().is_empty() {
            return Err(AppError::Config(format!(
                "model API key is not set. Set {} in the environment or .env file, \
                or api_key under [model] in the config file.",
                API_KEY_ENV
            )));
        }

        if self.model.name().trim().is_empty() {
            return Err(AppError::Config(format!(
                "model name is not set. Set {} in the environment or .env file, \
                or name under [model] in the config file.",
                MODEL_ENV
            )));
        }

        let base_url = self.model.base_url();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "model base_url '{}' must start with 'http://' or 'https://'",
                base_url
            )));
        }

        if self.server.port == 0 {
            return Err(AppError::Config(
                "server port must be greater than 0".to_string(),
            ));
        }

        self.server.socket_addr()?;

        let level = self.observability.log_level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(AppError::Config(format!(
                "log_level '{}' is not one of {}",
                self.observability.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }
}

impl FromStr for Config {
    type Err = AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config =
            toml::from_str(toml_str).map_err(|source| AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }
}
