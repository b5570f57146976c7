//! Configuration loading for WellMind.
//! Reads wellmind.toml from the current directory or the path in the
//! WELLMIND_CONFIG env var, then applies environment overrides.
//!
//! A missing default file is not an error: every field has a default, so the
//! server runs with no configuration at all (local scoring, background
//! notifications to http://localhost:3000).

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub delegate: DelegateConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Base URL the notification routes are reached at.
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind(), public_url: default_public_url() }
    }
}

fn default_bind()       -> String { "127.0.0.1:3000".to_string() }
fn default_public_url() -> String { "http://localhost:3000".to_string() }

/// External scoring service. When `url` is set it replaces local scoring.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DelegateConfig {
    pub url: Option<String>,
    /// Reject delegate responses that are not a well-formed risk assessment.
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Notifications are awaited before the prediction responds.
    Inline,
    /// Notifications are queued and delivered by a worker task.
    #[default]
    Background,
}

impl std::str::FromStr for DispatchMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inline" => Ok(DispatchMode::Inline),
            "background" => Ok(DispatchMode::Background),
            other => Err(ConfigError::InvalidValue {
                key: "notify.mode".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub mode: DispatchMode,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self { mode: DispatchMode::default(), queue_capacity: default_queue_capacity() }
    }
}

fn default_queue_capacity() -> usize { 64 }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Timeout applied to every outbound call (delegate and notifications).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: default_timeout_secs() }
    }
}

fn default_timeout_secs() -> u64 { 10 }


impl AppConfig {
    /// Load configuration from wellmind.toml and the process environment.
    /// Checks WELLMIND_CONFIG env var first, then current directory.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var("WELLMIND_CONFIG").ok();
        let path = explicit.clone().unwrap_or_else(|| "wellmind.toml".to_string());

        let mut config = if Path::new(&path).exists() {
            tracing::info!("Loading configuration from {}", path);
            Self::from_file(Path::new(&path))?
        } else if explicit.is_some() {
            return Err(ConfigError::NotFound(path));
        } else {
            tracing::debug!("No {} found, using defaults", path);
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment overrides using `lookup` to read variables.
    ///
    /// An empty `AI_BACKEND_URL` clears the delegate, so local scoring is used.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("AI_BACKEND_URL") {
            let url = url.trim();
            self.delegate.url = if url.is_empty() { None } else { Some(url.to_string()) };
        }
        if let Some(url) = lookup("NEXT_PUBLIC_URL").filter(|u| !u.trim().is_empty()) {
            self.server.public_url = url.trim().to_string();
        }
        if let Some(bind) = lookup("WELLMIND_BIND").filter(|b| !b.trim().is_empty()) {
            self.server.bind = bind.trim().to_string();
        }
        if let Some(mode) = lookup("WELLMIND_NOTIFY_MODE") {
            self.notify.mode = mode.parse()?;
        }
        if let Some(strict) = lookup("WELLMIND_STRICT_DELEGATE") {
            self.delegate.strict = parse_bool("WELLMIND_STRICT_DELEGATE", &strict)?;
        }
        if let Some(secs) = lookup("WELLMIND_HTTP_TIMEOUT_SECS") {
            self.http.timeout_secs = secs.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "WELLMIND_HTTP_TIMEOUT_SECS".to_string(),
                value: secs.clone(),
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if self.notify.queue_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "notify.queue_capacity".to_string(),
                value: "0".to_string(),
            });
        }
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "http.timeout_secs".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.bind.parse().map_err(|_| ConfigError::InvalidValue {
            key: "server.bind".to_string(),
            value: self.server.bind.clone(),
        })
    }

    /// Public base URL without a trailing slash.
    pub fn notify_base_url(&self) -> &str {
        self.server.public_url.trim_end_matches('/')
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue { key: key.to_string(), value: value.to_string() }),
    }
}
