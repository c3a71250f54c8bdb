//! Configuration loading for GFN Lab.
//! Reads gfnlab.toml from the current directory or the path in GFNLAB_CONFIG.
//! A missing file yields the defaults; a malformed one is an error.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::Path;
use thiserror::Error;

pub const CONFIG_ENV: &str = "GFNLAB_CONFIG";
pub const MAIL_API_KEY_ENV: &str = "GFNLAB_MAIL_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read { path: String, source: std::io::Error },

    #[error("invalid config in {path}: {source}")]
    Parse { path: String, source: toml::de::Error },

    #[error("invalid listen address {0}")]
    Address(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_host()       -> String { "127.0.0.1".to_string() }
fn default_port()       -> u16    { 8000 }
fn default_static_dir() -> String { "static".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl ServerConfig {
    /// First address `host:port` resolves to; `host` may be a name such as "localhost".
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or_else(|| ConfigError::Address(format!("{}:{}", self.host, self.port)))
    }
}

/// Outbound mail relay. Delivery is disabled while `endpoint` is unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// HTTP endpoint of the mail relay (Mailgun-style messages API)
    pub endpoint: Option<String>,
    /// Relay API key; falls back to GFNLAB_MAIL_API_KEY
    #[serde(skip_serializing)]
    pub api_key: Option<SecretString>,
    #[serde(default = "default_from")]
    pub from: String,
    #[serde(default = "default_subject")]
    pub subject: String,
    #[serde(default = "default_signature")]
    pub signature: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_from()         -> String { "GFN Lab <noreply@localhost>".to_string() }
fn default_subject()      -> String { "Sieve Analysis Result – GFN".to_string() }
fn default_signature()    -> String { "Designed by Subhash".to_string() }
fn default_timeout_secs() -> u64    { 10 }

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            from: default_from(),
            subject: default_subject(),
            signature: default_signature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl MailConfig {
    /// Key from the file, else from the environment. Empty strings count as unset.
    pub fn resolved_api_key(&self) -> Option<SecretString> {
        self.api_key
            .clone()
            .filter(|k| !k.expose_secret().is_empty())
            .or_else(|| {
                std::env::var(MAIL_API_KEY_ENV)
                    .ok()
                    .filter(|k| !k.is_empty())
                    .map(SecretString::from)
            })
    }

    pub fn is_enabled(&self) -> bool {
        self.endpoint.as_deref().is_some_and(|e| !e.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// YAML file replacing the built-in experiment catalog
    pub path: Option<String>,
}

mod tests;

impl Config {
    /// Load configuration from gfnlab.toml.
    /// Checks GFNLAB_CONFIG env var first, then current directory.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| "gfnlab.toml".to_string());

        if !Path::new(&path).exists() {
            tracing::info!("No config file at {path}, using defaults");
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }
}
