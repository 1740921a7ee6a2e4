//! Application settings configuration
//!
//! Defines resolver timeouts, the host store location and reply texts.

use super::Messages;
use crate::utils::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Expiry resolver settings
#[derive(Debug, Clone, Deserialize)]
pub struct ResolverSettings {
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_handshake_timeout")]
    pub handshake_timeout_secs: u64,
    /// Upper bound on one host's whole resolution (DNS, connect and handshake)
    #[serde(default = "default_deadline")]
    pub deadline_secs: u64,
    #[serde(default = "default_port")]
    pub default_port: u16,
}

fn default_connect_timeout() -> u64 {
    3
}

fn default_handshake_timeout() -> u64 {
    5
}

fn default_deadline() -> u64 {
    8
}

fn default_port() -> u16 {
    443
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            handshake_timeout_secs: default_handshake_timeout(),
            deadline_secs: default_deadline(),
            default_port: default_port(),
        }
    }
}

impl ResolverSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_secs(self.handshake_timeout_secs)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("resolver.connect_timeout_secs", self.connect_timeout_secs),
            ("resolver.handshake_timeout_secs", self.handshake_timeout_secs),
            ("resolver.deadline_secs", self.deadline_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "must be at least one second".to_string(),
                });
            }
        }
        if self.default_port == 0 {
            return Err(ConfigError::InvalidValue {
                key: "resolver.default_port".to_string(),
                message: "port 0 is not connectable".to_string(),
            });
        }
        Ok(())
    }
}

/// Host store settings
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("botdata.json")
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Application settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub resolver: ResolverSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub messages: Messages,
}

impl Settings {
    /// Load settings from the default config file
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_path = Path::new("config/default.toml");
        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load settings from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        Self::from_toml(&content)
    }

    /// Parse and validate settings from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        settings.resolver.validate()?;
        Ok(settings)
    }
}
