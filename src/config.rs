//! Server configuration
//!
//! Settings are resolved once at startup and passed by reference afterwards.
//! Each value is taken from the first source that provides it, in this order: a
//! command-line flag, an environment variable, the TOML config file, the default.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::time::Duration;

use crate::gitlab::client::DEFAULT_REQUEST_TIMEOUT;
use crate::tools::registry::DEFAULT_TOOLSETS;

pub const ENV_TOKEN: &str = "GITLAB_TOKEN";
pub const ENV_HOST: &str = "GITLAB_HOST";
pub const ENV_TOOLSETS: &str = "GITLAB_TOOLSETS";
pub const ENV_READ_ONLY: &str = "GITLAB_READ_ONLY";
pub const ENV_DYNAMIC_TOOLSETS: &str = "GITLAB_DYNAMIC_TOOLSETS";
pub const ENV_TIMEOUT: &str = "GITLAB_TIMEOUT";

const CONFIG_DIR_NAME: &str = "gitlab-insight";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Required configuration missing: GITLAB_TOKEN (or --gitlab-token) must be set")]
    MissingToken,
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Values given on the command line; `None`/`false` means "not given"
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub token: Option<String>,
    pub host: Option<String>,
    pub toolsets: Option<String>,
    pub read_only: bool,
    pub dynamic_toolsets: bool,
    pub timeout_secs: Option<u64>,
    pub debug: bool,
    pub config_path: Option<PathBuf>,
}

/// Contents of the optional TOML config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub token: Option<String>,
    pub host: Option<String>,
    pub toolsets: Option<Vec<String>>,
    pub read_only: Option<bool>,
    pub dynamic_toolsets: Option<bool>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Fully resolved server settings
#[derive(Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub token: String,
    pub host: Option<String>,
    pub toolsets: Vec<String>,
    pub read_only: bool,
    pub dynamic_toolsets: bool,
    pub request_timeout_secs: u64,
    pub log_level: String,
}

// The token is never printed.
impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("token", &"<redacted>")
            .field("host", &self.host)
            .field("toolsets", &self.toolsets)
            .field("read_only", &self.read_only)
            .field("dynamic_toolsets", &self.dynamic_toolsets)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl ServerConfig {
    /// Resolves the configuration from flags, the process environment and the
    /// config file.
    pub fn load(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::resolve(overrides, |key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::load`] with an explicit environment lookup.
    pub fn resolve<F>(overrides: ConfigOverrides, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match &overrides.config_path {
            Some(path) => FileConfig::from_path(path)?,
            None => match default_config_path().filter(|path| path.is_file()) {
                Some(path) => FileConfig::from_path(&path)?,
                None => FileConfig::default(),
            },
        };
        let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let token = overrides
            .token
            .filter(|token| !token.trim().is_empty())
            .or_else(|| env(ENV_TOKEN))
            .or(file.token)
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let host = overrides
            .host
            .filter(|host| !host.trim().is_empty())
            .or_else(|| env(ENV_HOST))
            .or(file.host.filter(|host| !host.trim().is_empty()))
            .map(|host| host.trim().to_string());

        let toolsets = overrides
            .toolsets
            .map(|value| split_toolsets(&value))
            .filter(|names| !names.is_empty())
            .or_else(|| env(ENV_TOOLSETS).map(|value| split_toolsets(&value)))
            .filter(|names| !names.is_empty())
            .or_else(|| {
                file.toolsets.map(|names| {
                    names
                        .iter()
                        .map(|name| name.trim().to_string())
                        .filter(|name| !name.is_empty())
                        .collect::<Vec<_>>()
                })
            })
            .filter(|names| !names.is_empty())
            .unwrap_or_else(|| DEFAULT_TOOLSETS.iter().map(|name| name.to_string()).collect());

        let read_only = overrides.read_only
            || env(ENV_READ_ONLY)
                .map(|value| parse_flag(&value))
                .or(file.read_only)
                .unwrap_or(false);

        let dynamic_toolsets = overrides.dynamic_toolsets
            || env(ENV_DYNAMIC_TOOLSETS)
                .map(|value| parse_flag(&value))
                .or(file.dynamic_toolsets)
                .unwrap_or(false);

        let request_timeout_secs = match overrides.timeout_secs {
            Some(secs) => secs,
            None => match env(ENV_TIMEOUT) {
                Some(value) => value
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| ConfigError::InvalidValue {
                        key: ENV_TIMEOUT,
                        value: value.clone(),
                        reason: e.to_string(),
                    })?,
                None => file
                    .timeout_secs
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT.as_secs()),
            },
        };
        if request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timeout",
                value: "0".to_string(),
                reason: "must be at least 1 second".to_string(),
            });
        }

        let log_level = if overrides.debug { "debug" } else { "info" }.to_string();

        Ok(Self {
            token,
            host,
            toolsets,
            read_only,
            dynamic_toolsets,
            request_timeout_secs,
            log_level,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// `$XDG_CONFIG_HOME/gitlab-insight/config.toml` or the platform equivalent
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn split_toolsets(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1")
}
