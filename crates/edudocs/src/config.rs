//! # Configuration
//!
//! [`AppConfig`] is read from the environment (after loading a `.env` file, if present)
//! and can then be overridden from the command line.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `EDUDOCS_API_URL` | `http://localhost:3000/api` |
//! | `EDUDOCS_API_TOKEN` | none |
//! | `EDUDOCS_ROLE` | `teacher` |
//! | `EDUDOCS_TIMEOUT_SECS` | `30` |
//! | `EDUDOCS_BUFFER_SIZE` | `32` |

use crate::model::Role;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BUFFER_SIZE: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{key}={value:?} is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime settings of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    pub role: Role,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// Request channel capacity of every store.
    pub buffer_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            role: Role::Teacher,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl AppConfig {
    /// Loads `.env` and reads the `EDUDOCS_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get("EDUDOCS_API_URL") {
            config.api_url = url;
        }
        config.api_token = get("EDUDOCS_API_TOKEN");
        if let Some(role) = get("EDUDOCS_ROLE") {
            config.role = role.parse().map_err(|e: crate::model::ParseRoleError| {
                ConfigError::Invalid {
                    key: "EDUDOCS_ROLE",
                    value: role.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        if let Some(secs) = get("EDUDOCS_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(parse_positive("EDUDOCS_TIMEOUT_SECS", &secs)?);
        }
        if let Some(size) = get("EDUDOCS_BUFFER_SIZE") {
            config.buffer_size = parse_positive("EDUDOCS_BUFFER_SIZE", &size)? as usize;
        }
        Ok(config)
    }
}

fn parse_positive(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    let invalid = |reason: &str| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    };
    match value.trim().parse::<u64>() {
        Ok(0) => Err(invalid("must be greater than zero")),
        Ok(n) => Ok(n),
        Err(_) => Err(invalid("not a number")),
    }
}
