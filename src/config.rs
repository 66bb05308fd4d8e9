//! Service configuration parsed from environment variables.

use std::path::PathBuf;

use crate::rate_limit::{MAX_WINDOW_MINUTES, RateLimitPolicy};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_WEBSITE_DIR: &str = "website";
pub const DEFAULT_BACKEND_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_BACKEND_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_RATE_LIMIT_TABLE: &str = "rate_limits";
pub const DEFAULT_CONTACT_TABLE: &str = "contact_messages";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

/// Hosted table service settings. Present only when both URL and key are set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeouts: BackendTimeouts,
    pub rate_limit_table: String,
    pub contact_table: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub website_dir: PathBuf,
    pub content_path: Option<PathBuf>,
    /// `None` runs against the in-process store.
    pub backend: Option<BackendConfig>,
    pub rate_limit: RateLimitPolicy,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `WEBSITE_DIR`: static site root, default `website`
    /// - `CONTENT_PATH`: YAML content file, built-in content when absent
    /// - `BACKEND_URL` + `BACKEND_API_KEY`: hosted table service
    /// - `BACKEND_REQUEST_TIMEOUT_SECS`: default 10
    /// - `BACKEND_CONNECT_TIMEOUT_SECS`: default 5
    /// - `RATE_LIMIT_TABLE`: default `rate_limits`
    /// - `CONTACT_TABLE`: default `contact_messages`
    /// - `RATE_LIMIT_MAX_ATTEMPTS`: default 5
    /// - `RATE_LIMIT_WINDOW_MINUTES`: default 15, at most 1440
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for unparseable, zero or
    /// out-of-range numeric values.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = env_parse("PORT", DEFAULT_PORT)?;
        let website_dir = std::env::var("WEBSITE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_WEBSITE_DIR));
        let content_path = env_non_empty("CONTENT_PATH").map(PathBuf::from);

        let max_attempts = env_parse_positive("RATE_LIMIT_MAX_ATTEMPTS", RateLimitPolicy::DEFAULT_MAX_ATTEMPTS)?;
        let window_minutes =
            env_parse_positive("RATE_LIMIT_WINDOW_MINUTES", RateLimitPolicy::DEFAULT_WINDOW_MINUTES)?;
        if window_minutes > MAX_WINDOW_MINUTES {
            return Err(ConfigError::InvalidValue {
                var: "RATE_LIMIT_WINDOW_MINUTES".into(),
                value: window_minutes.to_string(),
            });
        }

        Ok(Self {
            port,
            website_dir,
            content_path,
            backend: BackendConfig::from_env()?,
            rate_limit: RateLimitPolicy::new(max_attempts, window_minutes),
        })
    }
}

impl BackendConfig {
    /// Returns `Ok(None)` if `BACKEND_URL` or `BACKEND_API_KEY` is missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for unparseable timeouts.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let (Some(base_url), Some(api_key)) = (env_non_empty("BACKEND_URL"), env_non_empty("BACKEND_API_KEY")) else {
            return Ok(None);
        };
        let timeouts = BackendTimeouts {
            request_secs: env_parse_positive("BACKEND_REQUEST_TIMEOUT_SECS", DEFAULT_BACKEND_REQUEST_TIMEOUT_SECS)?,
            connect_secs: env_parse_positive("BACKEND_CONNECT_TIMEOUT_SECS", DEFAULT_BACKEND_CONNECT_TIMEOUT_SECS)?,
        };
        Ok(Some(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            timeouts,
            rate_limit_table: env_non_empty("RATE_LIMIT_TABLE").unwrap_or_else(|| DEFAULT_RATE_LIMIT_TABLE.into()),
            contact_table: env_non_empty("CONTACT_TABLE").unwrap_or_else(|| DEFAULT_CONTACT_TABLE.into()),
        }))
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match env_non_empty(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue { var: key.into(), value: raw }),
    }
}

fn env_parse_positive<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default + ToString,
{
    let value = env_parse(key, default)?;
    if value > T::default() {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue { var: key.into(), value: value.to_string() })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
