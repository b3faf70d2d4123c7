//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.

use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api/";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token: None,
            user_agent: format!("cms-admin/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Query cache and list settings
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    pub stale_time: Duration,
    pub page_size: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(30),
            page_size: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogConfig {
    pub format: LogFormat,
}

/// Complete application settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub api: ApiConfig,
    pub cache: CacheConfig,
    pub log: LogConfig,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();

        let base_url = lookup("CMS_API_URL").unwrap_or(defaults.api.base_url);
        validate_api_url(&base_url)?;

        let api = ApiConfig {
            base_url,
            token: lookup("CMS_API_TOKEN").filter(|t| !t.trim().is_empty()),
            user_agent: lookup("CMS_USER_AGENT").unwrap_or(defaults.api.user_agent),
        };

        let cache = CacheConfig {
            stale_time: match lookup("CMS_CACHE_STALE_SECS") {
                Some(v) => Duration::from_secs(parse_number("CMS_CACHE_STALE_SECS", &v)?),
                None => defaults.cache.stale_time,
            },
            page_size: match lookup("CMS_PAGE_SIZE") {
                Some(v) => parse_number("CMS_PAGE_SIZE", &v)?,
                None => defaults.cache.page_size,
            },
        };
        if cache.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "CMS_PAGE_SIZE",
                reason: "must be at least 1".to_string(),
            });
        }

        let log = LogConfig {
            format: match lookup("LOG_FORMAT").as_deref().map(str::trim) {
                None | Some("") | Some("compact") => LogFormat::Compact,
                Some("json") => LogFormat::Json,
                Some(other) => {
                    return Err(ConfigError::InvalidValue {
                        name: "LOG_FORMAT",
                        reason: format!("expected 'compact' or 'json', got '{}'", other),
                    })
                }
            },
        };

        Ok(Self { api, cache, log })
    }
}

/// Reject anything that is not an absolute http(s) URL.
pub fn validate_api_url(value: &str) -> Result<(), ConfigError> {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        Ok(parsed) => Err(ConfigError::InvalidValue {
            name: "CMS_API_URL",
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        }),
        Err(e) => Err(ConfigError::InvalidValue {
            name: "CMS_API_URL",
            reason: e.to_string(),
        }),
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        reason: format!("'{}' is not a valid number", value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = load(&[]).unwrap();
        assert_eq!(settings.api.base_url, "http://localhost:3000/api/");
        assert_eq!(settings.cache.stale_time, Duration::from_secs(30));
        assert_eq!(settings.cache.page_size, 10);
        assert_eq!(settings.log.format, LogFormat::Compact);
        assert!(settings.api.token.is_none());
    }

    #[test]
    fn test_overrides() {
        let settings = load(&[
            ("CMS_API_URL", "https://cms.example.com/api"),
            ("CMS_API_TOKEN", "abc"),
            ("CMS_CACHE_STALE_SECS", "5"),
            ("CMS_PAGE_SIZE", "25"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();
        assert_eq!(settings.api.base_url, "https://cms.example.com/api");
        assert_eq!(settings.api.token.as_deref(), Some("abc"));
        assert_eq!(settings.cache.stale_time, Duration::from_secs(5));
        assert_eq!(settings.cache.page_size, 25);
        assert_eq!(settings.log.format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values() {
        assert!(load(&[("CMS_API_URL", "ftp://example.com")]).is_err());
        assert!(load(&[("CMS_API_URL", "not a url")]).is_err());
        assert!(load(&[("CMS_PAGE_SIZE", "0")]).is_err());
        assert!(load(&[("CMS_CACHE_STALE_SECS", "soon")]).is_err());
        assert!(load(&[("LOG_FORMAT", "pretty")]).is_err());
    }
}
