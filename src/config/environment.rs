// ABOUTME: Environment-based configuration for the Foodgram server
// ABOUTME: Reads ports, database URL, media paths and request limits from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use super::database::DatabaseUrl;
use crate::constants::{defaults, env_keys};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Log level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    #[default]
    Info,
    /// Debug output
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Parse a level name, falling back to `Info`
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        };
        f.write_str(name)
    }
}

/// Where uploaded recipe images live and how they are addressed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Directory on disk holding media files
    pub root: PathBuf,
    /// URL prefix under which media files are served (always ends with `/`)
    pub url: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(defaults::MEDIA_ROOT),
            url: defaults::MEDIA_URL.to_owned(),
        }
    }
}

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// HTTP API port
    pub http_port: u16,
    /// Log level
    pub log_level: LogLevel,
    /// Database location
    pub database: DatabaseUrl,
    /// Media storage
    pub media: MediaConfig,
    /// Header carrying the authenticated user id set by the upstream auth layer
    pub auth_user_header: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Page size used when a list request omits `limit`
    pub default_page_size: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::HOST.to_owned(),
            http_port: defaults::HTTP_PORT,
            log_level: LogLevel::default(),
            database: DatabaseUrl::default(),
            media: MediaConfig::default(),
            auth_user_header: defaults::AUTH_USER_HEADER.to_owned(),
            request_timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
            default_page_size: foodgram_core::constants::pagination::DEFAULT_PAGE_SIZE,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if any variable holds an unparsable value
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            host: env_var_or(env_keys::HOST, defaults::HOST),
            http_port: parse_env(env_keys::HTTP_PORT, defaults::HTTP_PORT)?,
            log_level: LogLevel::from_str_or_default(&env_var_or(env_keys::RUST_LOG, "info")),
            database: match env::var(env_keys::DATABASE_URL) {
                Ok(url) => DatabaseUrl::parse_url(&url)?,
                Err(_) => DatabaseUrl::default(),
            },
            media: MediaConfig {
                root: PathBuf::from(env_var_or(env_keys::MEDIA_ROOT, defaults::MEDIA_ROOT)),
                url: normalize_media_url(&env_var_or(env_keys::MEDIA_URL, defaults::MEDIA_URL)),
            },
            auth_user_header: env_var_or(env_keys::AUTH_USER_HEADER, defaults::AUTH_USER_HEADER)
                .to_lowercase(),
            request_timeout_secs: parse_env(
                env_keys::REQUEST_TIMEOUT_SECS,
                defaults::REQUEST_TIMEOUT_SECS,
            )?,
            default_page_size: parse_env(
                env_keys::DEFAULT_PAGE_SIZE,
                foodgram_core::constants::pagination::DEFAULT_PAGE_SIZE,
            )?,
        };

        config.validate()?;
        info!("Configuration loaded: {}", config.summary());
        Ok(config)
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` describing the first invalid setting
    pub fn validate(&self) -> AppResult<()> {
        if self.auth_user_header.trim().is_empty() {
            return Err(AppError::config("AUTH_USER_HEADER must not be empty"));
        }
        if http::HeaderName::from_str(&self.auth_user_header).is_err() {
            return Err(AppError::config(format!(
                "AUTH_USER_HEADER is not a valid header name: {}",
                self.auth_user_header
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::config("REQUEST_TIMEOUT_SECS must be positive"));
        }
        if self.default_page_size == 0 {
            return Err(AppError::config("DEFAULT_PAGE_SIZE must be positive"));
        }
        if !self.media.url.starts_with('/') {
            return Err(AppError::config("MEDIA_URL must be an absolute path"));
        }
        if self.media.url == "/" {
            return Err(AppError::config("MEDIA_URL must not be the site root"));
        }
        Ok(())
    }

    /// Request timeout as a `Duration`
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Socket address string for binding
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }

    /// One-line configuration summary for startup logs
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "bind={} database={} media_root={} media_url={} auth_header={} timeout={}s page_size={}",
            self.bind_address(),
            self.database,
            self.media.root.display(),
            self.media.url,
            self.auth_user_header,
            self.request_timeout_secs,
            self.default_page_size,
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, using `default` when unset
fn parse_env<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid {key} value '{raw}': {e}"))),
        Err(_) => Ok(default),
    }
}

/// Ensure the media URL has leading and trailing slashes
fn normalize_media_url(url: &str) -> String {
    let trimmed = url.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else {
        format!("/{trimmed}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            env_keys::HOST,
            env_keys::HTTP_PORT,
            env_keys::DATABASE_URL,
            env_keys::MEDIA_ROOT,
            env_keys::MEDIA_URL,
            env_keys::AUTH_USER_HEADER,
            env_keys::REQUEST_TIMEOUT_SECS,
            env_keys::DEFAULT_PAGE_SIZE,
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_when_env_empty() {
        clear_env();
        let config = ServerConfig::from_env().unwrap();

        assert_eq!(config.http_port, 8000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.auth_user_header, "x-user-id");
        assert_eq!(config.media.url, "/media/");
        assert_eq!(config.default_page_size, 6);
        assert_eq!(config.database, DatabaseUrl::default());
    }

    #[test]
    #[serial]
    fn test_overrides_from_env() {
        clear_env();
        env::set_var(env_keys::HTTP_PORT, "9100");
        env::set_var(env_keys::DATABASE_URL, "sqlite::memory:");
        env::set_var(env_keys::MEDIA_URL, "uploads");
        env::set_var(env_keys::AUTH_USER_HEADER, "X-Forwarded-User");

        let config = ServerConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.http_port, 9100);
        assert!(config.database.is_memory());
        assert_eq!(config.media.url, "/uploads/");
        assert_eq!(config.auth_user_header, "x-forwarded-user");
    }

    #[test]
    #[serial]
    fn test_invalid_port_is_config_error() {
        clear_env();
        env::set_var(env_keys::HTTP_PORT, "not-a-port");
        let result = ServerConfig::from_env();
        clear_env();

        let err = result.unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::ConfigError);
        assert!(err.message.contains("HTTP_PORT"));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let config = ServerConfig {
            default_page_size: 0,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_root_media_url_rejected() {
        let config = ServerConfig {
            media: MediaConfig {
                url: "/".to_owned(),
                ..MediaConfig::default()
            },
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
