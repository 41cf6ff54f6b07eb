//! Client configuration
//!
//! Read once at construction time, either from the environment or from a
//! JSON/TOML file (see the infra crate's loader). Every section has serde
//! defaults so partial files are accepted.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{
    DEFAULT_API_VERSION, DEFAULT_CACHE_MAX_CAPACITY, DEFAULT_CACHE_TTL_SECS, DEFAULT_LOG_CHANNEL,
    DEFAULT_MAX_REQUESTS_PER_MINUTE, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY_SECS,
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use crate::errors::{JiraError, Result};
use crate::impl_wire_name_conversions;

/// Minimum severity a log event must have to be emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl_wire_name_conversions!(LogLevel {
    Trace => "trace",
    Debug => "debug",
    Info => "info",
    Warn => "warn",
    Error => "error",
});

/// Top-level client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JiraConfig {
    pub base_url: String,
    pub username: String,
    pub api_token: String,
    #[serde(default)]
    pub project_key: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    #[serde(default = "default_retry_delay_seconds")]
    pub retry_delay_seconds: u64,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub rate_limiting: RateLimitConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Local admission control settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_max_requests_per_minute")]
    pub max_requests_per_minute: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { enabled: true, max_requests_per_minute: DEFAULT_MAX_REQUESTS_PER_MINUTE }
    }
}

/// Response cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_cache_ttl_seconds")]
    pub ttl_seconds: u64,
    #[serde(default = "default_cache_max_capacity")]
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: DEFAULT_CACHE_TTL_SECS,
            max_capacity: DEFAULT_CACHE_MAX_CAPACITY,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

/// Dispatch event logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_log_channel")]
    pub channel: String,
    #[serde(default)]
    pub level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { enabled: true, channel: DEFAULT_LOG_CHANNEL.to_string(), level: LogLevel::Info }
    }
}

impl JiraConfig {
    /// Configuration with the given credentials and every other field at its
    /// default.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            api_token: api_token.into(),
            project_key: String::new(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay_seconds: DEFAULT_RETRY_DELAY_SECS,
            api_version: DEFAULT_API_VERSION.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            rate_limiting: RateLimitConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    pub fn with_project_key(mut self, project_key: impl Into<String>) -> Self {
        self.project_key = project_key.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_seconds)
    }

    /// Check the fields every request depends on.
    ///
    /// # Errors
    /// Returns `JiraError::Config` for blank credentials, a base URL that is
    /// not an absolute http(s) URL, or a zero timeout.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(JiraError::Config("Base URL is required".to_string()));
        }
        if self.username.trim().is_empty() {
            return Err(JiraError::Config("Username is required".to_string()));
        }
        if self.api_token.trim().is_empty() {
            return Err(JiraError::Config("API token is required".to_string()));
        }

        let parsed = Url::parse(&self.base_url)
            .map_err(|e| JiraError::Config(format!("Invalid base URL '{}': {e}", self.base_url)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(JiraError::Config(format!(
                "Base URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        if self.timeout_seconds == 0 {
            return Err(JiraError::Config("Timeout must be greater than zero".to_string()));
        }

        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_retry_attempts() -> u32 {
    DEFAULT_RETRY_ATTEMPTS
}

fn default_retry_delay_seconds() -> u64 {
    DEFAULT_RETRY_DELAY_SECS
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_max_requests_per_minute() -> u64 {
    DEFAULT_MAX_REQUESTS_PER_MINUTE
}

fn default_cache_ttl_seconds() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

fn default_cache_max_capacity() -> u64 {
    DEFAULT_CACHE_MAX_CAPACITY
}

fn default_log_channel() -> String {
    DEFAULT_LOG_CHANNEL.to_string()
}
