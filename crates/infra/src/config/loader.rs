//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Loads a `.env` file from the working directory, if present
//! 2. Attempts to load from environment variables
//! 3. If the required variables are missing, falls back to a config file
//! 4. Probes multiple paths for config files
//! 5. Supports JSON and TOML formats
//!
//! Every loaded configuration is validated before it is returned.
//!
//! ## Environment Variables
//! Required:
//! - `JIRA_BASE_URL`: Site URL, e.g. `https://example.atlassian.net`
//! - `JIRA_USERNAME`: Account email or username
//! - `JIRA_API_TOKEN`: API token
//!
//! Optional (defaults in parentheses):
//! - `JIRA_PROJECT_KEY` (empty)
//! - `JIRA_TIMEOUT`: Request timeout in seconds (30)
//! - `JIRA_RETRY_ATTEMPTS` (3), `JIRA_RETRY_DELAY`: seconds (1)
//! - `JIRA_API_VERSION` (3), `JIRA_USER_AGENT` (`jiralink/0.1`)
//! - `JIRA_RATE_LIMITING_ENABLED` (true), `JIRA_MAX_REQUESTS_PER_MINUTE` (1000)
//! - `JIRA_CACHE_ENABLED` (true), `JIRA_CACHE_TTL`: seconds (3600),
//!   `JIRA_CACHE_MAX_CAPACITY` (10000)
//! - `JIRA_LOGGING_ENABLED` (true), `JIRA_LOG_CHANNEL` (`jiralink`),
//!   `JIRA_LOG_LEVEL` (`info`)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./jiralink.{json,toml}` or `./config.{json,toml}` (current working directory)
//! 2. The same names in the parent and grandparent directories
//! 3. The same names relative to the executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use jiralink_domain::{JiraConfig, JiraError, LogLevel, Result};

use crate::errors::InfraError;

const CONFIG_FILE_NAMES: [&str; 4] = ["jiralink.json", "jiralink.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `JiraError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The loaded configuration fails validation
pub fn load() -> Result<JiraConfig> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// The three credential variables must be present; everything else falls
/// back to its default.
///
/// # Errors
/// Returns `JiraError::Config` if required variables are missing, a value
/// cannot be parsed, or the result fails validation.
pub fn load_from_env() -> Result<JiraConfig> {
    let mut config =
        JiraConfig::new(env_var("JIRA_BASE_URL")?, env_var("JIRA_USERNAME")?, env_var("JIRA_API_TOKEN")?);

    if let Some(project_key) = env_opt("JIRA_PROJECT_KEY") {
        config.project_key = project_key;
    }
    if let Some(timeout) = env_parse("JIRA_TIMEOUT")? {
        config.timeout_seconds = timeout;
    }
    if let Some(attempts) = env_parse("JIRA_RETRY_ATTEMPTS")? {
        config.retry_attempts = attempts;
    }
    if let Some(delay) = env_parse("JIRA_RETRY_DELAY")? {
        config.retry_delay_seconds = delay;
    }
    if let Some(version) = env_opt("JIRA_API_VERSION") {
        config.api_version = version;
    }
    if let Some(agent) = env_opt("JIRA_USER_AGENT") {
        config.user_agent = agent;
    }

    config.rate_limiting.enabled = env_bool("JIRA_RATE_LIMITING_ENABLED", true);
    if let Some(max) = env_parse("JIRA_MAX_REQUESTS_PER_MINUTE")? {
        config.rate_limiting.max_requests_per_minute = max;
    }

    config.cache.enabled = env_bool("JIRA_CACHE_ENABLED", true);
    if let Some(ttl) = env_parse("JIRA_CACHE_TTL")? {
        config.cache.ttl_seconds = ttl;
    }
    if let Some(capacity) = env_parse("JIRA_CACHE_MAX_CAPACITY")? {
        config.cache.max_capacity = capacity;
    }

    config.logging.enabled = env_bool("JIRA_LOGGING_ENABLED", true);
    if let Some(channel) = env_opt("JIRA_LOG_CHANNEL") {
        config.logging.channel = channel;
    }
    if let Some(level) = env_parse::<LogLevel>("JIRA_LOG_LEVEL")? {
        config.logging.level = level;
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `JiraError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The configuration fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<JiraConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(JiraError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            JiraError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path).map_err(InfraError::from)?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<JiraConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => Ok(toml::from_str(contents).map_err(InfraError::from)?),
        "json" => Ok(serde_json::from_str(contents).map_err(InfraError::from)?),
        _ => Err(JiraError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, its parent and grandparent, then
/// the same three levels relative to the executable.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.extend([exe_dir.to_path_buf(), exe_dir.join(".."), exe_dir.join("../..")]);
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `JiraError::Config` if the variable is not set or blank.
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        JiraError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Non-blank value of an optional environment variable.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse an optional environment variable.
///
/// # Errors
/// Returns `JiraError::Config` if the variable is set but does not parse.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| JiraError::Config(format!("Invalid value for {key} ('{raw}'): {e}")))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
