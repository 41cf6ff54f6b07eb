//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::io::Write;

use jiralink_domain::{JiraError, LogLevel};
use jiralink_infra::config;
use tempfile::NamedTempFile;

fn write_config(contents: &str, extension: &str) -> std::path::PathBuf {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    path
}

#[test]
fn test_load_config_from_json_file() {
    let json_content = r#"{
        "base_url": "https://example.atlassian.net",
        "username": "bot@example.com",
        "api_token": "token-123",
        "project_key": "OPS",
        "timeout_seconds": 15,
        "retry_attempts": 2,
        "rate_limiting": {
            "enabled": true,
            "max_requests_per_minute": 300
        },
        "cache": {
            "enabled": false,
            "ttl_seconds": 60,
            "max_capacity": 500
        },
        "logging": {
            "enabled": true,
            "channel": "ops-jira",
            "level": "debug"
        }
    }"#;
    let path = write_config(json_content, "json");

    let config = config::load_from_file(Some(path.clone())).expect("Failed to load config");

    // Verify connection settings
    assert_eq!(config.base_url, "https://example.atlassian.net");
    assert_eq!(config.username, "bot@example.com");
    assert_eq!(config.api_token, "token-123");
    assert_eq!(config.project_key, "OPS");
    assert_eq!(config.timeout_seconds, 15);
    assert_eq!(config.retry_attempts, 2);

    // Verify sections
    assert_eq!(config.rate_limiting.max_requests_per_minute, 300);
    assert!(!config.cache.enabled);
    assert_eq!(config.cache.ttl_seconds, 60);
    assert_eq!(config.cache.max_capacity, 500);
    assert_eq!(config.logging.channel, "ops-jira");
    assert_eq!(config.logging.level, LogLevel::Debug);

    // Omitted fields keep their defaults
    assert_eq!(config.retry_delay_seconds, 1);
    assert_eq!(config.api_version, "3");

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_toml_file() {
    let toml_content = r#"
base_url = "https://example.atlassian.net/"
username = "bot@example.com"
api_token = "token-123"

[cache]
ttl_seconds = 30
"#;
    let path = write_config(toml_content, "toml");

    let config = config::load_from_file(Some(path.clone())).expect("Failed to load config");

    assert_eq!(config.cache.ttl_seconds, 30);
    assert!(config.cache.enabled);
    assert_eq!(config.rate_limiting.max_requests_per_minute, 1000);
    assert_eq!(config.logging.level, LogLevel::Info);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_with_malformed_json() {
    let path = write_config(r#"{"base_url": "https://example.atlassian.net", "#, "json");

    let result = config::load_from_file(Some(path.clone()));
    match result {
        Err(JiraError::Config(msg)) => assert!(msg.contains("JSON")),
        other => panic!("expected config error, got {:?}", other),
    }

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_missing_credentials() {
    let path = write_config(r#"{"base_url": "https://example.atlassian.net"}"#, "json");

    assert!(matches!(config::load_from_file(Some(path.clone())), Err(JiraError::Config(_))));

    std::fs::remove_file(path).ok();
}
