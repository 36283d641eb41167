//! Tests for loading client configuration.

use std::fs;
use std::time::Duration;
use strictly_reversi::{ClientConfig, SERVER_URL_ENV};
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("client.toml");
    fs::write(&path, content).expect("Failed to write TOML");
    path
}

#[test]
fn test_full_config() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(
        &dir,
        r#"server_url = "http://localhost:8080"
poll_interval_ms = 500
request_timeout_ms = 2000
"#,
    );

    let config = ClientConfig::from_file(&path).expect("Load failed");
    assert_eq!(config.server_url().as_deref(), Some("http://localhost:8080"));
    assert_eq!(config.poll_interval(), Duration::from_millis(500));
    assert_eq!(config.request_timeout(), Duration::from_secs(2));
}

#[test]
fn test_missing_keys_take_defaults() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(&dir, "");

    let config = ClientConfig::from_file(&path).expect("Load failed");
    assert_eq!(config, ClientConfig::default());
}

#[test]
fn test_invalid_configs_rejected() {
    let dir = TempDir::new().expect("Failed to create temp dir");

    let path = write_config(&dir, "poll_interval_ms = \"soon\"");
    assert!(ClientConfig::from_file(&path).is_err());

    let path = write_config(&dir, "poll_interval_ms = 0");
    let err = ClientConfig::from_file(&path).unwrap_err();
    assert!(err.message.contains("poll_interval_ms"));

    assert!(ClientConfig::from_file(dir.path().join("missing.toml")).is_err());
}

#[test]
fn test_environment_overrides_file() {
    // Only test in this binary touching the process environment.
    unsafe { std::env::set_var(SERVER_URL_ENV, "http://override:9000") };
    let config = ClientConfig::default()
        .with_server_url("http://file:8080")
        .with_env_overrides();
    unsafe { std::env::remove_var(SERVER_URL_ENV) };

    assert_eq!(config.server_url().as_deref(), Some("http://override:9000"));
}
