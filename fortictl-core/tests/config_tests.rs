//! Tests for configuration loading

use fortictl_core::config::toml_config::{load_config_with, ENV_HOST, ENV_PASSWORD, ENV_PORT, ENV_USERNAME};
use fortictl_core::config::{PacerTiming, DEFAULT_SSH_PORT};
use fortictl_core::error::{ConfigError, FortiError};
use fortictl_core::shell::TextEncoding;
use std::collections::HashMap;
use std::fs;
use tempfile::tempdir;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_file_values_with_env_password() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
dump_path = "/tmp/vpn_list_output.txt"

[appliance]
host = "10.172.0.1"
port = 1337
username = "automation"

[timing]
list_delay_ms = 3000
timeout_ms = 5000

[decoder]
encodings = ["utf-8", "cp1252"]
"#,
    )
    .unwrap();

    let settings = load_config_with(&path, env(&[(ENV_PASSWORD, "s3cret")])).unwrap();

    assert_eq!(settings.appliance.host, "10.172.0.1");
    assert_eq!(settings.appliance.port, 1337);
    assert_eq!(settings.appliance.username, "automation");
    assert_eq!(settings.timing.list_delay_ms, 3000);
    assert_eq!(settings.timing.timeout_ms, 5000);
    assert_eq!(settings.timing.poll_interval_ms, PacerTiming::default().poll_interval_ms);
    assert_eq!(
        settings.decoder.encodings,
        vec![TextEncoding::Utf8, TextEncoding::Cp1252]
    );
    assert_eq!(
        settings.dump_path.as_deref(),
        Some(std::path::Path::new("/tmp/vpn_list_output.txt"))
    );
}

#[test]
fn test_env_overrides_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[appliance]\nhost = \"old.example.com\"\nport = 2222\n").unwrap();

    let settings = load_config_with(
        &path,
        env(&[
            (ENV_HOST, "fw.example.com"),
            (ENV_PORT, "22"),
            (ENV_USERNAME, "admin"),
            (ENV_PASSWORD, "pw"),
        ]),
    )
    .unwrap();

    assert_eq!(settings.appliance.host, "fw.example.com");
    assert_eq!(settings.appliance.port, DEFAULT_SSH_PORT);
}

#[test]
fn test_missing_file_uses_environment() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let settings = load_config_with(
        &path,
        env(&[
            (ENV_HOST, "fw.example.com"),
            (ENV_USERNAME, "admin"),
            (ENV_PASSWORD, "pw"),
        ]),
    )
    .unwrap();

    assert_eq!(settings.appliance.port, DEFAULT_SSH_PORT);
    assert!(settings.dump_path.is_none());
}

#[test]
fn test_missing_host_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let result = load_config_with(&path, env(&[(ENV_USERNAME, "admin"), (ENV_PASSWORD, "pw")]));

    match result {
        Err(FortiError::Config(ConfigError::MissingField { field })) => assert_eq!(field, ENV_HOST),
        other => panic!("Expected missing host, got {:?}", other.map(|s| s.appliance.host)),
    }
}

#[test]
fn test_zero_poll_interval_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[timing]\npoll_interval_ms = 0\n").unwrap();

    let result = load_config_with(
        &path,
        env(&[
            (ENV_HOST, "fw.example.com"),
            (ENV_USERNAME, "admin"),
            (ENV_PASSWORD, "pw"),
        ]),
    );

    assert!(matches!(
        result,
        Err(FortiError::Config(ConfigError::ValidationError { .. }))
    ));
}

#[test]
fn test_malformed_toml_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[appliance\nhost = ").unwrap();

    let result = load_config_with(&path, env(&[]));

    assert!(matches!(result, Err(FortiError::Toml(_))));
}

#[test]
fn test_unknown_encoding_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[decoder]\nencodings = [\"ebcdic\"]\n").unwrap();

    assert!(matches!(
        load_config_with(&path, env(&[])),
        Err(FortiError::Toml(_))
    ));
}

#[test]
fn test_password_redacted_in_debug_output() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let settings = load_config_with(
        &path,
        env(&[
            (ENV_HOST, "fw.example.com"),
            (ENV_USERNAME, "admin"),
            (ENV_PASSWORD, "hunter2"),
        ]),
    )
    .unwrap();

    assert!(!format!("{:?}", settings).contains("hunter2"));
}
