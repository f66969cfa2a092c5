//! Tests for config module

use job_xml_converter::cli::{build_command, config_from_matches};
use job_xml_converter::config::ServerConfig;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("server.toml");

    let config_content = r#"
host = "127.0.0.1"
port = 8080
fetch_timeout_secs = 10
max_download_bytes = 1048576
max_upload_bytes = 2097152
log_level = "debug"
"#;

    fs::write(&config_path, config_content).unwrap();

    let config = ServerConfig::from_toml_file(&config_path).unwrap();

    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 8080);
    assert_eq!(config.fetch_timeout_secs, 10);
    assert_eq!(config.max_download_bytes, 1_048_576);
    assert_eq!(config.max_upload_bytes, 2_097_152);
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.bind_address().unwrap().to_string(), "127.0.0.1:8080");
}

#[test]
fn test_config_defaults() {
    let config = ServerConfig::default();

    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 5000);
    assert_eq!(config.fetch_timeout_secs, 30);
    assert_eq!(config.max_download_bytes, 50 * 1024 * 1024);
    assert_eq!(config.max_upload_bytes, 50 * 1024 * 1024);
    assert_eq!(config.log_level, "info");
}

#[test]
fn test_config_partial() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("server.toml");

    fs::write(&config_path, "port = 9000\n").unwrap();

    let config = ServerConfig::from_toml_file(&config_path).unwrap();

    // Should use config value for port
    assert_eq!(config.port, 9000);
    // Should use defaults for everything else
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.fetch_timeout_secs, 30);
}

#[test]
fn test_config_unknown_key_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("server.toml");

    fs::write(&config_path, "prot = 9000\n").unwrap();

    assert!(ServerConfig::from_toml_file(&config_path).is_err());
}

#[test]
fn test_config_zero_limit_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("server.toml");

    fs::write(&config_path, "max_upload_bytes = 0\n").unwrap();

    let err = ServerConfig::from_toml_file(&config_path).unwrap_err();
    assert_eq!(err.kind(), "invalid_input");
}

#[test]
fn test_config_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let err = ServerConfig::from_toml_file(&temp_dir.path().join("absent.toml")).unwrap_err();
    assert_eq!(err.kind(), "io_error");
}

#[test]
fn test_cli_host_overrides_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("server.toml");
    fs::write(&config_path, "host = \"127.0.0.1\"\nfetch_timeout_secs = 3\n").unwrap();

    let matches = build_command()
        .try_get_matches_from(vec![
            "job-xml-converter",
            "--config",
            config_path.to_str().unwrap(),
            "--host",
            "::1",
        ])
        .unwrap();
    let config = config_from_matches(&matches).unwrap();

    assert_eq!(config.host, "::1");
    assert_eq!(config.fetch_timeout_secs, 3);
}
