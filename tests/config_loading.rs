//! Configuration file loading

use std::fs;

use tempfile::TempDir;

use esscroll::cli::load_config;
use esscroll::config::{Config, ConfigError};
use esscroll::observability::MemoryLog;
use esscroll::scroll::ScrollTtl;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[config]
url = "http://localhost:9200"
username = "elastic"
password = "changeme"

[scroll]
index = "tokens"
ttl = "90s"
"#,
    );

    let config = Config::load(&path).unwrap();
    assert_eq!(config.connection.url, "http://localhost:9200");
    assert_eq!(config.scroll.index, "tokens");
    assert_eq!(config.ttl().unwrap(), ScrollTtl::from_secs(90));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = Config::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert_eq!(err.code(), "ESQ_CONFIG_READ");
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn test_invalid_toml() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[config\nurl = ");
    let err = Config::load(&path).unwrap_err();
    assert_eq!(err.code(), "ESQ_CONFIG_PARSE");
}

#[test]
fn test_invalid_value_in_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[config]
url = "http://localhost:9200"

[scroll]
ttl = "forever"
"#,
    );
    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "scroll.ttl", .. }));
}

#[test]
fn test_load_config_logs_event() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[config]\nurl = \"https://es.internal:9243\"\n");

    let log = MemoryLog::new();
    let config = load_config(&path, &log).unwrap();
    assert_eq!(config.connection.url, "https://es.internal:9243");

    let loaded = log.events("CONFIG_LOADED");
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].field("index"), Some("accountsesdt"));
    assert_eq!(loaded[0].field("url"), Some("https://es.internal:9243"));
}

#[test]
fn test_load_config_error_is_fatal_cli_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[config]\nurl = \"ftp://nope\"\n");

    let err = load_config(&path, &MemoryLog::new()).unwrap_err();
    assert_eq!(err.code_str(), "ESQ_CLI_CONFIG_ERROR");
    assert!(err.to_string().starts_with("ESQ_CLI_CONFIG_ERROR: "));
}
