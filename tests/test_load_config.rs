use std::env;
use std::fs::write;

use doclib_console::load_config::{default_config, load_config, BASE_URL_ENV};
use doclib_console_core::contract::SearchMode;
use serial_test::serial;
use tempfile::NamedTempFile;

/// A partial config keeps defaults for everything it does not mention.
#[test]
#[serial]
fn test_load_config_merges_file_with_defaults() {
    env::remove_var(BASE_URL_ENV);
    let config_yaml = r#"
api:
  base_url: "https://docs.internal.example"
search:
  mode: keyword
sync:
  release_limit: 5
"#;
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), config_yaml).unwrap();

    let settings = load_config(config_file.path()).expect("Config should load");

    assert_eq!(settings.api.base_url, "https://docs.internal.example");
    assert_eq!(settings.api.timeout_secs, Some(30));
    assert_eq!(settings.search.mode, SearchMode::Keyword);
    assert_eq!(settings.search.debounce_ms, 300);
    assert_eq!(settings.search.limit, 10);
    assert_eq!(settings.sync.release_limit, 5);
    assert_eq!(settings.sync.reload_delay_ms, 1000);
    assert_eq!(settings.sync.fallback_docs_path, "docs");
}

#[test]
#[serial]
fn test_empty_config_file_yields_defaults() {
    env::remove_var(BASE_URL_ENV);
    let config_file = NamedTempFile::new().expect("temp file");

    let settings = load_config(config_file.path()).expect("Empty config should load");
    assert_eq!(settings.api.base_url, "http://localhost:8080");
    assert_eq!(settings.sync.release_limit, 20);
}

#[test]
#[serial]
fn test_env_overrides_base_url() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), "api:\n  base_url: http://from-file\n").unwrap();

    env::set_var(BASE_URL_ENV, "http://from-env:9000");
    let from_file = load_config(config_file.path()).expect("Config should load");
    let without_file = default_config();
    env::remove_var(BASE_URL_ENV);

    assert_eq!(from_file.api.base_url, "http://from-env:9000");
    assert_eq!(without_file.api.base_url, "http://from-env:9000");
}

#[test]
#[serial]
fn test_load_config_errors_for_invalid_file() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), b"not-yaml: [:::").unwrap();

    let msg = load_config(config_file.path()).unwrap_err().to_string();
    assert!(
        msg.contains("parse") || msg.contains("YAML"),
        "Parse error expected, got: {msg}"
    );
}

#[test]
#[serial]
fn test_load_config_errors_for_missing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("absent.yaml");

    let msg = load_config(&missing).unwrap_err().to_string();
    assert!(msg.contains("read"), "Read error expected, got: {msg}");
}
