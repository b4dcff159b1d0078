//! Tests for config module

use std::path::Path;

use quill::config::Config;

#[test]
fn test_config_file_exists_and_parses() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config.toml");
    assert!(path.exists(), "config.toml should exist in project root");

    let config = Config::from_file(&path).expect("config.toml should parse");
    config.validate().expect("config.toml should validate");

    assert_eq!(config.server.port, 8620);
    assert_eq!(config.admin.page_size, 100);
}

#[test]
fn test_from_file_rejects_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[server\nnot toml at all").unwrap();

    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_from_file_missing_is_error() {
    let result = Config::from_file(Path::new("/definitely/not/here.toml"));
    assert!(result.is_err());
}

#[test]
fn test_defaults_are_sane() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert!(config.admin.max_page_size >= config.admin.page_size);
    assert_eq!(config.logging.level, "info");
}
