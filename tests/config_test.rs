//! Client configuration loading.

use oracle_chess::{ClientConfig, Color};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_defaults() {
    let config = ClientConfig::default();
    assert_eq!(config.oracle_url(), "http://localhost:8000");
    assert_eq!(*config.human_color(), Color::White);
    assert_eq!(*config.difficulty(), None);
    assert_eq!(config.request_timeout(), None);
    assert_eq!(config.log_file(), &PathBuf::from("oracle_chess.log"));
}

#[test]
fn test_full_file() {
    let file = write_config(
        r#"
oracle_url = "http://oracle.internal:9000"
difficulty = 2
human_color = "black"
request_timeout_secs = 30
log_file = "game.log"
"#,
    );

    let config = ClientConfig::from_file(file.path()).unwrap();

    assert_eq!(config.oracle_url(), "http://oracle.internal:9000");
    assert_eq!(*config.difficulty(), Some(2));
    assert_eq!(*config.human_color(), Color::Black);
    assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    assert_eq!(config.log_file(), &PathBuf::from("game.log"));
}

#[test]
fn test_missing_fields_use_defaults() {
    let file = write_config("difficulty = 1\n");

    let config = ClientConfig::from_file(file.path()).unwrap();

    assert_eq!(config.oracle_url(), "http://localhost:8000");
    assert_eq!(*config.difficulty(), Some(1));
    assert_eq!(*config.human_color(), Color::White);
}

#[test]
fn test_invalid_file_reports_error() {
    let file = write_config("human_color = \"green\"\n");

    let err = ClientConfig::from_file(file.path()).unwrap_err();

    assert!(err.message.starts_with("Failed to parse config"));
}

#[test]
fn test_load_without_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();

    let config = ClientConfig::load(dir.path().join("absent.toml")).unwrap();

    assert_eq!(*config.human_color(), Color::White);
    assert_eq!(config.log_file(), &PathBuf::from("oracle_chess.log"));
}

#[test]
fn test_environment_override() {
    let config = ClientConfig::default()
        .with_env_override(Some("http://env-oracle:8000".to_string()));
    assert_eq!(config.oracle_url(), "http://env-oracle:8000");

    let config = config.with_env_override(Some("  ".to_string()));
    assert_eq!(config.oracle_url(), "http://env-oracle:8000");
}

#[test]
fn test_cli_overrides() {
    let config = ClientConfig::default()
        .with_oracle_url("http://cli:1234")
        .with_human_color(Color::Black)
        .with_difficulty(Some(4));

    assert_eq!(config.oracle_url(), "http://cli:1234");
    assert_eq!(*config.human_color(), Color::Black);
    assert_eq!(*config.difficulty(), Some(4));
}
