use agent_studio::cli::Cli;
use agent_studio::config::validator::{ConfigValidator, ValidationError};
use agent_studio::config::Settings;
use clap::Parser;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_missing_file_uses_defaults() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let settings = Settings::from_file(&temp_dir.path().join("absent.toml"))?;

    assert_eq!(settings.api.base_url, "http://localhost:8000");
    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 3000);
    assert_eq!(settings.logging.level, "info");
    assert!(settings.ui.dir.is_none());
    assert!(ConfigValidator::validate(&settings).is_ok());
    Ok(())
}

#[test]
fn test_file_overrides_defaults() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("studio.toml");
    fs::write(
        &path,
        r#"
[api]
base_url = "https://agents.example.com"

[server]
port = 8080

[ui]
dir = "ui/dist"
"#,
    )?;

    let settings = Settings::from_file(&path)?;

    assert_eq!(settings.api.base_url, "https://agents.example.com");
    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.ui.dir.as_deref(), Some(std::path::Path::new("ui/dist")));
    Ok(())
}

#[test]
fn test_cli_overrides_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("studio.toml");
    fs::write(
        &path,
        r#"
[api]
base_url = "http://from-file:8000"

[server]
port = 8080
"#,
    )?;
    let config = path.to_string_lossy().into_owned();

    let cli = Cli::parse_from([
        "agent-studio",
        "--config",
        &config,
        "--api-url",
        "http://from-cli:9000",
        "--log-level",
        "debug",
        "serve",
        "--port",
        "4000",
    ]);
    let settings = Settings::new_with_cli(&cli)?;

    assert_eq!(settings.api.base_url, "http://from-cli:9000");
    assert_eq!(settings.logging.level, "debug");
    assert_eq!(settings.server.port, 4000);
    Ok(())
}

#[test]
fn test_invalid_file_values_are_reported() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("studio.toml");
    fs::write(
        &path,
        r#"
[api]
base_url = "localhost:8000"

[logging]
level = "verbose"
"#,
    )?;

    let settings = Settings::from_file(&path)?;
    let errors = ConfigValidator::validate(&settings).unwrap_err();

    assert_eq!(errors.len(), 2);
    assert!(errors.iter().any(|e| matches!(
        e,
        ValidationError::InvalidValue { field, .. } if field == "api.base_url"
    )));
    assert!(errors.iter().any(|e| matches!(
        e,
        ValidationError::InvalidValue { field, .. } if field == "logging.level"
    )));
    Ok(())
}

#[test]
fn test_malformed_file_is_an_error() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("studio.toml");
    fs::write(&path, "[server]\nport = \"not a number\"\n")?;

    assert!(Settings::from_file(&path).is_err());
    Ok(())
}
