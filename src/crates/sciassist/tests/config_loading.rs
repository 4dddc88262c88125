//! Config file loading

use sciassist::config::{AppConfig, ConfigError};
use sciassist::Dispatcher;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_sample_config_parses() {
    let sample = include_str!("../../../../config/sciassist.toml");
    let config = AppConfig::from_str(sample).unwrap();

    assert_eq!(config.prompt.language.as_deref(), Some("Wolfram Language"));
    assert_eq!(config.prompt.examples.len(), 2);
    assert_eq!(config.dispatcher.routing_keyword, "Wolfram");
    assert_eq!(config.provisioner.machine_types.medium, "n1-standard-4");
    assert!(config.validate().is_ok());
}

#[test]
fn test_from_file_partial_sections() {
    let file = write_config("[server]\nport = 8088\n\n[provisioner]\nzone = \"asia-east1-a\"\n");
    let config = AppConfig::from_file(file.path()).unwrap();

    assert_eq!(config.server.port, 8088);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.provisioner.zone, "asia-east1-a");
    assert_eq!(config.llm.model, "gemini-1.5-pro");
}

#[test]
fn test_missing_file() {
    let err = AppConfig::from_file("/nonexistent/sciassist.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("/nonexistent/sciassist.toml"));
}

#[test]
fn test_invalid_toml() {
    let file = write_config("[llm\nmodel = ");
    assert!(matches!(
        AppConfig::from_file(file.path()),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_load_from_validates() {
    let file = write_config("[dispatcher]\nrouting_keyword = \"\"\n");
    assert!(matches!(
        AppConfig::load_from(file.path()),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_dispatcher_from_file_config() {
    let file = write_config(
        r#"
[prompt]
language = "Wolfram Language"
examples = ["Example: plot sine function"]

[dispatcher]
routing_keyword = "WL"

[provisioner]
project = "lab-project"
"#,
    );
    let mut config = AppConfig::from_file(file.path()).unwrap();
    config.llm.api_key = Some("key".to_string());
    config.computation.app_id = Some("APPID".to_string());

    let dispatcher = Dispatcher::from_config(&config).unwrap();
    assert_eq!(dispatcher.routing_keyword(), "WL");
    assert_eq!(dispatcher.examples(), ["Example: plot sine function"]);
    // project without an access token leaves deployment disabled
    assert!(!dispatcher.can_deploy());

    config.provisioner.access_token = Some("ya29.token".to_string());
    assert!(Dispatcher::from_config(&config).unwrap().can_deploy());
}
