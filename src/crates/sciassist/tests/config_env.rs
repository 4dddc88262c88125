//! Environment overlay. Kept in its own test binary: it mutates process
//! environment variables.

use sciassist::config::{AppConfig, ConfigError};

#[test]
fn test_env_overrides_and_secrets() {
    std::env::set_var("GOOGLE_API_KEY", "AIza-from-env");
    std::env::set_var("WOLFRAM_ALPHA_APPID", "APPID-from-env");
    std::env::set_var("GCE_PROJECT", "env-project");
    std::env::set_var("SCIASSIST_LLM_MODEL", "gemini-1.5-flash");
    std::env::set_var("SCIASSIST_ROUTING_KEYWORD", "WL");
    std::env::set_var("SCIASSIST_SERVER_PORT", "9999");
    std::env::set_var("SCIASSIST_GCE_ZONE", "europe-west4-a");

    let mut config = AppConfig::default();
    config.apply_env().unwrap();

    assert_eq!(config.llm.api_key.as_deref(), Some("AIza-from-env"));
    assert_eq!(config.computation.app_id.as_deref(), Some("APPID-from-env"));
    assert_eq!(config.provisioner.project.as_deref(), Some("env-project"));
    assert_eq!(config.llm.model, "gemini-1.5-flash");
    assert_eq!(config.dispatcher.routing_keyword, "WL");
    assert_eq!(config.server.port, 9999);
    assert_eq!(config.provisioner.zone, "europe-west4-a");
    assert!(config.summary().contains("google_api_key=set"));
    assert!(!config.summary().contains("AIza-from-env"));

    std::env::set_var("SCIASSIST_SERVER_PORT", "not-a-port");
    let mut config = AppConfig::default();
    assert!(matches!(config.apply_env(), Err(ConfigError::Env(_))));

    for key in [
        "GOOGLE_API_KEY",
        "WOLFRAM_ALPHA_APPID",
        "GCE_PROJECT",
        "SCIASSIST_LLM_MODEL",
        "SCIASSIST_ROUTING_KEYWORD",
        "SCIASSIST_SERVER_PORT",
        "SCIASSIST_GCE_ZONE",
    ] {
        std::env::remove_var(key);
    }
}
