//! Unit tests for common-config crate

use common_config::{RunnerConfig, TidyflowConfig};

#[test]
fn test_tidyflow_config_default() {
    let config = TidyflowConfig::default();

    assert!(config.runner.record_log);
    assert!(config.runner.collect_metrics);
    assert!(config.runner.error_detail);
}

#[test]
fn test_runner_config_builders() {
    let config = RunnerConfig::default()
        .with_log(false)
        .with_metrics(false)
        .with_error_detail(false);

    assert!(!config.record_log);
    assert!(!config.collect_metrics);
    assert!(!config.error_detail);
}

#[test]
fn test_tidyflow_config_serialization() {
    let mut config = TidyflowConfig::default();
    config.runner.record_log = false;

    let json = serde_json::to_string(&config).unwrap();
    let deserialized: TidyflowConfig = serde_json::from_str(&json).unwrap();

    assert_eq!(deserialized, config);
    assert!(!deserialized.runner.record_log);
    assert!(deserialized.runner.collect_metrics);
}

#[test]
fn test_partial_config_uses_defaults() {
    let config = TidyflowConfig::from_json(r#"{"runner": {"error_detail": false}}"#).unwrap();

    assert!(config.runner.record_log);
    assert!(config.runner.collect_metrics);
    assert!(!config.runner.error_detail);
}

#[test]
fn test_empty_config_document() {
    let config = TidyflowConfig::from_json("{}").unwrap();
    assert_eq!(config, TidyflowConfig::default());
}

#[test]
fn test_malformed_config_document() {
    assert!(TidyflowConfig::from_json(r#"{"runner": {"record_log": "yes"}}"#).is_err());
}
