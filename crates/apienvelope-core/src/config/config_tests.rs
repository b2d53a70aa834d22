#![allow(non_snake_case)]

use super::*;

#[test]
fn EnvelopeConfig___default___has_expected_values() {
    let config = EnvelopeConfig::default();

    assert_eq!(config.fallback_message, "internal system error");
    assert!(!config.pretty);
    assert!(config.max_request_bytes.is_none());
    assert_eq!(config.log_level, "info");
}

#[test]
fn EnvelopeConfig___from_empty_bytes___returns_defaults() {
    let config = EnvelopeConfig::from_json(&[]).unwrap();

    assert_eq!(config, EnvelopeConfig::default());
}

#[test]
fn EnvelopeConfig___from_json___parses_fallback_message() {
    let json = r#"{"fallback_message": "service unavailable"}"#;

    let config = EnvelopeConfig::from_json(json.as_bytes()).unwrap();

    assert_eq!(config.fallback_message, "service unavailable");
    assert!(!config.pretty);
}

#[test]
fn EnvelopeConfig___from_json___ignores_unknown_fields() {
    let json = r#"{"pretty": true, "unrelated": 1}"#;

    let config = EnvelopeConfig::from_json(json.as_bytes()).unwrap();

    assert!(config.pretty);
}

#[test]
fn EnvelopeConfig___from_json___invalid_returns_error() {
    let result = EnvelopeConfig::from_json(b"{\"pretty\": \"yes\"}");

    assert!(result.is_err());
}

#[test]
fn EnvelopeConfig___builders___set_fields() {
    let config = EnvelopeConfig::new()
        .with_fallback_message("oops")
        .with_pretty(true)
        .with_max_request_bytes(4096);

    assert_eq!(config.fallback_message, "oops");
    assert!(config.pretty);
    assert_eq!(config.max_request_bytes, Some(4096));
}

#[test]
fn EnvelopeConfig___log_level___unknown_name_falls_back_to_info() {
    let config = EnvelopeConfig {
        log_level: "chatty".to_string(),
        ..EnvelopeConfig::default()
    };

    assert_eq!(config.log_level(), LogLevel::Info);
}
