// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Plaint configuration system.

use plaint_config::diagnostic::ConfigError;
use plaint_config::model::QueueBackend;
use plaint_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known sections deserializes successfully.
#[test]
fn full_toml_deserializes_into_plaint_config() {
    let toml = r#"
[service]
name = "intake-east"
log_level = "debug"

[storage]
database_path = "/tmp/plaint-test.db"
wal_mode = false
busy_timeout_ms = 1000

[queue]
backend = "redis"
redis_url = "redis://127.0.0.1:6379/2"
intake_queue = "east:registration"
in_flight_queue = "east:inprogress"
processed_queue = "east:processed"
dead_letter_queue = "east:deadletter"
attempts_ledger = "east:attempts"

[processor]
min_description_len = 20
max_description_len = 2000
duplicate_window_hours = 48
enrichment_timeout_ms = 1500
max_attempts = 5

[scheduler]
interval_ms = 250
autostart = false

[moderation]
enabled = true
endpoint = "http://moderation.internal"
api_key = "mod-key"

[classifier]
enabled = true
endpoint = "https://classifier.internal"
timeout_secs = 3

[gateway]
host = "0.0.0.0"
port = 8080
bearer_token = "secret"

[prometheus]
enabled = false
"#;

    let config = load_and_validate_str(toml).expect("valid config");
    assert_eq!(config.service.name, "intake-east");
    assert_eq!(config.service.log_level, "debug");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.storage.busy_timeout_ms, 1000);
    assert_eq!(config.queue.backend, QueueBackend::Redis);
    assert_eq!(config.queue.intake_queue, "east:registration");
    assert_eq!(config.queue.attempts_ledger, "east:attempts");
    assert_eq!(config.processor.max_attempts, Some(5));
    assert_eq!(config.processor.duplicate_window_hours, 48);
    assert_eq!(config.scheduler.interval_ms, 250);
    assert!(!config.scheduler.autostart);
    assert_eq!(config.moderation.api_key.as_deref(), Some("mod-key"));
    assert_eq!(config.classifier.timeout_secs, 3);
    assert_eq!(config.gateway.port, 8080);
    assert_eq!(config.gateway.bearer_token.as_deref(), Some("secret"));
    assert!(!config.prometheus.enabled);
}

/// An empty document yields the compiled defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_and_validate_str("").expect("defaults are valid");
    assert_eq!(config.queue.intake_queue, "complaint:registration:queue");
    assert_eq!(config.queue.in_flight_queue, "complaint:processing:inprogress");
    assert_eq!(config.queue.processed_queue, "complaint:processed:queue");
    assert_eq!(config.processor.min_description_len, 10);
    assert_eq!(config.processor.max_description_len, 5000);
    assert!(config.scheduler.autostart);
    assert!(config.gateway.bearer_token.is_none());
}

/// Unknown field in a section is rejected by figment.
#[test]
fn unknown_field_in_queue_produces_error() {
    let toml = r#"
[queue]
backnd = "redis"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("backnd"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unknown keys surface as diagnostics with a suggestion and source span.
#[test]
fn unknown_key_diagnostic_carries_suggestion() {
    let toml = "[scheduler]\nintervl_ms = 100\n";
    let errors = load_and_validate_str(toml).expect_err("should fail");
    let unknown = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::UnknownKey {
                key, suggestion, ..
            } => Some((key.clone(), suggestion.clone())),
            _ => None,
        })
        .expect("unknown key diagnostic");
    assert_eq!(unknown.0, "intervl_ms");
    assert_eq!(unknown.1.as_deref(), Some("interval_ms"));
}

/// Unknown top-level section is reported as such, with the accepted sections.
#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[telemetry]
enabled = true
"#;
    let errors = load_and_validate_str(toml).expect_err("should fail");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownSection { name, accepted, .. }
            if name == "telemetry" && accepted.contains("scheduler")
    )));
}

/// A missing explicit config file is a load error, not a silent default.
#[test]
fn missing_config_file_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let errors = plaint_config::load_and_validate_path(&dir.path().join("absent.toml"))
        .expect_err("should fail");
    assert!(matches!(errors.as_slice(), [ConfigError::Load(msg)] if msg.contains("absent.toml")));
}

/// Wrong value type yields an InvalidValue diagnostic naming the key.
#[test]
fn wrong_type_produces_invalid_value() {
    let toml = r#"
[gateway]
port = "not-a-port"
"#;
    let errors = load_and_validate_str(toml).expect_err("should fail");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::InvalidValue { key, span: Some(_), .. } if key == "gateway.port"
    )));
}

/// An unsupported backend value is rejected at deserialization.
#[test]
fn unsupported_backend_is_rejected() {
    let toml = r#"
[queue]
backend = "kafka"
"#;
    assert!(load_and_validate_str(toml).is_err());
}

/// Semantic validation runs after a successful parse.
#[test]
fn redis_backend_without_url_fails_validation() {
    let toml = r#"
[queue]
backend = "redis"
"#;
    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::Validation { message } if message.contains("redis_url")
    )));
}

/// Validation errors from different sections are all reported.
#[test]
fn multiple_validation_errors_reported_together() {
    let toml = r#"
[queue]
intake_queue = "same"
in_flight_queue = "same"

[scheduler]
interval_ms = 5
"#;
    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert_eq!(errors.len(), 2);
}
