// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Plaint complaint intake service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Plaint configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PlaintConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Relational store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Queue store backend and list names.
    #[serde(default)]
    pub queue: QueueConfig,

    /// Complaint validation and processing limits.
    #[serde(default)]
    pub processor: ProcessorConfig,

    /// Polling scheduler settings.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Abuse moderation collaborator.
    #[serde(default)]
    pub moderation: EnrichmentConfig,

    /// Subcategory classifier collaborator.
    #[serde(default)]
    pub classifier: EnrichmentConfig,

    /// HTTP control surface.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Prometheus metrics export.
    #[serde(default)]
    pub prometheus: PrometheusConfig,
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Name used in logs and health responses.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "plaint".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,

    /// How long a connection waits on a locked database before failing.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("plaint").join("plaint.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("plaint.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

/// Which queue store implementation backs the named lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueBackend {
    /// Lists live in the same SQLite database as the complaints.
    #[default]
    Sqlite,
    /// Lists live in a Redis server shared with producers and consumers.
    Redis,
}

/// Queue store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QueueConfig {
    #[serde(default)]
    pub backend: QueueBackend,

    /// Redis connection URL. Required when `backend = "redis"`.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// List that producers append raw submissions to.
    #[serde(default = "default_intake_queue")]
    pub intake_queue: String,

    /// List holding payloads reserved by an active cycle.
    #[serde(default = "default_in_flight_queue")]
    pub in_flight_queue: String,

    /// List that downstream consumers read persisted complaints from.
    #[serde(default = "default_processed_queue")]
    pub processed_queue: String,

    /// List that receives payloads which exhausted their retry budget.
    #[serde(default = "default_dead_letter_queue")]
    pub dead_letter_queue: String,

    /// Hash of per-payload attempt counters.
    #[serde(default = "default_attempts_ledger")]
    pub attempts_ledger: String,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            backend: QueueBackend::default(),
            redis_url: None,
            intake_queue: default_intake_queue(),
            in_flight_queue: default_in_flight_queue(),
            processed_queue: default_processed_queue(),
            dead_letter_queue: default_dead_letter_queue(),
            attempts_ledger: default_attempts_ledger(),
        }
    }
}

fn default_intake_queue() -> String {
    "complaint:registration:queue".to_string()
}

fn default_in_flight_queue() -> String {
    "complaint:processing:inprogress".to_string()
}

fn default_processed_queue() -> String {
    "complaint:processed:queue".to_string()
}

fn default_dead_letter_queue() -> String {
    "complaint:registration:deadletter".to_string()
}

fn default_attempts_ledger() -> String {
    "complaint:registration:attempts".to_string()
}

/// Processing limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessorConfig {
    /// Minimum description length in characters.
    #[serde(default = "default_min_description_len")]
    pub min_description_len: usize,

    /// Maximum description length in characters.
    #[serde(default = "default_max_description_len")]
    pub max_description_len: usize,

    /// How far back the duplicate lookup searches.
    #[serde(default = "default_duplicate_window_hours")]
    pub duplicate_window_hours: u64,

    /// Upper bound on each moderation or classification call.
    #[serde(default = "default_enrichment_timeout_ms")]
    pub enrichment_timeout_ms: u64,

    /// Dead-letter a payload after this many transient failures. `None` retries forever.
    #[serde(default)]
    pub max_attempts: Option<u64>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            min_description_len: default_min_description_len(),
            max_description_len: default_max_description_len(),
            duplicate_window_hours: default_duplicate_window_hours(),
            enrichment_timeout_ms: default_enrichment_timeout_ms(),
            max_attempts: None,
        }
    }
}

fn default_min_description_len() -> usize {
    10
}

fn default_max_description_len() -> usize {
    5000
}

fn default_duplicate_window_hours() -> u64 {
    24
}

fn default_enrichment_timeout_ms() -> u64 {
    5000
}

/// Polling scheduler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Delay between the end of one cycle and the start of the next.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Start polling as soon as the service is up.
    #[serde(default = "default_autostart")]
    pub autostart: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            autostart: default_autostart(),
        }
    }
}

fn default_interval_ms() -> u64 {
    2000
}

fn default_autostart() -> bool {
    true
}

/// Remote enrichment collaborator (moderation or classifier).
///
/// When disabled the pipeline uses a pass-through implementation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EnrichmentConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Base URL of the service.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Sent as a bearer token when set.
    #[serde(default)]
    pub api_key: Option<String>,

    /// HTTP client timeout.
    #[serde(default = "default_enrichment_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            api_key: None,
            timeout_secs: default_enrichment_timeout_secs(),
        }
    }
}

fn default_enrichment_timeout_secs() -> u64 {
    10
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_enabled")]
    pub enabled: bool,

    #[serde(default = "default_gateway_host")]
    pub host: String,

    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bearer token required on `/api/*` routes. `None` leaves them open.
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            enabled: default_gateway_enabled(),
            host: default_gateway_host(),
            port: default_gateway_port(),
            bearer_token: None,
        }
    }
}

fn default_gateway_enabled() -> bool {
    true
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    3005
}

/// Prometheus metrics configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PrometheusConfig {
    #[serde(default = "default_prometheus_enabled")]
    pub enabled: bool,
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self {
            enabled: default_prometheus_enabled(),
        }
    }
}

fn default_prometheus_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_legacy_queue_names() {
        let config = PlaintConfig::default();
        assert_eq!(config.queue.intake_queue, "complaint:registration:queue");
        assert_eq!(
            config.queue.in_flight_queue,
            "complaint:processing:inprogress"
        );
        assert_eq!(config.queue.backend, QueueBackend::Sqlite);
        assert_eq!(config.gateway.port, 3005);
        assert_eq!(config.scheduler.interval_ms, 2000);
        assert!(config.processor.max_attempts.is_none());
    }

    #[test]
    fn backend_parses_lowercase() {
        let config: PlaintConfig = toml::from_str(
            r#"
[queue]
backend = "redis"
redis_url = "redis://localhost:6379"
"#,
        )
        .unwrap();
        assert_eq!(config.queue.backend, QueueBackend::Redis);
    }

    #[test]
    fn moderation_and_classifier_are_independent() {
        let config: PlaintConfig = toml::from_str(
            r#"
[moderation]
enabled = true
endpoint = "http://moderation.local"
"#,
        )
        .unwrap();
        assert!(config.moderation.enabled);
        assert!(!config.classifier.enabled);
        assert_eq!(config.classifier.timeout_secs, 10);
    }
}
