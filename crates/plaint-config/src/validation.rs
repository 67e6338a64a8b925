// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as distinct queue names and backend-specific required keys.

use std::collections::HashMap;

use crate::diagnostic::ConfigError;
use crate::model::{EnrichmentConfig, PlaintConfig, QueueBackend};

/// Shortest polling interval the scheduler accepts.
pub const MIN_INTERVAL_MS: u64 = 50;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &PlaintConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    // Queue names: non-empty and pairwise distinct.
    let queue = &config.queue;
    let names = [
        ("queue.intake_queue", &queue.intake_queue),
        ("queue.in_flight_queue", &queue.in_flight_queue),
        ("queue.processed_queue", &queue.processed_queue),
        ("queue.dead_letter_queue", &queue.dead_letter_queue),
        ("queue.attempts_ledger", &queue.attempts_ledger),
    ];
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for (key, name) in names {
        if name.trim().is_empty() {
            fail(format!("{key} must not be empty"));
            continue;
        }
        if let Some(previous) = seen.insert(name.as_str(), key) {
            fail(format!("{key} `{name}` is already used by {previous}"));
        }
    }

    if queue.backend == QueueBackend::Redis
        && queue.redis_url.as_deref().is_none_or(|u| u.trim().is_empty())
    {
        fail("queue.redis_url is required when queue.backend = \"redis\"".to_string());
    }

    if config.scheduler.interval_ms < MIN_INTERVAL_MS {
        fail(format!(
            "scheduler.interval_ms must be at least {MIN_INTERVAL_MS}, got {}",
            config.scheduler.interval_ms
        ));
    }

    let processor = &config.processor;
    if processor.min_description_len >= processor.max_description_len {
        fail(format!(
            "processor.min_description_len ({}) must be less than processor.max_description_len ({})",
            processor.min_description_len, processor.max_description_len
        ));
    }
    if processor.max_attempts == Some(0) {
        fail("processor.max_attempts must be at least 1 when set".to_string());
    }
    if processor.enrichment_timeout_ms == 0 {
        fail("processor.enrichment_timeout_ms must be greater than 0".to_string());
    }

    for (section, enrichment) in [
        ("moderation", &config.moderation),
        ("classifier", &config.classifier),
    ] {
        validate_enrichment(section, enrichment, &mut fail);
    }

    if config.gateway.enabled && config.gateway.host.trim().is_empty() {
        fail("gateway.host must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_enrichment(section: &str, config: &EnrichmentConfig, fail: &mut impl FnMut(String)) {
    if !config.enabled {
        return;
    }
    match config.endpoint.as_deref().map(str::trim) {
        None | Some("") => fail(format!("{section}.endpoint is required when {section}.enabled = true")),
        Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => {
            fail(format!("{section}.endpoint `{url}` must be an http(s) URL"))
        }
        Some(_) => {}
    }
}
