// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./plaint.toml` > `~/.config/plaint/plaint.toml` > `/etc/plaint/plaint.toml`
//! with environment variable overrides via `PLAINT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PlaintConfig;

/// Config sections, in the order env keys are matched against.
const SECTIONS: &[&str] = &[
    "service",
    "storage",
    "queue",
    "processor",
    "scheduler",
    "moderation",
    "classifier",
    "gateway",
    "prometheus",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/plaint/plaint.toml` (system-wide)
/// 3. `~/.config/plaint/plaint.toml` (user XDG config)
/// 4. `./plaint.toml` (local directory)
/// 5. `PLAINT_*` environment variables
pub fn load_config() -> Result<PlaintConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<PlaintConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PlaintConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PlaintConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PlaintConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PlaintConfig::default()))
        .merge(Toml::file("/etc/plaint/plaint.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("plaint/plaint.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("plaint.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")`: key names contain underscores, so
/// `PLAINT_QUEUE_REDIS_URL` must map to `queue.redis_url`, not `queue.redis.url`.
fn env_provider() -> Env {
    Env::prefixed("PLAINT_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env key onto its dotted config path.
///
/// Only the first underscore after a known section name becomes a dot.
pub(crate) fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section)
            && let Some(field) = rest.strip_prefix('_')
        {
            return format!("{section}.{field}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_split_only_after_section() {
        assert_eq!(map_env_key("queue_redis_url"), "queue.redis_url");
        assert_eq!(
            map_env_key("processor_max_attempts"),
            "processor.max_attempts"
        );
        assert_eq!(map_env_key("gateway_bearer_token"), "gateway.bearer_token");
        assert_eq!(map_env_key("unknown_key"), "unknown_key");
    }

    #[test]
    fn env_overrides_file_values() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "plaint.toml",
                r#"
[scheduler]
interval_ms = 500
"#,
            )?;
            jail.set_env("PLAINT_SCHEDULER_INTERVAL_MS", "750");
            jail.set_env("PLAINT_QUEUE_REDIS_URL", "redis://cache:6379");

            let config = load_config_from_path(Path::new("plaint.toml"))?;
            assert_eq!(config.scheduler.interval_ms, 750);
            assert_eq!(
                config.queue.redis_url.as_deref(),
                Some("redis://cache:6379")
            );
            Ok(())
        });
    }
}
