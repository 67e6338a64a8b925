// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Abuse moderation adapters.

use async_trait::async_trait;
use serde::Serialize;

use plaint_config::model::EnrichmentConfig;
use plaint_core::{AdapterType, HealthStatus, ModerationVerdict, Moderator, PlaintError, PluginAdapter};

use crate::client::EnrichmentClient;

#[derive(Serialize)]
struct ModerateRequest<'a> {
    text: &'a str,
}

/// Moderation service reached over HTTP at `POST {endpoint}/moderate`.
#[derive(Debug, Clone)]
pub struct HttpModerator {
    client: EnrichmentClient,
}

impl HttpModerator {
    pub fn new(config: &EnrichmentConfig) -> Result<Self, PlaintError> {
        Ok(Self {
            client: EnrichmentClient::new(config)?,
        })
    }
}

#[async_trait]
impl PluginAdapter for HttpModerator {
    fn name(&self) -> &str {
        "http-moderation"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Moderation
    }

    async fn health_check(&self) -> Result<HealthStatus, PlaintError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PlaintError> {
        Ok(())
    }
}

#[async_trait]
impl Moderator for HttpModerator {
    async fn moderate(&self, text: &str) -> Result<ModerationVerdict, PlaintError> {
        self.client
            .post_json("/moderate", &ModerateRequest { text })
            .await
    }
}

/// Moderator used when no moderation service is configured: never flags anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughModerator;

#[async_trait]
impl PluginAdapter for PassthroughModerator {
    fn name(&self) -> &str {
        "passthrough-moderation"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Moderation
    }

    async fn health_check(&self) -> Result<HealthStatus, PlaintError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PlaintError> {
        Ok(())
    }
}

#[async_trait]
impl Moderator for PassthroughModerator {
    async fn moderate(&self, _text: &str) -> Result<ModerationVerdict, PlaintError> {
        Ok(ModerationVerdict::default())
    }
}
