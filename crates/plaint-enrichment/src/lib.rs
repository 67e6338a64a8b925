// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort enrichment collaborators: abuse moderation and subcategory
//! standardization.
//!
//! Each collaborator has an HTTP implementation and a pass-through used when
//! the service is disabled in configuration.

pub mod classifier;
pub mod client;
pub mod moderation;

use std::sync::Arc;

use plaint_config::model::EnrichmentConfig;
use plaint_core::{Moderator, PlaintError, SubcategoryClassifier};
use tracing::info;

pub use classifier::{HttpClassifier, PassthroughClassifier};
pub use client::EnrichmentClient;
pub use moderation::{HttpModerator, PassthroughModerator};

/// Build the moderator selected by configuration.
pub fn build_moderator(config: &EnrichmentConfig) -> Result<Arc<dyn Moderator>, PlaintError> {
    if config.enabled {
        let moderator = HttpModerator::new(config)?;
        info!(endpoint = ?config.endpoint, "moderation service enabled");
        Ok(Arc::new(moderator))
    } else {
        Ok(Arc::new(PassthroughModerator))
    }
}

/// Build the subcategory classifier selected by configuration.
pub fn build_classifier(
    config: &EnrichmentConfig,
) -> Result<Arc<dyn SubcategoryClassifier>, PlaintError> {
    if config.enabled {
        let classifier = HttpClassifier::new(config)?;
        info!(endpoint = ?config.endpoint, "classifier service enabled");
        Ok(Arc::new(classifier))
    } else {
        Ok(Arc::new(PassthroughClassifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plaint_core::PluginAdapter;

    #[test]
    fn disabled_config_yields_passthroughs() {
        let config = EnrichmentConfig::default();
        assert_eq!(build_moderator(&config).unwrap().name(), "passthrough-moderation");
        assert_eq!(build_classifier(&config).unwrap().name(), "passthrough-classifier");
    }

    #[test]
    fn enabled_config_yields_http_clients() {
        let config = EnrichmentConfig {
            enabled: true,
            endpoint: Some("http://127.0.0.1:9".into()),
            ..EnrichmentConfig::default()
        };
        assert_eq!(build_moderator(&config).unwrap().name(), "http-moderation");
        assert_eq!(build_classifier(&config).unwrap().name(), "http-classifier");
    }
}
