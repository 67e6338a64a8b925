// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcategory standardization adapters.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use plaint_config::model::EnrichmentConfig;
use plaint_core::{AdapterType, HealthStatus, PlaintError, PluginAdapter, SubcategoryClassifier};

use crate::client::EnrichmentClient;

#[derive(Serialize)]
struct StandardizeRequest<'a> {
    sub_category: &'a str,
    description: &'a str,
}

#[derive(Deserialize)]
struct StandardizeResponse {
    standardized: String,
}

/// Classifier reached over HTTP at `POST {endpoint}/standardize`.
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    client: EnrichmentClient,
}

impl HttpClassifier {
    pub fn new(config: &EnrichmentConfig) -> Result<Self, PlaintError> {
        Ok(Self {
            client: EnrichmentClient::new(config)?,
        })
    }
}

#[async_trait]
impl PluginAdapter for HttpClassifier {
    fn name(&self) -> &str {
        "http-classifier"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Classifier
    }

    async fn health_check(&self) -> Result<HealthStatus, PlaintError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PlaintError> {
        Ok(())
    }
}

#[async_trait]
impl SubcategoryClassifier for HttpClassifier {
    async fn standardize_subcategory(
        &self,
        raw: &str,
        description: &str,
    ) -> Result<String, PlaintError> {
        let response: StandardizeResponse = self
            .client
            .post_json(
                "/standardize",
                &StandardizeRequest {
                    sub_category: raw,
                    description,
                },
            )
            .await?;
        let standardized = response.standardized.trim();
        if standardized.is_empty() {
            return Err(PlaintError::Enrichment {
                message: "classifier returned an empty subcategory".into(),
                source: None,
            });
        }
        Ok(standardized.to_string())
    }
}

/// Classifier used when none is configured: returns the subcategory unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughClassifier;

#[async_trait]
impl PluginAdapter for PassthroughClassifier {
    fn name(&self) -> &str {
        "passthrough-classifier"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Classifier
    }

    async fn health_check(&self) -> Result<HealthStatus, PlaintError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PlaintError> {
        Ok(())
    }
}

#[async_trait]
impl SubcategoryClassifier for PassthroughClassifier {
    async fn standardize_subcategory(
        &self,
        raw: &str,
        _description: &str,
    ) -> Result<String, PlaintError> {
        Ok(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(uri: &str) -> EnrichmentConfig {
        EnrichmentConfig {
            enabled: true,
            endpoint: Some(uri.to_string()),
            api_key: None,
            timeout_secs: 2,
        }
    }

    #[tokio::test]
    async fn standardizes_subcategory() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/standardize"))
            .and(body_json(serde_json::json!({
                "sub_category": "water leaking from pipe",
                "description": "Pipe near the school is leaking"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"standardized": "Water Leakage"})),
            )
            .mount(&server)
            .await;

        let classifier = HttpClassifier::new(&config(&server.uri())).unwrap();
        let term = classifier
            .standardize_subcategory("water leaking from pipe", "Pipe near the school is leaking")
            .await
            .unwrap();
        assert_eq!(term, "Water Leakage");
    }

    #[tokio::test]
    async fn blank_answer_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/standardize"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"standardized": "  "})),
            )
            .mount(&server)
            .await;

        let classifier = HttpClassifier::new(&config(&server.uri())).unwrap();
        assert!(classifier.standardize_subcategory("x", "y").await.is_err());
    }

    #[tokio::test]
    async fn slow_service_hits_client_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/standardize"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"standardized": "late"}))
                    .set_delay(std::time::Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let mut cfg = config(&server.uri());
        cfg.timeout_secs = 1;
        let classifier = HttpClassifier::new(&cfg).unwrap();
        let err = classifier.standardize_subcategory("x", "y").await.unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn passthrough_returns_input() {
        let term = PassthroughClassifier
            .standardize_subcategory("Broken streetlight", "dark at night")
            .await
            .unwrap();
        assert_eq!(term, "Broken streetlight");
    }
}
