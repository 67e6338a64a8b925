// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared JSON-over-HTTP client for enrichment services.

use std::time::Duration;

use plaint_config::model::EnrichmentConfig;
use plaint_core::PlaintError;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Thin wrapper over `reqwest::Client` bound to one service base URL.
#[derive(Debug, Clone)]
pub struct EnrichmentClient {
    client: reqwest::Client,
    base_url: String,
}

impl EnrichmentClient {
    /// Build a client from an enabled enrichment section.
    ///
    /// Sends `Authorization: Bearer <api_key>` when a key is configured.
    pub fn new(config: &EnrichmentConfig) -> Result<Self, PlaintError> {
        let base_url = config
            .endpoint
            .as_deref()
            .ok_or_else(|| PlaintError::Config("enrichment endpoint is not set".into()))?
            .trim_end_matches('/')
            .to_string();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &config.api_key {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {key}")).map_err(|e| {
                    PlaintError::Config(format!("invalid API key header value: {e}"))
                })?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PlaintError::Enrichment {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self { client, base_url })
    }

    /// The configured base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST `body` as JSON to `{base_url}{path}` and decode the JSON reply.
    ///
    /// Non-2xx statuses, transport failures, and undecodable bodies are all
    /// reported as [`PlaintError::Enrichment`].
    pub async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, PlaintError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| PlaintError::Enrichment {
                message: format!("HTTP request to {path} failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, path, "enrichment response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlaintError::Enrichment {
                message: format!("{path} returned {status}: {body}"),
                source: None,
            });
        }

        response.json::<Resp>().await.map_err(|e| PlaintError::Enrichment {
            message: format!("failed to parse {path} response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_endpoint_is_a_config_error() {
        let err = EnrichmentClient::new(&EnrichmentConfig::default()).unwrap_err();
        assert!(matches!(err, PlaintError::Config(_)));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = EnrichmentConfig {
            enabled: true,
            endpoint: Some("http://localhost:9000/".into()),
            ..EnrichmentConfig::default()
        };
        let client = EnrichmentClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000");
    }
}
