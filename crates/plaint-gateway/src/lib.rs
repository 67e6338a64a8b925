// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the complaint intake service.
//!
//! Exposes the manual processing trigger, scheduler control, and queue status
//! over axum, alongside unauthenticated health and Prometheus endpoints.
//! [`Gateway`] runs the server as a background task with an explicit shutdown.

pub mod auth;
pub mod handlers;
pub mod server;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use plaint_core::traits::adapter::PluginAdapter;
use plaint_core::types::{AdapterType, HealthStatus};
use plaint_core::PlaintError;
use plaint_intake::{ComplaintProcessor, PollingScheduler};

pub use crate::auth::AuthConfig;
pub use crate::server::{GatewayState, HealthState, ServerConfig, build_router};

/// Gateway configuration.
///
/// Mirrors `GatewayConfig` from `plaint-config` to avoid a dependency on
/// the config crate from the gateway crate.
#[derive(Clone)]
pub struct GatewayOptions {
    pub host: String,
    pub port: u16,
    pub bearer_token: Option<String>,
    pub service_name: String,
    /// Optional Prometheus metrics render function for the /metrics endpoint.
    pub prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
}

impl std::fmt::Debug for GatewayOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayOptions")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "[redacted]"))
            .field("service_name", &self.service_name)
            .field(
                "prometheus_render",
                &self.prometheus_render.as_ref().map(|_| "<fn>"),
            )
            .finish()
    }
}

/// Owns the background server task.
pub struct Gateway {
    options: GatewayOptions,
    state: GatewayState,
    cancel: CancellationToken,
    server_handle: Mutex<Option<JoinHandle<()>>>,
}

impl Gateway {
    pub fn new(
        options: GatewayOptions,
        processor: Arc<ComplaintProcessor>,
        scheduler: Arc<PollingScheduler>,
    ) -> Self {
        let state = GatewayState {
            processor,
            scheduler,
            auth: AuthConfig {
                bearer_token: options.bearer_token.clone(),
            },
            health: HealthState {
                start_time: std::time::Instant::now(),
                service_name: options.service_name.clone(),
                prometheus_render: options.prometheus_render.clone(),
            },
        };
        Self {
            options,
            state,
            cancel: CancellationToken::new(),
            server_handle: Mutex::new(None),
        }
    }

    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Spawn the HTTP server. Bind failures are logged by the task.
    pub async fn start(&self) {
        let config = ServerConfig {
            host: self.options.host.clone(),
            port: self.options.port,
        };
        let state = self.state.clone();
        let cancel = self.cancel.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = server::start_server(&config, state, cancel).await {
                tracing::error!(error = %e, "gateway server exited");
            }
        });
        *self.server_handle.lock().await = Some(handle);
    }
}

#[async_trait]
impl PluginAdapter for Gateway {
    fn name(&self) -> &str {
        "gateway"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Observability
    }

    async fn health_check(&self) -> Result<HealthStatus, PlaintError> {
        let guard = self.server_handle.lock().await;
        Ok(match guard.as_ref() {
            Some(handle) if !handle.is_finished() => HealthStatus::Healthy,
            Some(_) => HealthStatus::Unhealthy("server task exited".into()),
            None => HealthStatus::Degraded("server not started".into()),
        })
    }

    /// Stop accepting connections and wait for in-flight requests.
    async fn shutdown(&self) -> Result<(), PlaintError> {
        self.cancel.cancel();
        if let Some(handle) = self.server_handle.lock().await.take() {
            handle
                .await
                .map_err(|e| PlaintError::Internal(format!("gateway task panicked: {e}")))?;
        }
        Ok(())
    }
}
