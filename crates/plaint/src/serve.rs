// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `plaint serve` command implementation.
//!
//! Opens the stores, builds the processor and scheduler, starts the HTTP
//! gateway, and runs until SIGINT or SIGTERM. On shutdown the scheduler is
//! stopped first, then the current cycle and outstanding badge tasks are
//! awaited before the stores are closed.

use std::sync::Arc;
use std::time::Duration;

use plaint_config::PlaintConfig;
use plaint_core::PlaintError;
use plaint_intake::PollingScheduler;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::shutdown::install_signal_handler;
use crate::wiring::Stores;

pub async fn run_serve(config: PlaintConfig) -> Result<(), PlaintError> {
    init_tracing(&config.service.log_level);

    info!(service = %config.service.name, "starting plaint serve");

    // Initialize Prometheus metrics (if enabled and compiled in).
    #[cfg(feature = "prometheus")]
    let prometheus_adapter = if config.prometheus.enabled {
        match plaint_prometheus::PrometheusAdapter::new() {
            Ok(adapter) => {
                plaint_prometheus::recording::register_metrics();
                info!("prometheus metrics enabled");
                Some(adapter)
            }
            Err(e) => {
                warn!(error = %e, "prometheus initialization failed, continuing without metrics");
                None
            }
        }
    } else {
        None
    };

    let stores = Stores::open(&config).await?;
    let processor = stores.processor(&config)?;
    let scheduler = Arc::new(PollingScheduler::new(
        Arc::clone(&processor),
        Duration::from_millis(config.scheduler.interval_ms),
    ));

    let cancel = install_signal_handler();

    let monitor = tokio::spawn(memory_monitor(cancel.clone()));

    #[cfg(feature = "gateway")]
    let gateway = if config.gateway.enabled {
        #[cfg(feature = "prometheus")]
        let prometheus_render = prometheus_adapter.clone().map(|adapter| {
            Arc::new(move || adapter.render()) as Arc<dyn Fn() -> String + Send + Sync>
        });
        #[cfg(not(feature = "prometheus"))]
        let prometheus_render = None;

        let gateway = plaint_gateway::Gateway::new(
            plaint_gateway::GatewayOptions {
                host: config.gateway.host.clone(),
                port: config.gateway.port,
                bearer_token: config.gateway.bearer_token.clone(),
                service_name: config.service.name.clone(),
                prometheus_render,
            },
            Arc::clone(&processor),
            Arc::clone(&scheduler),
        );
        gateway.start().await;
        Some(gateway)
    } else {
        info!("gateway disabled by configuration");
        None
    };

    if config.scheduler.autostart {
        scheduler.start().await;
    } else {
        info!("scheduler autostart disabled, waiting for POST /api/processing/start");
    }

    cancel.cancelled().await;
    info!("shutting down");

    scheduler.shutdown().await;

    #[cfg(feature = "gateway")]
    if let Some(gateway) = gateway {
        use plaint_core::PluginAdapter;
        if let Err(e) = gateway.shutdown().await {
            warn!(error = %e, "gateway shutdown failed");
        }
    }

    processor.wait_for_side_effects().await;
    stores.close().await;
    let _ = monitor.await;

    info!("plaint stopped");
    Ok(())
}

/// Exports jemalloc heap and resident gauges every 5 seconds.
#[cfg(not(target_env = "msvc"))]
async fn memory_monitor(cancel: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(5));

    loop {
        tokio::select! {
            _ = interval.tick() => {
                // Stats are cached until the epoch advances.
                let _ = tikv_jemalloc_ctl::epoch::advance();
                let allocated = tikv_jemalloc_ctl::stats::allocated::read().unwrap_or(0);
                let resident = tikv_jemalloc_ctl::stats::resident::read().unwrap_or(0);

                #[cfg(feature = "prometheus")]
                {
                    plaint_prometheus::set_memory_heap(allocated as f64);
                    plaint_prometheus::set_memory_resident(resident as f64);
                }
                #[cfg(not(feature = "prometheus"))]
                let _ = (allocated, resident);
            }
            _ = cancel.cancelled() => {
                tracing::debug!("memory monitor shutting down");
                break;
            }
        }
    }
}

#[cfg(target_env = "msvc")]
async fn memory_monitor(cancel: CancellationToken) {
    cancel.cancelled().await;
}

/// Initializes the tracing subscriber. `RUST_LOG` takes precedence over `log_level`.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("plaint={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
