// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `plaint status` command implementation.
//!
//! Asks a running gateway for scheduler state and queue depths. When no
//! server answers, reads the queue depths straight from the queue store.

use std::io::IsTerminal;
use std::time::Duration;

use plaint_config::PlaintConfig;
use plaint_core::{PlaintError, QueueStatus};
use serde::{Deserialize, Serialize};

use crate::wiring::Stores;

/// Body of GET /api/processing/status.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteStatus {
    is_polling: bool,
    queues: Option<QueueStatus>,
}

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub running: bool,
    pub polling: bool,
    pub queues: Option<QueueStatus>,
    pub gateway: String,
}

pub async fn run_status(config: &PlaintConfig, json: bool, plain: bool) -> Result<(), PlaintError> {
    let gateway = format!("http://{}:{}", config.gateway.host, config.gateway.port);

    let report = match fetch_remote(config, &gateway).await {
        Some(remote) => StatusReport {
            running: true,
            polling: remote.is_polling,
            queues: remote.queues,
            gateway,
        },
        None => {
            let stores = Stores::open(config).await?;
            let queues = local_depths(&stores, config).await;
            stores.close().await;
            StatusReport {
                running: false,
                polling: false,
                queues: Some(queues?),
                gateway,
            }
        }
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print_report(&report, use_color);
    }
    Ok(())
}

async fn fetch_remote(config: &PlaintConfig, base: &str) -> Option<RemoteStatus> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
        .ok()?;
    let mut request = client.get(format!("{base}/api/processing/status"));
    if let Some(token) = &config.gateway.bearer_token {
        request = request.bearer_auth(token);
    }
    let response = request.send().await.ok()?;
    if !response.status().is_success() {
        return None;
    }
    response.json().await.ok()
}

async fn local_depths(stores: &Stores, config: &PlaintConfig) -> Result<QueueStatus, PlaintError> {
    Ok(QueueStatus {
        registration_queue_length: stores.queue.length(&config.queue.intake_queue).await?,
        processing_queue_length: stores.queue.length(&config.queue.in_flight_queue).await?,
    })
}

fn print_report(report: &StatusReport, use_color: bool) {
    println!();
    println!("  plaint status");
    println!("  {}", "-".repeat(35));

    let state = if report.running {
        if report.polling { "polling" } else { "idle" }
    } else {
        "not running"
    };

    if use_color {
        use colored::Colorize;
        let painted = if report.running {
            format!("{} {}", "✓".green(), state.green())
        } else {
            format!("{} {}", "✗".red(), state.red())
        };
        println!("    State:      {painted}");
    } else {
        let mark = if report.running { "[OK]" } else { "[--]" };
        println!("    State:      {mark} {state}");
    }

    match &report.queues {
        Some(q) => {
            println!("    Intake:     {}", q.registration_queue_length);
            println!("    In flight:  {}", q.processing_queue_length);
        }
        None => println!("    Queues:     unavailable"),
    }
    println!("    Gateway:    {}", report.gateway);
    if !report.running {
        println!();
        println!("  Start with: plaint serve");
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_status_parses_gateway_body() {
        let body = r#"{"success":true,"isPolling":true,"queues":{"registrationQueueLength":4,"processingQueueLength":1}}"#;
        let remote: RemoteStatus = serde_json::from_str(body).unwrap();
        assert!(remote.is_polling);
        assert_eq!(remote.queues.unwrap().registration_queue_length, 4);
    }

    #[test]
    fn remote_status_tolerates_missing_queues() {
        let body = r#"{"success":true,"isPolling":false,"queues":null,"error":"Failed to get queue status"}"#;
        let remote: RemoteStatus = serde_json::from_str(body).unwrap();
        assert!(remote.queues.is_none());
    }

    #[test]
    fn report_serializes() {
        let report = StatusReport {
            running: false,
            polling: false,
            queues: None,
            gateway: "http://127.0.0.1:3005".into(),
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"running\":false"));
    }
}
