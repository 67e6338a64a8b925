// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway.
//!
//! Handles the manual processing trigger, scheduler control, queue status,
//! the processed-queue view, and the public health and metrics endpoints.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use plaint_core::{Complaint, HealthStatus, QueueStatus};
use plaint_intake::ProcessingOutcome;

use crate::server::GatewayState;

/// Body for messages without data.
#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
}

impl ApiMessage {
    fn new(success: bool, message: impl Into<String>) -> Self {
        Self {
            success,
            message: message.into(),
        }
    }
}

/// Body for POST /api/processing when a complaint was persisted.
#[derive(Debug, Serialize)]
pub struct ProcessedResponse {
    pub success: bool,
    pub message: String,
    pub data: Complaint,
}

/// `error` text of a status response whose queue depths could not be read.
pub const STATUS_UNAVAILABLE: &str = "Failed to get queue status";

/// Body for GET /api/processing/status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub success: bool,
    pub is_polling: bool,
    pub queues: Option<QueueStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body for GET /api/processed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedQueueResponse {
    pub processed_queue_length: u64,
    pub next: Option<Complaint>,
}

/// Body for GET /health.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
    pub uptime_secs: u64,
    pub queue: String,
}

/// POST /api/processing
///
/// Runs one processing cycle synchronously.
pub async fn post_process(State(state): State<GatewayState>) -> Response {
    match state.processor.process_next().await {
        Ok(ProcessingOutcome::Empty) => StatusCode::NO_CONTENT.into_response(),
        Ok(ProcessingOutcome::Rejected { reason }) => {
            (StatusCode::BAD_REQUEST, Json(ApiMessage::new(false, reason))).into_response()
        }
        Ok(ProcessingOutcome::Requeued { reason }) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiMessage::new(false, reason)),
        )
            .into_response(),
        Ok(ProcessingOutcome::Processed {
            complaint,
            is_duplicate,
        }) => {
            let message = if is_duplicate {
                "Complaint registered (flagged as duplicate)"
            } else {
                "Complaint registered"
            };
            (
                StatusCode::CREATED,
                Json(ProcessedResponse {
                    success: true,
                    message: message.to_string(),
                    data: *complaint,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "manual processing cycle failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiMessage::new(false, format!("queue store unavailable: {e}"))),
            )
                .into_response()
        }
    }
}

/// POST /api/processing/start
pub async fn post_start(State(state): State<GatewayState>) -> Json<ApiMessage> {
    if state.scheduler.start().await {
        Json(ApiMessage::new(true, "Polling started"))
    } else {
        Json(ApiMessage::new(true, "Polling already running"))
    }
}

/// POST /api/processing/stop
pub async fn post_stop(State(state): State<GatewayState>) -> Json<ApiMessage> {
    if state.scheduler.stop().await {
        Json(ApiMessage::new(true, "Polling stopped"))
    } else {
        Json(ApiMessage::new(true, "Polling was not running"))
    }
}

/// GET /api/processing/status
///
/// Always 200: the polling flag is still meaningful when the queue store is
/// down, so an unreadable depth is reported in the body as `queues: null`.
pub async fn get_status(State(state): State<GatewayState>) -> Json<StatusResponse> {
    let is_polling = state.scheduler.is_running().await;
    match state.processor.queue_status().await {
        Ok(queues) => Json(StatusResponse {
            success: true,
            is_polling,
            queues: Some(queues),
            error: None,
        }),
        Err(e) => {
            tracing::warn!(error = %e, "queue depths unavailable for status request");
            Json(StatusResponse {
                success: true,
                is_polling,
                queues: None,
                error: Some(STATUS_UNAVAILABLE.to_string()),
            })
        }
    }
}

/// GET /api/processed
///
/// Depth of the processed queue and the complaint at its head, without consuming it.
pub async fn get_processed(State(state): State<GatewayState>) -> Response {
    let forwarder = state.processor.forwarder();
    let view = async {
        Ok::<_, plaint_core::PlaintError>(ProcessedQueueResponse {
            processed_queue_length: forwarder.queue_length().await?,
            next: forwarder.peek_queue().await?,
        })
    };
    match view.await {
        Ok(body) => Json(body).into_response(),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiMessage::new(false, e.to_string())),
        )
            .into_response(),
    }
}

/// GET /health (unauthenticated)
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    let (code, status, queue) = match state.processor.queue_health().await {
        HealthStatus::Healthy => (StatusCode::OK, "ok", "healthy".to_string()),
        HealthStatus::Degraded(why) => (StatusCode::OK, "degraded", format!("degraded: {why}")),
        HealthStatus::Unhealthy(why) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "unhealthy",
            format!("unhealthy: {why}"),
        ),
    };
    let body = HealthResponse {
        status: status.to_string(),
        service: state.health.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
        queue,
    };
    (code, Json(body)).into_response()
}

/// GET /metrics (unauthenticated)
pub async fn get_metrics(State(state): State<GatewayState>) -> Response {
    match &state.health.prometheus_render {
        Some(render) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_response_omits_missing_error() {
        let resp = StatusResponse {
            success: true,
            is_polling: false,
            queues: Some(QueueStatus {
                registration_queue_length: 3,
                processing_queue_length: 0,
            }),
            error: None,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["isPolling"], false);
        assert_eq!(json["queues"]["registrationQueueLength"], 3);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn unavailable_status_serializes_null_queues() {
        let resp = StatusResponse {
            success: false,
            is_polling: true,
            queues: None,
            error: Some("down".into()),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"queues\":null"));
        assert!(json.contains("\"error\":\"down\""));
    }
}
