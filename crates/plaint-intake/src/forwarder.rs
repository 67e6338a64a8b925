// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hand-off of persisted complaints to downstream consumers.

use std::sync::Arc;

use plaint_core::{Complaint, PlaintError, QueueStore};
use tracing::debug;

/// Serializes persisted complaints onto the processed queue.
///
/// Consumers (hashing, notification) pop from the head. Nothing is transformed
/// beyond serialization.
#[derive(Clone)]
pub struct Forwarder {
    queue: Arc<dyn QueueStore>,
    processed_queue: String,
}

impl Forwarder {
    pub fn new(queue: Arc<dyn QueueStore>, processed_queue: impl Into<String>) -> Self {
        Self {
            queue,
            processed_queue: processed_queue.into(),
        }
    }

    pub fn queue_name(&self) -> &str {
        &self.processed_queue
    }

    pub async fn push_to_queue(&self, complaint: &Complaint) -> Result<(), PlaintError> {
        let payload = serde_json::to_string(complaint)
            .map_err(|e| PlaintError::Internal(format!("failed to serialize complaint: {e}")))?;
        self.queue.push(&self.processed_queue, payload.as_bytes()).await?;
        debug!(
            queue = %self.processed_queue,
            complaint_id = %complaint.id,
            "forwarded complaint"
        );
        Ok(())
    }

    pub async fn peek_queue(&self) -> Result<Option<Complaint>, PlaintError> {
        let raw = self.queue.peek(&self.processed_queue).await?;
        raw.as_deref().map(decode).transpose()
    }

    pub async fn pop_from_queue(&self) -> Result<Option<Complaint>, PlaintError> {
        let raw = self.queue.pop(&self.processed_queue).await?;
        raw.as_deref().map(decode).transpose()
    }

    pub async fn queue_length(&self) -> Result<u64, PlaintError> {
        self.queue.length(&self.processed_queue).await
    }
}

fn decode(raw: &[u8]) -> Result<Complaint, PlaintError> {
    serde_json::from_slice(raw)
        .map_err(|e| PlaintError::Internal(format!("corrupt processed queue entry: {e}")))
}
