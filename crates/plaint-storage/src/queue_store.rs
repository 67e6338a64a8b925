// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of [`QueueStore`].

use async_trait::async_trait;
use tracing::warn;

use plaint_core::{AdapterType, HealthStatus, PlaintError, PluginAdapter, QueueStore};

use crate::database::Database;
use crate::queries::queue;

/// Queue store backed by the `queue_items` table.
///
/// Suitable for single-host deployments where producers and the processor
/// share the database file.
#[derive(Clone)]
pub struct SqliteQueueStore {
    db: Database,
}

impl SqliteQueueStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

/// Storage failures surface as queue errors so callers treat them uniformly.
fn queue_err(op: &'static str) -> impl FnOnce(PlaintError) -> PlaintError {
    move |e| match e {
        PlaintError::Storage { source } => PlaintError::Queue {
            message: format!("{op} failed"),
            source: Some(source),
        },
        other => other,
    }
}

#[async_trait]
impl PluginAdapter for SqliteQueueStore {
    fn name(&self) -> &str {
        "sqlite-queue"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Queue
    }

    async fn health_check(&self) -> Result<HealthStatus, PlaintError> {
        match queue::length(&self.db, "").await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), PlaintError> {
        Ok(())
    }
}

#[async_trait]
impl QueueStore for SqliteQueueStore {
    async fn reserve(
        &self,
        source: &str,
        in_flight: &str,
    ) -> Result<Option<Vec<u8>>, PlaintError> {
        queue::move_head(&self.db, source, in_flight)
            .await
            .map_err(queue_err("reserve"))
    }

    async fn release(&self, in_flight: &str, payload: &[u8]) -> Result<bool, PlaintError> {
        queue::remove_first(&self.db, in_flight, payload)
            .await
            .map_err(queue_err("release"))
    }

    async fn requeue(
        &self,
        in_flight: &str,
        destination: &str,
        payload: &[u8],
    ) -> Result<bool, PlaintError> {
        let moved = queue::move_last_occurrence(&self.db, in_flight, destination, payload)
            .await
            .map_err(queue_err("requeue"))?;
        if !moved {
            warn!(
                in_flight,
                destination, "requeue skipped: payload not found in in-flight list"
            );
        }
        Ok(moved)
    }

    async fn push(&self, queue_name: &str, payload: &[u8]) -> Result<(), PlaintError> {
        queue::push(&self.db, queue_name, payload)
            .await
            .map_err(queue_err("push"))
    }

    async fn pop(&self, queue_name: &str) -> Result<Option<Vec<u8>>, PlaintError> {
        queue::pop(&self.db, queue_name)
            .await
            .map_err(queue_err("pop"))
    }

    async fn peek(&self, queue_name: &str) -> Result<Option<Vec<u8>>, PlaintError> {
        queue::peek(&self.db, queue_name)
            .await
            .map_err(queue_err("peek"))
    }

    async fn length(&self, queue_name: &str) -> Result<u64, PlaintError> {
        queue::length(&self.db, queue_name)
            .await
            .map_err(queue_err("length"))
    }

    async fn increment_attempts(&self, ledger: &str, key: &str) -> Result<u64, PlaintError> {
        queue::increment_attempts(&self.db, ledger, key)
            .await
            .map_err(queue_err("increment_attempts"))
    }

    async fn clear_attempts(&self, ledger: &str, key: &str) -> Result<(), PlaintError> {
        queue::clear_attempts(&self.db, ledger, key)
            .await
            .map_err(queue_err("clear_attempts"))
    }
}
