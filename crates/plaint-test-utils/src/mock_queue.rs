// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory queue store.
//!
//! `MockQueueStore` implements `QueueStore` over a map of `VecDeque`s with the
//! same value-addressed semantics as the SQLite and Redis backends. Every
//! operation can be made to fail to simulate an unreachable store.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use plaint_core::traits::adapter::PluginAdapter;
use plaint_core::traits::queue::QueueStore;
use plaint_core::types::{AdapterType, HealthStatus};
use plaint_core::PlaintError;

#[derive(Default)]
struct State {
    lists: HashMap<String, VecDeque<Vec<u8>>>,
    ledgers: HashMap<String, HashMap<String, u64>>,
    pushes: HashMap<String, usize>,
}

#[derive(Clone, Default)]
pub struct MockQueueStore {
    state: Arc<Mutex<State>>,
    unavailable: Arc<AtomicBool>,
}

impl MockQueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Snapshot of a list, head first, decoded lossily for assertions.
    pub async fn items(&self, queue: &str) -> Vec<String> {
        self.raw_items(queue)
            .await
            .iter()
            .map(|p| String::from_utf8_lossy(p).into_owned())
            .collect()
    }

    /// Snapshot of a list, head first, as stored.
    pub async fn raw_items(&self, queue: &str) -> Vec<Vec<u8>> {
        self.state
            .lock()
            .await
            .lists
            .get(queue)
            .map(|l| l.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of `push` calls made against a list.
    pub async fn push_count(&self, queue: &str) -> usize {
        self.state.lock().await.pushes.get(queue).copied().unwrap_or(0)
    }

    pub async fn attempts(&self, ledger: &str, key: &str) -> Option<u64> {
        self.state
            .lock()
            .await
            .ledgers
            .get(ledger)
            .and_then(|l| l.get(key))
            .copied()
    }

    fn check(&self) -> Result<(), PlaintError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(PlaintError::Queue {
                message: "mock queue store unavailable".into(),
                source: None,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for MockQueueStore {
    fn name(&self) -> &str {
        "mock-queue"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Queue
    }

    async fn health_check(&self) -> Result<HealthStatus, PlaintError> {
        Ok(match self.check() {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        })
    }

    async fn shutdown(&self) -> Result<(), PlaintError> {
        Ok(())
    }
}

#[async_trait]
impl QueueStore for MockQueueStore {
    async fn reserve(
        &self,
        source: &str,
        in_flight: &str,
    ) -> Result<Option<Vec<u8>>, PlaintError> {
        self.check()?;
        let mut state = self.state.lock().await;
        let Some(item) = state.lists.get_mut(source).and_then(VecDeque::pop_front) else {
            return Ok(None);
        };
        state
            .lists
            .entry(in_flight.to_string())
            .or_default()
            .push_back(item.clone());
        Ok(Some(item))
    }

    async fn release(&self, in_flight: &str, payload: &[u8]) -> Result<bool, PlaintError> {
        self.check()?;
        let mut state = self.state.lock().await;
        let Some(list) = state.lists.get_mut(in_flight) else {
            return Ok(false);
        };
        match list.iter().position(|p| p == payload) {
            Some(idx) => {
                list.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn requeue(
        &self,
        in_flight: &str,
        destination: &str,
        payload: &[u8],
    ) -> Result<bool, PlaintError> {
        self.check()?;
        let mut state = self.state.lock().await;
        let Some(list) = state.lists.get_mut(in_flight) else {
            return Ok(false);
        };
        let Some(idx) = list.iter().rposition(|p| p == payload) else {
            return Ok(false);
        };
        if let Some(item) = list.remove(idx) {
            state
                .lists
                .entry(destination.to_string())
                .or_default()
                .push_back(item);
        }
        Ok(true)
    }

    async fn push(&self, queue: &str, payload: &[u8]) -> Result<(), PlaintError> {
        self.check()?;
        let mut state = self.state.lock().await;
        state
            .lists
            .entry(queue.to_string())
            .or_default()
            .push_back(payload.to_vec());
        *state.pushes.entry(queue.to_string()).or_default() += 1;
        Ok(())
    }

    async fn pop(&self, queue: &str) -> Result<Option<Vec<u8>>, PlaintError> {
        self.check()?;
        Ok(self
            .state
            .lock()
            .await
            .lists
            .get_mut(queue)
            .and_then(VecDeque::pop_front))
    }

    async fn peek(&self, queue: &str) -> Result<Option<Vec<u8>>, PlaintError> {
        self.check()?;
        Ok(self
            .state
            .lock()
            .await
            .lists
            .get(queue)
            .and_then(|l| l.front().cloned()))
    }

    async fn length(&self, queue: &str) -> Result<u64, PlaintError> {
        self.check()?;
        Ok(self
            .state
            .lock()
            .await
            .lists
            .get(queue)
            .map_or(0, |l| l.len() as u64))
    }

    async fn increment_attempts(&self, ledger: &str, key: &str) -> Result<u64, PlaintError> {
        self.check()?;
        let mut state = self.state.lock().await;
        let count = state
            .ledgers
            .entry(ledger.to_string())
            .or_default()
            .entry(key.to_string())
            .or_default();
        *count += 1;
        Ok(*count)
    }

    async fn clear_attempts(&self, ledger: &str, key: &str) -> Result<(), PlaintError> {
        self.check()?;
        if let Some(entries) = self.state.lock().await.ledgers.get_mut(ledger) {
            entries.remove(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reserve_moves_head_to_in_flight_tail() {
        let store = MockQueueStore::new();
        store.push("in", b"a").await.unwrap();
        store.push("in", b"b").await.unwrap();
        store.push("flight", b"z").await.unwrap();

        assert_eq!(store.reserve("in", "flight").await.unwrap().as_deref(), Some(&b"a"[..]));
        assert_eq!(store.items("in").await, vec!["b"]);
        assert_eq!(store.items("flight").await, vec!["z", "a"]);
    }

    #[tokio::test]
    async fn release_and_requeue_are_value_addressed() {
        let store = MockQueueStore::new();
        store.push("flight", b"x").await.unwrap();
        store.push("flight", b"y").await.unwrap();

        assert!(store.release("flight", b"x").await.unwrap());
        assert!(!store.release("flight", b"x").await.unwrap());
        assert!(store.requeue("flight", "in", b"y").await.unwrap());
        assert!(!store.requeue("flight", "in", b"y").await.unwrap());
        assert_eq!(store.items("in").await, vec!["y"]);
        assert!(store.items("flight").await.is_empty());
    }

    #[tokio::test]
    async fn unavailable_store_fails_everything() {
        let store = MockQueueStore::new();
        store.set_unavailable(true);
        assert!(store.length("in").await.is_err());
        assert!(store.reserve("in", "flight").await.is_err());
        store.set_unavailable(false);
        assert_eq!(store.length("in").await.unwrap(), 0);
    }
}
