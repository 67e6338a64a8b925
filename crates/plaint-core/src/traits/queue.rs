// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Queue store trait: named, durable, ordered lists of opaque payloads.

use async_trait::async_trait;

use crate::error::PlaintError;
use crate::traits::adapter::PluginAdapter;

/// Contract over a durable, shared, ordered-list store keyed by name.
///
/// Payloads are opaque bytes and are addressed by value: removing an item
/// requires presenting the exact bytes that were reserved. A store never
/// rejects a payload for its content, so bytes that are not text still move
/// between lists. Any store failure surfaces as a transient [`PlaintError`].
#[async_trait]
pub trait QueueStore: PluginAdapter {
    /// Atomically moves the head of `source` to the tail of `in_flight`.
    ///
    /// Returns the moved payload, or `None` when `source` is empty. There is
    /// no instant at which the payload is in neither list or in both.
    async fn reserve(
        &self,
        source: &str,
        in_flight: &str,
    ) -> Result<Option<Vec<u8>>, PlaintError>;

    /// Removes the first occurrence of `payload` from `in_flight`.
    ///
    /// Returns `false` (not an error) when no matching item exists.
    async fn release(&self, in_flight: &str, payload: &[u8]) -> Result<bool, PlaintError>;

    /// Removes the last occurrence of `payload` from `in_flight` and appends
    /// it to the tail of `destination`, as one atomic step.
    ///
    /// Returns `false` and pushes nothing when the payload was not in flight.
    async fn requeue(
        &self,
        in_flight: &str,
        destination: &str,
        payload: &[u8],
    ) -> Result<bool, PlaintError>;

    /// Appends `payload` to the tail of `queue`.
    async fn push(&self, queue: &str, payload: &[u8]) -> Result<(), PlaintError>;

    /// Removes and returns the head of `queue`.
    async fn pop(&self, queue: &str) -> Result<Option<Vec<u8>>, PlaintError>;

    /// Returns the head of `queue` without removing it.
    async fn peek(&self, queue: &str) -> Result<Option<Vec<u8>>, PlaintError>;

    /// Number of items currently in `queue`.
    async fn length(&self, queue: &str) -> Result<u64, PlaintError>;

    /// Increments the attempt counter for `key` in `ledger`, returning the new count.
    async fn increment_attempts(&self, ledger: &str, key: &str) -> Result<u64, PlaintError>;

    /// Forgets the attempt counter for `key` in `ledger`.
    async fn clear_attempts(&self, ledger: &str, key: &str) -> Result<(), PlaintError>;
}
