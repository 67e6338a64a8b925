// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Plaint integration tests.
//!
//! Provides in-memory collaborators and harnesses for fast, deterministic,
//! CI-runnable tests without Redis or HTTP services.
//!
//! # Components
//!
//! - [`MockQueueStore`] - In-memory named lists with failure injection
//! - [`MockComplaintStore`] - Category catalog and complaint store with scripted failures
//! - [`MockModerator`] / [`MockClassifier`] - Scripted enrichment collaborators
//! - [`MockBadgeEvaluator`] - Counts badge evaluations
//! - [`TestHarness`] - A processor wired to the mocks above
//! - [`SqliteHarness`] - A processor over a temp SQLite database

pub mod fixtures;
pub mod harness;
pub mod mock_badges;
pub mod mock_enrichment;
pub mod mock_queue;
pub mod mock_store;

pub use harness::{SqliteHarness, TestHarness, TestHarnessBuilder};
pub use mock_badges::MockBadgeEvaluator;
pub use mock_enrichment::{MockClassifier, MockModerator};
pub use mock_queue::MockQueueStore;
pub use mock_store::{MockComplaintStore, StoreFailure};
