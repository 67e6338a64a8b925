// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Plaint complaint intake service.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, the category catalog, transactional
//! complaint creation, milestone badges, and a SQLite-backed queue store.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;
pub mod queue_store;

pub use adapter::SqliteStorage;
pub use database::Database;
pub use queue_store::SqliteQueueStore;
