// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Redis-backed queue store for the Plaint complaint intake service.
//!
//! Uses `redis::aio::ConnectionManager` for an async multiplexed connection
//! with automatic reconnection. Every list operation maps to a single Redis
//! command or Lua script, so each one is atomic on the server.

pub mod store;

pub use store::{redact_url, RedisQueueStore};
