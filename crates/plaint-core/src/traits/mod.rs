// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the collaborators of the intake pipeline.
//!
//! Backend adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod badges;
pub mod enrichment;
pub mod queue;
pub mod storage;

// Re-export all traits at the traits module level for convenience.
pub use adapter::PluginAdapter;
pub use badges::BadgeEvaluator;
pub use enrichment::{Moderator, SubcategoryClassifier};
pub use queue::QueueStore;
pub use storage::{CategoryCatalog, ComplaintStore, StorageAdapter};
