// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Plaint complaint intake service.
//!
//! This crate provides the error type, the complaint domain types, and the
//! adapter traits that every collaborator (queue store, relational store,
//! moderation, classification, badges) implements. The intake pipeline only
//! ever talks to these traits, so backends are injected at process start.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::PlaintError;
pub use types::{
    AdapterType, Badge, Category, Complaint, ComplaintLocation, ComplaintSubmission,
    DuplicateQuery, HealthStatus, ModerationVerdict, NewComplaint, QueueStatus, Urgency,
};

// Re-export all adapter traits at crate root.
pub use traits::{
    BadgeEvaluator, CategoryCatalog, ComplaintStore, Moderator, PluginAdapter, QueueStore,
    StorageAdapter, SubcategoryClassifier,
};
