// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Relational store traits: lifecycle, category catalog, complaint persistence.

use async_trait::async_trait;

use crate::error::PlaintError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Category, Complaint, DuplicateQuery, NewComplaint};

/// Adapter for relational storage backends.
///
/// Storage adapters manage the lifecycle of database connections.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection setup).
    async fn initialize(&self) -> Result<(), PlaintError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), PlaintError>;
}

/// Lookup of category references.
#[async_trait]
pub trait CategoryCatalog: Send + Sync {
    /// Resolves a category by id, or `None` if it does not exist.
    async fn find_category(&self, category_id: &str) -> Result<Option<Category>, PlaintError>;
}

/// Persistence of complaint records.
#[async_trait]
pub trait ComplaintStore: Send + Sync {
    /// Returns the id of an existing complaint matching `query`, if any.
    async fn find_recent_duplicate(
        &self,
        query: &DuplicateQuery,
    ) -> Result<Option<String>, PlaintError>;

    /// Creates the complaint record in a single transaction.
    ///
    /// Referential failures are reported as [`PlaintError::ConstraintViolation`];
    /// anything else is treated as transient by callers.
    async fn create_complaint(&self, complaint: &NewComplaint) -> Result<Complaint, PlaintError>;
}
