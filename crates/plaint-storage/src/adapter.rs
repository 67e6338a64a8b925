// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the relational store traits.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use plaint_config::model::StorageConfig;
use plaint_core::{
    AdapterType, Badge, BadgeEvaluator, Category, CategoryCatalog, Complaint, ComplaintStore,
    DuplicateQuery, HealthStatus, NewComplaint, PlaintError, PluginAdapter, StorageAdapter,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed relational store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is opened on the first call to
/// [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`StorageAdapter::initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    pub fn database(&self) -> Result<&Database, PlaintError> {
        self.db.get().ok_or_else(|| PlaintError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    /// Add a category to the catalog.
    pub async fn create_category(
        &self,
        name: &str,
        assigned_department: Option<&str>,
    ) -> Result<Category, PlaintError> {
        queries::categories::create_category(self.database()?, name, assigned_department).await
    }

    /// All catalog entries.
    pub async fn list_categories(&self) -> Result<Vec<Category>, PlaintError> {
        queries::categories::list_categories(self.database()?).await
    }

    /// Fetch a stored complaint.
    pub async fn get_complaint(&self, id: &str) -> Result<Option<Complaint>, PlaintError> {
        queries::complaints::get_complaint(self.database()?, id).await
    }

    /// Badges held by a complainant.
    pub async fn list_badges(&self, complainant_id: &str) -> Result<Vec<Badge>, PlaintError> {
        queries::badges::list_badges(self.database()?, complainant_id).await
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, PlaintError> {
        let Some(db) = self.db.get() else {
            return Ok(HealthStatus::Unhealthy("not initialized".to_string()));
        };
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PlaintError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), PlaintError> {
        let db = Database::open_with(&self.config).await?;
        self.db.set(db).map_err(|_| PlaintError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), PlaintError> {
        self.database()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl CategoryCatalog for SqliteStorage {
    async fn find_category(&self, category_id: &str) -> Result<Option<Category>, PlaintError> {
        queries::categories::get_category(self.database()?, category_id).await
    }
}

#[async_trait]
impl ComplaintStore for SqliteStorage {
    async fn find_recent_duplicate(
        &self,
        query: &DuplicateQuery,
    ) -> Result<Option<String>, PlaintError> {
        queries::complaints::find_recent_duplicate(self.database()?, query).await
    }

    async fn create_complaint(&self, complaint: &NewComplaint) -> Result<Complaint, PlaintError> {
        queries::complaints::create_complaint(self.database()?, complaint).await
    }
}

#[async_trait]
impl BadgeEvaluator for SqliteStorage {
    async fn evaluate_badges(&self, complaint: &Complaint) -> Result<Vec<Badge>, PlaintError> {
        if complaint.is_duplicate {
            return Ok(Vec::new());
        }
        let db = self.database()?;
        let count =
            queries::complaints::count_original_complaints(db, &complaint.complainant_id).await?;
        queries::badges::award_milestones(db, &complaint.complainant_id, count).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use plaint_core::Urgency;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            ..StorageConfig::default()
        }
    }

    async fn initialized() -> (SqliteStorage, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("adapter.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();
        (storage, dir)
    }

    fn new_complaint(category_id: &str) -> NewComplaint {
        NewComplaint {
            complainant_id: "citizen-9".to_string(),
            category_id: category_id.to_string(),
            sub_category: "Pothole".to_string(),
            standardized_sub_category: None,
            description: "Large pothole on the main road".to_string(),
            urgency: Urgency::Medium,
            is_public: false,
            attachment_url: None,
            assigned_department: None,
            location: None,
            is_duplicate: false,
            submission_date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn sqlite_storage_implements_plugin_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert_eq!(storage.name(), "sqlite");
        assert_eq!(storage.version(), semver::Version::new(0, 1, 0));
        assert_eq!(storage.adapter_type(), AdapterType::Storage);
        assert!(matches!(
            storage.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let (storage, _dir) = initialized().await;
        assert!(storage.initialize().await.is_err());
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn queries_before_initialize_fail() {
        let storage = SqliteStorage::new(make_config("/nonexistent/never-opened.db"));
        let err = storage.find_category("x").await.unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn catalog_and_complaint_round_through_traits() {
        let (storage, _dir) = initialized().await;
        let category = storage.create_category("Roads", Some("PUBLIC_WORKS")).await.unwrap();

        let found = storage.find_category(&category.id).await.unwrap();
        assert_eq!(found.as_ref().map(|c| c.name.as_str()), Some("Roads"));

        let created = storage.create_complaint(&new_complaint(&category.id)).await.unwrap();
        let stored = storage.get_complaint(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.description, "Large pothole on the main road");
        storage.close().await.unwrap();
    }

    #[tokio::test]
    async fn badges_follow_original_complaint_count() {
        let (storage, _dir) = initialized().await;
        let category = storage.create_category("Roads", None).await.unwrap();

        let first = storage.create_complaint(&new_complaint(&category.id)).await.unwrap();
        let badges = storage.evaluate_badges(&first).await.unwrap();
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].key, "first_complaint");

        let mut dup = new_complaint(&category.id);
        dup.is_duplicate = true;
        let dup = storage.create_complaint(&dup).await.unwrap();
        assert!(storage.evaluate_badges(&dup).await.unwrap().is_empty());

        assert_eq!(storage.list_badges("citizen-9").await.unwrap().len(), 1);
        storage.shutdown().await.unwrap();
    }
}
