// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harnesses for driving the complaint processor end to end.
//!
//! [`TestHarness`] wires a [`ComplaintProcessor`] to in-memory mocks so tests
//! can script every collaborator. [`SqliteHarness`] uses the real SQLite store
//! and queue tables in a temp directory.

use std::sync::Arc;

use plaint_config::model::StorageConfig;
use plaint_core::types::Category;
use plaint_core::{BadgeEvaluator, PlaintError, QueueStore, StorageAdapter};
use plaint_intake::{Collaborators, ComplaintProcessor, ProcessingOutcome, ProcessorSettings};
use plaint_storage::{SqliteQueueStore, SqliteStorage};

use crate::fixtures::CATEGORY_ID;
use crate::mock_badges::MockBadgeEvaluator;
use crate::mock_enrichment::{MockClassifier, MockModerator};
use crate::mock_queue::MockQueueStore;
use crate::mock_store::MockComplaintStore;

/// Builder for creating test environments with configurable collaborators.
pub struct TestHarnessBuilder {
    settings: ProcessorSettings,
    moderator: MockModerator,
    classifier: MockClassifier,
    badges: MockBadgeEvaluator,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            settings: ProcessorSettings::default(),
            moderator: MockModerator::clean(),
            classifier: MockClassifier::echo(),
            badges: MockBadgeEvaluator::new(),
        }
    }

    pub fn with_moderator(mut self, moderator: MockModerator) -> Self {
        self.moderator = moderator;
        self
    }

    pub fn with_classifier(mut self, classifier: MockClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_badges(mut self, badges: MockBadgeEvaluator) -> Self {
        self.badges = badges;
        self
    }

    /// Dead-letter a payload after `max` transient failures.
    pub fn with_max_attempts(mut self, max: u64) -> Self {
        self.settings.max_attempts = Some(max);
        self
    }

    pub fn with_enrichment_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.settings.enrichment_timeout = timeout;
        self
    }

    /// Build the harness with [`CATEGORY_ID`] seeded into the catalog.
    pub async fn build(self) -> TestHarness {
        let queue = MockQueueStore::new();
        let store = MockComplaintStore::new();
        store
            .add_category(CATEGORY_ID, "Water Supply", Some("WATER_SUPPLY_SANITATION"))
            .await;

        let collaborators = Collaborators {
            queue: Arc::new(queue.clone()),
            catalog: Arc::new(store.clone()),
            complaints: Arc::new(store.clone()),
            moderator: Arc::new(self.moderator.clone()),
            classifier: Arc::new(self.classifier.clone()),
            badges: Arc::new(self.badges.clone()),
        };
        let processor = Arc::new(ComplaintProcessor::new(self.settings.clone(), collaborators));

        TestHarness {
            processor,
            settings: self.settings,
            queue,
            store,
            moderator: self.moderator,
            classifier: self.classifier,
            badges: self.badges,
        }
    }
}

/// A processor over mock collaborators, with handles to inspect each one.
pub struct TestHarness {
    pub processor: Arc<ComplaintProcessor>,
    pub settings: ProcessorSettings,
    pub queue: MockQueueStore,
    pub store: MockComplaintStore,
    pub moderator: MockModerator,
    pub classifier: MockClassifier,
    pub badges: MockBadgeEvaluator,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    pub async fn new() -> Self {
        Self::builder().build().await
    }

    /// Push a payload onto the intake queue exactly as given.
    pub async fn enqueue_raw(&self, payload: impl AsRef<[u8]>) {
        self.queue
            .push(&self.settings.queues.intake, payload.as_ref())
            .await
            .expect("mock push cannot fail while available");
    }

    /// Push a JSON value onto the intake queue, returning the payload text.
    pub async fn enqueue_json(&self, value: &serde_json::Value) -> String {
        let payload = value.to_string();
        self.enqueue_raw(&payload).await;
        payload
    }

    /// Run one cycle and wait for its badge evaluation to settle.
    pub async fn cycle(&self) -> Result<ProcessingOutcome, PlaintError> {
        let outcome = self.processor.process_next().await;
        self.processor.wait_for_side_effects().await;
        outcome
    }

    pub async fn intake(&self) -> Vec<String> {
        self.queue.items(&self.settings.queues.intake).await
    }

    pub async fn in_flight(&self) -> Vec<String> {
        self.queue.items(&self.settings.queues.in_flight).await
    }

    pub async fn processed(&self) -> Vec<String> {
        self.queue.items(&self.settings.queues.processed).await
    }

    pub async fn dead_letter(&self) -> Vec<String> {
        self.queue.items(&self.settings.queues.dead_letter).await
    }
}

/// A processor over SQLite storage and the SQLite queue store.
pub struct SqliteHarness {
    pub processor: Arc<ComplaintProcessor>,
    pub settings: ProcessorSettings,
    pub storage: Arc<SqliteStorage>,
    pub queue: Arc<SqliteQueueStore>,
    pub category: Category,
    pub badges: MockBadgeEvaluator,
    _temp_dir: tempfile::TempDir,
}

impl SqliteHarness {
    /// Open a fresh database and seed one category.
    ///
    /// Badge evaluation runs against SQLite unless `mock_badges` is set.
    pub async fn new(mock_badges: bool) -> Result<Self, PlaintError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| PlaintError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("plaint.db");

        let storage = SqliteStorage::new(StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            ..StorageConfig::default()
        });
        storage.initialize().await?;
        let storage = Arc::new(storage);
        let queue = Arc::new(SqliteQueueStore::new(storage.database()?.clone()));
        let category = storage
            .create_category("Water Supply", Some("WATER_SUPPLY_SANITATION"))
            .await?;

        let badges = MockBadgeEvaluator::new();
        let badge_evaluator: Arc<dyn BadgeEvaluator> = if mock_badges {
            Arc::new(badges.clone())
        } else {
            storage.clone()
        };
        let settings = ProcessorSettings::default();
        let collaborators = Collaborators {
            queue: queue.clone(),
            catalog: storage.clone(),
            complaints: storage.clone(),
            moderator: Arc::new(MockModerator::clean()),
            classifier: Arc::new(MockClassifier::echo()),
            badges: badge_evaluator,
        };
        let processor = Arc::new(ComplaintProcessor::new(settings.clone(), collaborators));

        Ok(Self {
            processor,
            settings,
            storage,
            queue,
            category,
            badges,
            _temp_dir: temp_dir,
        })
    }

    pub async fn cycle(&self) -> Result<ProcessingOutcome, PlaintError> {
        let outcome = self.processor.process_next().await;
        self.processor.wait_for_side_effects().await;
        outcome
    }
}
