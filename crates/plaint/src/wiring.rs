// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Construction of stores and the processor from configuration.
//!
//! Every handle is created here once and passed down explicitly; nothing is
//! held in process-wide statics.

use std::sync::Arc;

use plaint_config::{PlaintConfig, QueueBackend};
use plaint_core::{PlaintError, PluginAdapter, QueueStore, StorageAdapter};
use plaint_intake::{Collaborators, ComplaintProcessor, ProcessorSettings};
use plaint_storage::{SqliteQueueStore, SqliteStorage};
use tracing::{info, warn};

/// Open stores for one process.
pub struct Stores {
    pub storage: Arc<SqliteStorage>,
    pub queue: Arc<dyn QueueStore>,
}

impl Stores {
    pub async fn open(config: &PlaintConfig) -> Result<Self, PlaintError> {
        let storage = SqliteStorage::new(config.storage.clone());
        storage.initialize().await?;
        let storage = Arc::new(storage);
        let queue = open_queue_store(config, &storage).await?;
        info!(
            database = %config.storage.database_path,
            queue_backend = queue.name(),
            "stores opened"
        );
        Ok(Self { storage, queue })
    }

    /// Build a processor over these stores with the configured enrichment clients.
    pub fn processor(&self, config: &PlaintConfig) -> Result<Arc<ComplaintProcessor>, PlaintError> {
        let collaborators = Collaborators {
            queue: Arc::clone(&self.queue),
            catalog: self.storage.clone(),
            complaints: self.storage.clone(),
            moderator: plaint_enrichment::build_moderator(&config.moderation)?,
            classifier: plaint_enrichment::build_classifier(&config.classifier)?,
            badges: self.storage.clone(),
        };
        Ok(Arc::new(ComplaintProcessor::new(
            ProcessorSettings::from_config(config),
            collaborators,
        )))
    }

    /// Close the queue store, then checkpoint the database.
    pub async fn close(&self) {
        if let Err(e) = self.queue.shutdown().await {
            warn!(error = %e, "queue store shutdown failed");
        }
        if let Err(e) = self.storage.close().await {
            warn!(error = %e, "storage close failed");
        }
    }
}

async fn open_queue_store(
    config: &PlaintConfig,
    storage: &SqliteStorage,
) -> Result<Arc<dyn QueueStore>, PlaintError> {
    match config.queue.backend {
        QueueBackend::Sqlite => Ok(Arc::new(SqliteQueueStore::new(
            storage.database()?.clone(),
        ))),
        QueueBackend::Redis => open_redis(config).await,
    }
}

#[cfg(feature = "redis")]
async fn open_redis(config: &PlaintConfig) -> Result<Arc<dyn QueueStore>, PlaintError> {
    let url = config
        .queue
        .redis_url
        .as_deref()
        .ok_or_else(|| PlaintError::Config("queue.redis_url is required for the redis backend".into()))?;
    let store = plaint_redis::RedisQueueStore::connect(url).await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "redis"))]
async fn open_redis(_config: &PlaintConfig) -> Result<Arc<dyn QueueStore>, PlaintError> {
    Err(PlaintError::Config(
        "queue.backend = \"redis\" requires a build with the `redis` feature".into(),
    ))
}
