// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes within one process.
//! Separate processes sharing the file rely on `BEGIN IMMEDIATE` transactions
//! and the busy timeout instead.

use std::path::Path;
use std::time::Duration;

use plaint_config::model::StorageConfig;
use plaint_core::PlaintError;
use tracing::debug;

/// Handle to the single SQLite writer connection.
///
/// Cloning is cheap: every clone talks to the same background thread.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open the database at `path` with default settings (WAL, 5s busy timeout).
    pub async fn open(path: &str) -> Result<Self, PlaintError> {
        Self::open_with(&StorageConfig {
            database_path: path.to_string(),
            ..StorageConfig::default()
        })
        .await
    }

    /// Open the configured database, apply PRAGMAs, and run pending migrations.
    ///
    /// Creates the parent directory when it does not exist yet.
    pub async fn open_with(config: &StorageConfig) -> Result<Self, PlaintError> {
        let path = config.database_path.clone();
        if let Some(parent) = Path::new(&path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| PlaintError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = tokio_rusqlite::Connection::open(&path)
            .await
            .map_err(|e| PlaintError::Storage {
                source: Box::new(e),
            })?;

        let wal_mode = config.wal_mode;
        let busy_timeout = Duration::from_millis(config.busy_timeout_ms);
        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            conn.busy_timeout(busy_timeout)?;
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")?;
            }
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(crate::migrations::run_migrations)
            .await
            .map_err(|e| match e {
                tokio_rusqlite::Error::Error(inner) => inner,
                other => PlaintError::Storage {
                    source: format!("migration call failed: {other}").into(),
                },
            })?;

        debug!(path = %path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL into the main database file.
    pub async fn checkpoint(&self) -> Result<(), PlaintError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    /// Checkpoint and close the connection.
    ///
    /// Other clones of this handle stop working once the background thread exits.
    pub async fn close(self) -> Result<(), PlaintError> {
        self.checkpoint().await?;
        self.conn.close().await.map_err(|e| PlaintError::Storage {
            source: format!("failed to close database: {e}").into(),
        })
    }
}

/// Convert a tokio-rusqlite error into a [`PlaintError`].
///
/// Foreign-key failures become [`PlaintError::ConstraintViolation`] so callers
/// can tell a bad reference apart from an unavailable store.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> PlaintError {
    match e {
        tokio_rusqlite::Error::Error(inner) => map_sqlite_err(inner),
        other => PlaintError::Storage {
            source: Box::new(other),
        },
    }
}

/// Convert a rusqlite error, classifying constraint failures.
pub fn map_sqlite_err(e: rusqlite::Error) -> PlaintError {
    match &e {
        rusqlite::Error::SqliteFailure(err, message)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
        {
            PlaintError::ConstraintViolation {
                message: message
                    .clone()
                    .unwrap_or_else(|| "FOREIGN KEY constraint failed".to_string()),
            }
        }
        _ => PlaintError::Storage {
            source: Box::new(e),
        },
    }
}
