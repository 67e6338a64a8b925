// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named ordered lists stored in the `queue_items` table.
//!
//! A list is the set of rows sharing a `queue_name`, ordered by id. Moving an
//! item between lists deletes the row and inserts a fresh one, so the item
//! always lands at the tail of the destination. Multi-statement operations
//! run in `BEGIN IMMEDIATE` transactions, which take the write lock up front
//! and keep them atomic with respect to other processes on the same file.

use plaint_core::PlaintError;
use rusqlite::types::Value;
use rusqlite::{params, OptionalExtension, Transaction, TransactionBehavior};

use crate::database::{map_tr_err, Database};

// Payloads are read and matched as blobs so that rows written as text by a
// producer and rows holding arbitrary bytes compare the same way.
const SELECT_HEAD: &str = "SELECT id, CAST(payload AS BLOB) FROM queue_items
     WHERE queue_name = ?1 ORDER BY id ASC LIMIT 1";

/// Bind form of a payload: text when it is valid UTF-8, a blob otherwise.
fn payload_value(payload: &[u8]) -> Value {
    match std::str::from_utf8(payload) {
        Ok(text) => Value::Text(text.to_string()),
        Err(_) => Value::Blob(payload.to_vec()),
    }
}

/// Re-append row `id` to the tail of `destination`, keeping its stored value
/// untouched, and delete the original row.
fn move_row(tx: &Transaction<'_>, id: i64, destination: &str) -> rusqlite::Result<()> {
    tx.execute(
        "INSERT INTO queue_items (queue_name, payload)
         SELECT ?1, payload FROM queue_items WHERE id = ?2",
        params![destination, id],
    )?;
    tx.execute("DELETE FROM queue_items WHERE id = ?1", params![id])?;
    Ok(())
}

/// Append `payload` to the tail of `queue_name`.
pub async fn push(db: &Database, queue_name: &str, payload: &[u8]) -> Result<(), PlaintError> {
    let queue_name = queue_name.to_string();
    let payload = payload_value(payload);
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO queue_items (queue_name, payload) VALUES (?1, ?2)",
                params![queue_name, payload],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Atomically move the head of `source` to the tail of `destination`.
pub async fn move_head(
    db: &Database,
    source: &str,
    destination: &str,
) -> Result<Option<Vec<u8>>, PlaintError> {
    let source = source.to_string();
    let destination = destination.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let head: Option<(i64, Vec<u8>)> = tx
                .query_row(SELECT_HEAD, params![source], |row| {
                    Ok((row.get(0)?, row.get(1)?))
                })
                .optional()?;
            let Some((id, payload)) = head else {
                tx.commit()?;
                return Ok(None);
            };
            move_row(&tx, id, &destination)?;
            tx.commit()?;
            Ok(Some(payload))
        })
        .await
        .map_err(map_tr_err)
}

/// Remove the first occurrence of `payload` from `queue_name`.
///
/// Returns whether an item was removed.
pub async fn remove_first(
    db: &Database,
    queue_name: &str,
    payload: &[u8],
) -> Result<bool, PlaintError> {
    let queue_name = queue_name.to_string();
    let payload = payload.to_vec();
    db.connection()
        .call(move |conn| {
            let removed = conn.execute(
                "DELETE FROM queue_items WHERE id = (
                     SELECT id FROM queue_items
                     WHERE queue_name = ?1 AND CAST(payload AS BLOB) = ?2
                     ORDER BY id ASC LIMIT 1
                 )",
                params![queue_name, payload],
            )?;
            Ok(removed > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Remove the last occurrence of `payload` from `source` and append it to
/// `destination`, in one transaction.
///
/// Nothing is appended when `payload` is not in `source`.
pub async fn move_last_occurrence(
    db: &Database,
    source: &str,
    destination: &str,
    payload: &[u8],
) -> Result<bool, PlaintError> {
    let source = source.to_string();
    let destination = destination.to_string();
    let payload = payload.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let id: Option<i64> = tx
                .query_row(
                    "SELECT id FROM queue_items
                     WHERE queue_name = ?1 AND CAST(payload AS BLOB) = ?2
                     ORDER BY id DESC LIMIT 1",
                    params![source, payload],
                    |row| row.get(0),
                )
                .optional()?;
            let Some(id) = id else {
                tx.commit()?;
                return Ok(false);
            };
            move_row(&tx, id, &destination)?;
            tx.commit()?;
            Ok(true)
        })
        .await
        .map_err(map_tr_err)
}

/// Remove and return the head of `queue_name`.
pub async fn pop(db: &Database, queue_name: &str) -> Result<Option<Vec<u8>>, PlaintError> {
    let queue_name = queue_name.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let head: Option<(i64, Vec<u8>)> = tx
                .query_row(SELECT_HEAD, params![queue_name], |row| {
                    Ok((row.get(0)?, row.get(1)?))
                })
                .optional()?;
            if let Some((id, _)) = &head {
                tx.execute("DELETE FROM queue_items WHERE id = ?1", params![id])?;
            }
            tx.commit()?;
            Ok(head.map(|(_, payload)| payload))
        })
        .await
        .map_err(map_tr_err)
}

/// Return the head of `queue_name` without removing it.
pub async fn peek(db: &Database, queue_name: &str) -> Result<Option<Vec<u8>>, PlaintError> {
    let queue_name = queue_name.to_string();
    db.connection()
        .call(move |conn| {
            let head = conn
                .query_row(SELECT_HEAD, params![queue_name], |row| {
                    row.get::<_, Vec<u8>>(1)
                })
                .optional()?;
            Ok(head)
        })
        .await
        .map_err(map_tr_err)
}

/// Number of items in `queue_name`.
pub async fn length(db: &Database, queue_name: &str) -> Result<u64, PlaintError> {
    let queue_name = queue_name.to_string();
    db.connection()
        .call(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM queue_items WHERE queue_name = ?1",
                params![queue_name],
                |row| row.get(0),
            )?;
            Ok(count.max(0) as u64)
        })
        .await
        .map_err(map_tr_err)
}

/// Increment the attempt counter for `key`, returning the new value.
pub async fn increment_attempts(db: &Database, ledger: &str, key: &str) -> Result<u64, PlaintError> {
    let ledger = ledger.to_string();
    let key = key.to_string();
    db.connection()
        .call(move |conn| {
            let attempts: i64 = conn.query_row(
                "INSERT INTO queue_attempts (ledger, item_key, attempts) VALUES (?1, ?2, 1)
                 ON CONFLICT (ledger, item_key) DO UPDATE SET
                     attempts = attempts + 1,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 RETURNING attempts",
                params![ledger, key],
                |row| row.get(0),
            )?;
            Ok(attempts.max(0) as u64)
        })
        .await
        .map_err(map_tr_err)
}

/// Forget the attempt counter for `key`.
pub async fn clear_attempts(db: &Database, ledger: &str, key: &str) -> Result<(), PlaintError> {
    let ledger = ledger.to_string();
    let key = key.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "DELETE FROM queue_attempts WHERE ledger = ?1 AND item_key = ?2",
                params![ledger, key],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
