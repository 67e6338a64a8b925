// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot commands: `process`, `enqueue`, `category add`, `category list`.

use std::path::Path;

use plaint_config::PlaintConfig;
use plaint_core::{ComplaintSubmission, PlaintError};
use plaint_intake::{IntakeError, canonicalize, enqueue_submission};

use crate::wiring::Stores;

/// Run one processing cycle and print the outcome as JSON.
pub async fn run_process(config: &PlaintConfig) -> Result<(), PlaintError> {
    let stores = Stores::open(config).await?;
    let processor = stores.processor(config)?;
    let outcome = processor.process_next().await;
    processor.wait_for_side_effects().await;
    stores.close().await;

    let outcome = outcome?;
    println!("{}", to_pretty(&outcome)?);
    Ok(())
}

/// Read a submission from `file`, validate its shape, and enqueue it.
pub async fn run_enqueue(config: &PlaintConfig, file: &Path) -> Result<(), PlaintError> {
    let raw = std::fs::read_to_string(file).map_err(|e| {
        PlaintError::Internal(format!("failed to read {}: {e}", file.display()))
    })?;
    let submission = parse_submission(&raw)?;

    let stores = Stores::open(config).await?;
    let pushed =
        enqueue_submission(stores.queue.as_ref(), &config.queue.intake_queue, &submission).await;
    stores.close().await;

    let payload = pushed?;
    println!(
        "enqueued {} bytes onto {}",
        payload.len(),
        config.queue.intake_queue
    );
    Ok(())
}

pub async fn run_category_add(
    config: &PlaintConfig,
    name: &str,
    department: Option<&str>,
) -> Result<(), PlaintError> {
    let stores = Stores::open(config).await?;
    let created = stores.storage.create_category(name, department).await;
    stores.close().await;

    let category = created?;
    println!("{}", category.id);
    Ok(())
}

pub async fn run_category_list(config: &PlaintConfig) -> Result<(), PlaintError> {
    let stores = Stores::open(config).await?;
    let listed = stores.storage.list_categories().await;
    stores.close().await;

    for category in listed? {
        match &category.assigned_department {
            Some(dept) => println!("{}  {}  ({dept})", category.id, category.name),
            None => println!("{}  {}", category.id, category.name),
        }
    }
    Ok(())
}

fn parse_submission(raw: &str) -> Result<ComplaintSubmission, PlaintError> {
    let canonical = canonicalize(raw).map_err(|e| match e {
        IntakeError::Parse(err) => PlaintError::Internal(format!("submission is not JSON: {err}")),
        other => PlaintError::Internal(format!("submission rejected: {other}")),
    })?;
    serde_json::from_str(&canonical)
        .map_err(|e| PlaintError::Internal(format!("submission rejected: {e}")))
}

fn to_pretty<T: serde::Serialize>(value: &T) -> Result<String, PlaintError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| PlaintError::Internal(format!("failed to render output: {e}")))
}
