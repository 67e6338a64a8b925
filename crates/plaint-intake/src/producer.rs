// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ingress-side helper for putting submissions on the intake queue.
//!
//! Removal from the in-flight queue matches on exact bytes, so every payload
//! must be serialized the same way each time it is handled. Going through
//! [`ComplaintSubmission`] fixes field order and drops unknown keys.

use chrono::Utc;
use plaint_core::{ComplaintSubmission, PlaintError, QueueStore};
use tracing::info;

use crate::error::IntakeError;

/// Stamp the submission date if absent, serialize canonically, and enqueue.
///
/// Returns the exact payload that was pushed.
pub async fn enqueue_submission(
    store: &dyn QueueStore,
    queue: &str,
    submission: &ComplaintSubmission,
) -> Result<String, PlaintError> {
    let mut submission = submission.clone();
    if submission.submission_date.is_none() {
        submission.submission_date = Some(Utc::now());
    }
    let payload = serde_json::to_string(&submission)
        .map_err(|e| PlaintError::Internal(format!("failed to serialize submission: {e}")))?;
    store.push(queue, payload.as_bytes()).await?;
    info!(
        queue,
        payload_len = payload.len(),
        complainant_id = %submission.complainant_id,
        "submission enqueued"
    );
    Ok(payload)
}

/// Re-serialize arbitrary submission JSON into its canonical form.
pub fn canonicalize(raw: &str) -> Result<String, IntakeError> {
    let submission: ComplaintSubmission = serde_json::from_str(raw).map_err(|e| {
        if e.is_syntax() || e.is_eof() {
            IntakeError::Parse(e)
        } else {
            IntakeError::SchemaInvalid(e.to_string())
        }
    })?;
    serde_json::to_string(&submission).map_err(|e| IntakeError::SchemaInvalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_form_ignores_key_order() {
        let a = r#"{"userId":"u","categoryId":"c","subCategory":"s","description":"long enough text","urgency":"LOW","isPublic":false}"#;
        let b = r#"{"isPublic":false,"urgency":"LOW","description":"long enough text","subCategory":"s","categoryId":"c","complainantId":"u"}"#;
        assert_eq!(canonicalize(a).unwrap(), canonicalize(b).unwrap());
    }

    #[test]
    fn canonicalize_classifies_failures() {
        assert!(matches!(canonicalize("{"), Err(IntakeError::Parse(_))));
        assert!(matches!(
            canonicalize(r#"{"userId": 5}"#),
            Err(IntakeError::SchemaInvalid(_))
        ));
    }
}
