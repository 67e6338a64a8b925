// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use plaint_core::ComplaintSubmission;
use plaint_intake::{ProcessingOutcome, enqueue_submission};
use plaint_test_utils::TestHarness;
use plaint_test_utils::fixtures::{CATEGORY_ID, valid_submission};

#[tokio::test]
async fn enqueue_stamps_date_and_round_trips_through_processor() {
    let h = TestHarness::new().await;
    let mut submission = valid_submission(CATEGORY_ID);
    submission.submission_date = None;

    let payload = enqueue_submission(&h.queue, &h.settings.queues.intake, &submission)
        .await
        .unwrap();

    assert_eq!(h.intake().await, vec![payload.clone()]);
    let queued: ComplaintSubmission = serde_json::from_str(&payload).unwrap();
    assert!(queued.submission_date.is_some());

    let outcome = h.cycle().await.unwrap();
    assert!(matches!(outcome, ProcessingOutcome::Processed { .. }));
}

#[tokio::test]
async fn existing_submission_date_is_kept() {
    let h = TestHarness::new().await;
    let submission = valid_submission(CATEGORY_ID);

    let payload = enqueue_submission(&h.queue, &h.settings.queues.intake, &submission)
        .await
        .unwrap();

    let queued: ComplaintSubmission = serde_json::from_str(&payload).unwrap();
    assert_eq!(queued.submission_date, submission.submission_date);
}
