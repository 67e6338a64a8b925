// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;
use std::time::Duration;

use plaint_intake::PollingScheduler;
use plaint_test_utils::TestHarness;
use plaint_test_utils::fixtures::{CATEGORY_ID, valid_payload};

async fn wait_until<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..200 {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}

#[tokio::test]
async fn start_is_idempotent_and_stop_halts_polling() {
    let h = TestHarness::new().await;
    let scheduler = PollingScheduler::new(Arc::clone(&h.processor), Duration::from_millis(10));

    assert!(!scheduler.is_running().await);
    assert!(scheduler.start().await);
    assert!(!scheduler.start().await);
    assert!(scheduler.is_running().await);

    assert!(scheduler.stop().await);
    assert!(!scheduler.is_running().await);
    assert!(!scheduler.stop().await);
}

#[tokio::test]
async fn scheduler_drains_the_intake_queue() {
    let h = TestHarness::new().await;
    for i in 0..3 {
        let mut value = plaint_test_utils::fixtures::valid_submission_json(CATEGORY_ID);
        value["description"] = serde_json::json!(format!("Streetlight number {i} is broken again"));
        h.enqueue_json(&value).await;
    }
    let scheduler = PollingScheduler::new(Arc::clone(&h.processor), Duration::from_millis(5));
    scheduler.start().await;

    let harness = &h;
    wait_until(move || async move { harness.processed().await.len() == 3 }).await;
    scheduler.shutdown().await;

    assert!(h.intake().await.is_empty());
    assert!(h.in_flight().await.is_empty());
    assert!(!scheduler.is_running().await);
}

#[tokio::test]
async fn stopped_scheduler_runs_no_more_cycles() {
    let h = TestHarness::new().await;
    let scheduler = PollingScheduler::new(Arc::clone(&h.processor), Duration::from_millis(5));
    scheduler.start().await;
    scheduler.shutdown().await;

    h.enqueue_raw(&valid_payload(CATEGORY_ID)).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(h.intake().await.len(), 1);
    assert_eq!(h.store.create_calls().await, 0);
}

#[tokio::test]
async fn scheduler_can_restart_after_stop() {
    let h = TestHarness::new().await;
    let scheduler = PollingScheduler::new(Arc::clone(&h.processor), Duration::from_millis(5));
    scheduler.start().await;
    scheduler.shutdown().await;
    assert!(scheduler.start().await);

    h.enqueue_raw(&valid_payload(CATEGORY_ID)).await;
    let harness = &h;
    wait_until(move || async move { harness.processed().await.len() == 1 }).await;
    scheduler.shutdown().await;
}

#[tokio::test]
async fn concurrent_cycles_never_overlap() {
    let h = TestHarness::new().await;
    for i in 0..10 {
        let mut value = plaint_test_utils::fixtures::valid_submission_json(CATEGORY_ID);
        value["complainantId"] = serde_json::json!(format!("citizen-{i}"));
        h.enqueue_json(&value).await;
    }

    let mut tasks = Vec::new();
    for _ in 0..10 {
        let processor = Arc::clone(&h.processor);
        tasks.push(tokio::spawn(async move { processor.process_next().await }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }
    h.processor.wait_for_side_effects().await;

    assert_eq!(h.store.complaints().await.len(), 10);
    assert_eq!(h.processed().await.len(), 10);
    assert!(h.in_flight().await.is_empty());
}
