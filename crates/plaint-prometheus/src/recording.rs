// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade so any recorder (Prometheus, statsd, etc.)
//! can collect these metrics. With no recorder installed every call is a no-op.

use metrics::{describe_counter, describe_gauge, describe_histogram, Unit};

/// Register all Plaint metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "plaint_cycles_total",
        "Processing cycles by outcome (processed, duplicate, rejected, requeued, empty, failed)"
    );
    describe_histogram!(
        "plaint_cycle_duration_seconds",
        Unit::Seconds,
        "Wall time of one processing cycle"
    );
    describe_gauge!("plaint_queue_depth", "Items in a named queue at last observation");
    describe_counter!(
        "plaint_enrichment_failures_total",
        "Moderation or classification calls that failed or timed out"
    );
    describe_counter!(
        "plaint_badge_failures_total",
        "Badge evaluations that failed after the complaint was stored"
    );
    describe_gauge!("plaint_memory_heap_bytes", "Heap bytes allocated (jemalloc)");
    describe_gauge!("plaint_memory_resident_bytes", "Resident bytes (jemalloc)");
}

/// Record the outcome of one processing cycle.
pub fn record_cycle(outcome: &'static str, seconds: f64) {
    metrics::counter!("plaint_cycles_total", "outcome" => outcome).increment(1);
    metrics::histogram!("plaint_cycle_duration_seconds").record(seconds);
}

/// Record the current depth of a named queue.
pub fn set_queue_depth(queue: &str, depth: u64) {
    metrics::gauge!("plaint_queue_depth", "queue" => queue.to_string()).set(depth as f64);
}

/// Record a failed enrichment step (`moderation` or `classification`).
pub fn record_enrichment_failure(step: &'static str) {
    metrics::counter!("plaint_enrichment_failures_total", "step" => step).increment(1);
}

/// Record a failed badge evaluation.
pub fn record_badge_failure() {
    metrics::counter!("plaint_badge_failures_total").increment(1);
}

/// Set allocator heap usage.
pub fn set_memory_heap(bytes: f64) {
    metrics::gauge!("plaint_memory_heap_bytes").set(bytes);
}

/// Set allocator resident memory.
pub fn set_memory_resident(bytes: f64) {
    metrics::gauge!("plaint_memory_resident_bytes").set(bytes);
}
