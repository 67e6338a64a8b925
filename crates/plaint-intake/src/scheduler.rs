// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-interval polling of the intake queue.
//!
//! At most one polling task exists per scheduler. Each tick runs exactly one
//! cycle and the next tick waits for it, so ticks never overlap. Stopping
//! cancels the timer; a cycle already past `reserve` runs to completion.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::outcome::ProcessingOutcome;
use crate::processor::ComplaintProcessor;

struct Running {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct PollingScheduler {
    processor: Arc<ComplaintProcessor>,
    interval: Duration,
    running: Mutex<Option<Running>>,
}

impl PollingScheduler {
    pub fn new(processor: Arc<ComplaintProcessor>, interval: Duration) -> Self {
        Self {
            processor,
            interval,
            running: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start polling. Returns `false` if polling was already active.
    pub async fn start(&self) -> bool {
        let mut running = self.running.lock().await;
        if let Some(current) = running.as_ref()
            && !current.handle.is_finished()
        {
            debug!("polling already active");
            return false;
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(
            Arc::clone(&self.processor),
            self.interval,
            cancel.clone(),
        ));
        *running = Some(Running { cancel, handle });
        info!(interval_ms = self.interval.as_millis() as u64, "polling started");
        true
    }

    /// Stop polling. Returns `false` if polling was not active.
    pub async fn stop(&self) -> bool {
        let Some(current) = self.running.lock().await.take() else {
            return false;
        };
        current.cancel.cancel();
        info!("polling stopped");
        !current.handle.is_finished()
    }

    pub async fn is_running(&self) -> bool {
        self.running
            .lock()
            .await
            .as_ref()
            .is_some_and(|r| !r.handle.is_finished())
    }

    /// Stop polling and wait for the in-progress cycle, if any, to finish.
    pub async fn shutdown(&self) {
        let Some(current) = self.running.lock().await.take() else {
            return;
        };
        current.cancel.cancel();
        if let Err(e) = current.handle.await {
            warn!(error = %e, "polling task ended abnormally");
        }
        info!("polling shut down");
    }
}

async fn poll_loop(
    processor: Arc<ComplaintProcessor>,
    interval: Duration,
    cancel: CancellationToken,
) {
    loop {
        if cancel.is_cancelled() {
            break;
        }
        // Errors are already logged and counted by the processor.
        if let Ok(outcome) = processor.process_next().await
            && !matches!(outcome, ProcessingOutcome::Empty)
        {
            debug!(outcome = outcome.kind(), "scheduled cycle finished");
        }
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }
    debug!("polling loop exited");
}
