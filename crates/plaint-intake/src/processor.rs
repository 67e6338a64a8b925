// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The complaint processor: one reservation, one outcome per cycle.
//!
//! A cycle reserves the head of the intake queue into the in-flight queue,
//! runs it through validation and enrichment, persists it, and then either
//! releases the payload (done or dropped) or moves it back to the tail of the
//! intake queue (try again later). The in-flight payload is never left behind
//! unless the queue store itself fails.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use plaint_config::PlaintConfig;
use plaint_config::model::QueueConfig;
use plaint_core::{
    BadgeEvaluator, CategoryCatalog, Complaint, ComplaintStore, DuplicateQuery, HealthStatus,
    Moderator, NewComplaint, PlaintError, QueueStatus, QueueStore, SubcategoryClassifier,
};
use plaint_prometheus::{record_badge_failure, record_cycle, record_enrichment_failure, set_queue_depth};
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use crate::error::{Disposition, IntakeError};
use crate::forwarder::Forwarder;
use crate::outcome::ProcessingOutcome;
use crate::validation::{ValidationRules, parse_payload, validate_submission};

/// Reason reported when a payload exhausts its retry budget.
pub const RETRY_LIMIT_REASON: &str = "retry limit exceeded";

/// Names of the lists the processor works against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueNames {
    pub intake: String,
    pub in_flight: String,
    pub processed: String,
    pub dead_letter: String,
    pub attempts_ledger: String,
}

impl QueueNames {
    pub fn from_config(config: &QueueConfig) -> Self {
        Self {
            intake: config.intake_queue.clone(),
            in_flight: config.in_flight_queue.clone(),
            processed: config.processed_queue.clone(),
            dead_letter: config.dead_letter_queue.clone(),
            attempts_ledger: config.attempts_ledger.clone(),
        }
    }
}

/// Tunables for a processor instance.
#[derive(Debug, Clone)]
pub struct ProcessorSettings {
    pub queues: QueueNames,
    pub rules: ValidationRules,
    /// How far back the duplicate lookup searches.
    pub duplicate_window: chrono::Duration,
    /// Upper bound on each moderation or classification call.
    pub enrichment_timeout: Duration,
    /// Transient failures allowed before dead-lettering. `None` retries forever.
    pub max_attempts: Option<u64>,
}

impl ProcessorSettings {
    pub fn from_config(config: &PlaintConfig) -> Self {
        let hours = i64::try_from(config.processor.duplicate_window_hours).unwrap_or(i64::MAX);
        Self {
            queues: QueueNames::from_config(&config.queue),
            rules: ValidationRules::from_config(&config.processor),
            duplicate_window: chrono::Duration::try_hours(hours).unwrap_or(chrono::Duration::MAX),
            enrichment_timeout: Duration::from_millis(config.processor.enrichment_timeout_ms),
            max_attempts: config.processor.max_attempts,
        }
    }
}

impl Default for ProcessorSettings {
    fn default() -> Self {
        Self::from_config(&PlaintConfig::default())
    }
}

/// Explicitly constructed handles the processor depends on.
#[derive(Clone)]
pub struct Collaborators {
    pub queue: Arc<dyn QueueStore>,
    pub catalog: Arc<dyn CategoryCatalog>,
    pub complaints: Arc<dyn ComplaintStore>,
    pub moderator: Arc<dyn Moderator>,
    pub classifier: Arc<dyn SubcategoryClassifier>,
    pub badges: Arc<dyn BadgeEvaluator>,
}

/// Drives complaints from the intake queue into the relational store.
///
/// Cycles are single-flight per instance: concurrent callers (the scheduler
/// and the manual trigger) wait their turn. Separate processes may poll the
/// same queues; `reserve` is atomic, so they never work the same item.
pub struct ComplaintProcessor {
    settings: ProcessorSettings,
    collaborators: Collaborators,
    forwarder: Forwarder,
    cycle_lock: Mutex<()>,
    side_effects: TaskTracker,
}

impl ComplaintProcessor {
    pub fn new(settings: ProcessorSettings, collaborators: Collaborators) -> Self {
        let forwarder = Forwarder::new(
            Arc::clone(&collaborators.queue),
            settings.queues.processed.clone(),
        );
        Self {
            settings,
            collaborators,
            forwarder,
            cycle_lock: Mutex::new(()),
            side_effects: TaskTracker::new(),
        }
    }

    pub fn settings(&self) -> &ProcessorSettings {
        &self.settings
    }

    pub fn forwarder(&self) -> &Forwarder {
        &self.forwarder
    }

    /// Run one processing cycle.
    ///
    /// Returns `Err` only when the queue store fails while reserving or
    /// disposing of the payload.
    pub async fn process_next(&self) -> Result<ProcessingOutcome, PlaintError> {
        let _cycle = self.cycle_lock.lock().await;
        let started = Instant::now();
        let result = self.run_cycle().await;
        let elapsed = started.elapsed().as_secs_f64();
        match &result {
            Ok(outcome) => record_cycle(outcome.kind(), elapsed),
            Err(e) => {
                record_cycle("error", elapsed);
                error!(error = %e, "processing cycle failed");
            }
        }
        result
    }

    /// Current depths of the intake and in-flight queues.
    pub async fn queue_status(&self) -> Result<QueueStatus, PlaintError> {
        let queues = &self.settings.queues;
        let queue = &self.collaborators.queue;
        let registration = queue.length(&queues.intake).await?;
        let processing = queue.length(&queues.in_flight).await?;
        set_queue_depth(&queues.intake, registration);
        set_queue_depth(&queues.in_flight, processing);
        Ok(QueueStatus {
            registration_queue_length: registration,
            processing_queue_length: processing,
        })
    }

    pub async fn queue_health(&self) -> HealthStatus {
        match self.collaborators.queue.health_check().await {
            Ok(status) => status,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }

    /// Wait until every spawned badge evaluation has finished.
    pub async fn wait_for_side_effects(&self) {
        self.side_effects.close();
        self.side_effects.wait().await;
        self.side_effects.reopen();
    }

    async fn run_cycle(&self) -> Result<ProcessingOutcome, PlaintError> {
        let queues = &self.settings.queues;
        let Some(payload) = self
            .collaborators
            .queue
            .reserve(&queues.intake, &queues.in_flight)
            .await?
        else {
            return Ok(ProcessingOutcome::Empty);
        };
        debug!(queue = %queues.intake, payload_len = payload.len(), "reserved submission");

        match self.persist(&payload).await {
            Ok(complaint) => self.complete(&payload, complaint).await,
            Err(err) => self.dispose(&payload, err).await,
        }
    }

    /// Validate, enrich, and store one payload.
    async fn persist(&self, payload: &[u8]) -> Result<Complaint, IntakeError> {
        let value = parse_payload(payload)?;
        let submission = validate_submission(value, &self.settings.rules)?;

        let category = self
            .collaborators
            .catalog
            .find_category(&submission.category_id)
            .await?
            .ok_or_else(|| IntakeError::ReferenceInvalid(submission.category_id.clone()))?;

        let description = self.moderate(&submission.description).await;
        let standardized_sub_category = self
            .standardize(&submission.sub_category, &description)
            .await;

        let query = DuplicateQuery {
            complainant_id: submission.complainant_id.clone(),
            category_id: submission.category_id.clone(),
            sub_category: submission.sub_category.clone(),
            description: description.clone(),
            since: Utc::now()
                .checked_sub_signed(self.settings.duplicate_window)
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        };
        let prior = self.collaborators.complaints.find_recent_duplicate(&query).await?;
        if let Some(prior_id) = &prior {
            info!(
                complainant_id = %submission.complainant_id,
                prior_id = %prior_id,
                "submission matches a recent complaint"
            );
        }

        let new = NewComplaint {
            complainant_id: submission.complainant_id,
            category_id: submission.category_id,
            sub_category: submission.sub_category,
            standardized_sub_category,
            description,
            urgency: submission.urgency,
            is_public: submission.is_public,
            attachment_url: submission.attachment_url,
            assigned_department: submission
                .assigned_department
                .or(category.assigned_department),
            location: submission.location,
            is_duplicate: prior.is_some(),
            submission_date: submission.submission_date.unwrap_or_else(Utc::now),
        };
        Ok(self.collaborators.complaints.create_complaint(&new).await?)
    }

    async fn complete(
        &self,
        payload: &[u8],
        complaint: Complaint,
    ) -> Result<ProcessingOutcome, PlaintError> {
        let queues = &self.settings.queues;
        // The record is committed; a failed release leaves an in-flight
        // orphan but must not turn the cycle into a failure.
        if let Err(e) = self
            .collaborators
            .queue
            .release(&queues.in_flight, payload)
            .await
        {
            error!(complaint_id = %complaint.id, error = %e, "failed to release persisted submission");
        }
        self.clear_attempts(payload).await;

        let is_duplicate = complaint.is_duplicate;
        if !is_duplicate {
            if let Err(e) = self.forwarder.push_to_queue(&complaint).await {
                error!(complaint_id = %complaint.id, error = %e, "failed to forward complaint");
            }
            self.spawn_badge_evaluation(complaint.clone());
        }

        info!(
            complaint_id = %complaint.id,
            complainant_id = %complaint.complainant_id,
            is_duplicate,
            "complaint registered"
        );
        Ok(ProcessingOutcome::Processed {
            complaint: Box::new(complaint),
            is_duplicate,
        })
    }

    async fn dispose(
        &self,
        payload: &[u8],
        err: IntakeError,
    ) -> Result<ProcessingOutcome, PlaintError> {
        let queues = &self.settings.queues;
        let queue = &self.collaborators.queue;
        let reason = err.reason();
        let payload_text = String::from_utf8_lossy(payload);

        match err.disposition() {
            Disposition::Drop => {
                if let IntakeError::ConstraintViolation(detail) = &err {
                    error!(reason, detail = %detail, payload = %payload_text, "data integrity violation, dropping submission");
                } else {
                    warn!(reason, error = %err, payload = %payload_text, "rejecting submission");
                }
                queue.release(&queues.in_flight, payload).await?;
                self.clear_attempts(payload).await;
                Ok(ProcessingOutcome::rejected(reason))
            }
            Disposition::Requeue => {
                if self.retry_budget_exhausted(payload).await {
                    queue
                        .requeue(&queues.in_flight, &queues.dead_letter, payload)
                        .await?;
                    self.clear_attempts(payload).await;
                    error!(
                        queue = %queues.dead_letter,
                        error = %err,
                        payload = %payload_text,
                        "retry limit reached, submission dead-lettered"
                    );
                    return Ok(ProcessingOutcome::rejected(RETRY_LIMIT_REASON));
                }
                warn!(reason, error = %err, payload_len = payload.len(), "requeueing submission");
                queue
                    .requeue(&queues.in_flight, &queues.intake, payload)
                    .await?;
                Ok(ProcessingOutcome::requeued(reason))
            }
        }
    }

    /// Record a transient failure; true once the payload has used up its attempts.
    async fn retry_budget_exhausted(&self, payload: &[u8]) -> bool {
        let Some(max) = self.settings.max_attempts else {
            return false;
        };
        let ledger = &self.settings.queues.attempts_ledger;
        match self
            .collaborators
            .queue
            .increment_attempts(ledger, &attempts_key(payload))
            .await
        {
            Ok(count) => {
                debug!(attempts = count, max_attempts = max, "transient failure recorded");
                count >= max
            }
            Err(e) => {
                warn!(error = %e, "attempts ledger unavailable, requeueing without counting");
                false
            }
        }
    }

    async fn clear_attempts(&self, payload: &[u8]) {
        if self.settings.max_attempts.is_none() {
            return;
        }
        let ledger = &self.settings.queues.attempts_ledger;
        if let Err(e) = self
            .collaborators
            .queue
            .clear_attempts(ledger, &attempts_key(payload))
            .await
        {
            warn!(error = %e, "failed to clear attempts ledger entry");
        }
    }

    /// Moderated description, or the original text when moderation is unavailable.
    async fn moderate(&self, text: &str) -> String {
        let timeout = self.settings.enrichment_timeout;
        match tokio::time::timeout(timeout, self.collaborators.moderator.moderate(text)).await {
            Ok(Ok(verdict)) if verdict.has_abuse => match verdict.clean_text {
                Some(clean) => {
                    info!("abusive content replaced with sanitized text");
                    clean
                }
                None => {
                    warn!("moderator flagged abuse without sanitized text, keeping original");
                    text.to_string()
                }
            },
            Ok(Ok(_)) => text.to_string(),
            Ok(Err(e)) => {
                record_enrichment_failure("moderation");
                warn!(error = %e, "moderation failed, keeping original text");
                text.to_string()
            }
            Err(_) => {
                record_enrichment_failure("moderation");
                warn!(timeout_ms = timeout.as_millis() as u64, "moderation timed out, keeping original text");
                text.to_string()
            }
        }
    }

    async fn standardize(&self, raw: &str, description: &str) -> Option<String> {
        let timeout = self.settings.enrichment_timeout;
        let call = self
            .collaborators
            .classifier
            .standardize_subcategory(raw, description);
        match tokio::time::timeout(timeout, call).await {
            Ok(Ok(term)) => Some(term),
            Ok(Err(e)) => {
                record_enrichment_failure("classification");
                warn!(error = %e, "subcategory standardization failed, keeping free text");
                None
            }
            Err(_) => {
                record_enrichment_failure("classification");
                warn!(timeout_ms = timeout.as_millis() as u64, "subcategory standardization timed out");
                None
            }
        }
    }

    fn spawn_badge_evaluation(&self, complaint: Complaint) {
        let badges = Arc::clone(&self.collaborators.badges);
        self.side_effects.spawn(async move {
            match badges.evaluate_badges(&complaint).await {
                Ok(awarded) if !awarded.is_empty() => {
                    let keys: Vec<&str> = awarded.iter().map(|b| b.key.as_str()).collect();
                    info!(
                        complainant_id = %complaint.complainant_id,
                        badges = ?keys,
                        "badges awarded"
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    record_badge_failure();
                    warn!(complaint_id = %complaint.id, error = %e, "badge evaluation failed");
                }
            }
        });
    }
}

/// Attempts-ledger key for a payload: hex SHA-256 of its exact bytes.
pub fn attempts_key(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}
