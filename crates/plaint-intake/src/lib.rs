// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Complaint intake pipeline.
//!
//! Submissions arrive as serialized payloads on a named intake queue. The
//! [`ComplaintProcessor`] reserves them one at a time, validates and enriches
//! them, persists them, and forwards new complaints to the processed queue.
//! The [`PollingScheduler`] drives the processor on a fixed interval.

pub mod error;
pub mod forwarder;
pub mod outcome;
pub mod processor;
pub mod producer;
pub mod scheduler;
pub mod validation;

pub use error::{Disposition, IntakeError};
pub use forwarder::Forwarder;
pub use outcome::ProcessingOutcome;
pub use processor::{
    Collaborators, ComplaintProcessor, ProcessorSettings, QueueNames, RETRY_LIMIT_REASON,
    attempts_key,
};
pub use producer::{canonicalize, enqueue_submission};
pub use scheduler::PollingScheduler;
pub use validation::ValidationRules;
