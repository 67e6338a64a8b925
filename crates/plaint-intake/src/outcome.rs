// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use plaint_core::Complaint;
use serde::Serialize;

/// Result of one processing cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum ProcessingOutcome {
    /// The intake queue was empty.
    Empty,
    /// The payload was dropped for good.
    Rejected { reason: String },
    /// The payload went back to the tail of the intake queue.
    Requeued { reason: String },
    /// A complaint was persisted.
    #[serde(rename_all = "camelCase")]
    Processed {
        complaint: Box<Complaint>,
        is_duplicate: bool,
    },
}

impl ProcessingOutcome {
    pub(crate) fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    pub(crate) fn requeued(reason: impl Into<String>) -> Self {
        Self::Requeued {
            reason: reason.into(),
        }
    }

    /// Metric label for this outcome. Duplicates are counted separately.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Rejected { .. } => "rejected",
            Self::Requeued { .. } => "requeued",
            Self::Processed {
                is_duplicate: true, ..
            } => "duplicate",
            Self::Processed { .. } => "processed",
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Rejected { reason } | Self::Requeued { reason } => Some(reason),
            _ => None,
        }
    }
}
