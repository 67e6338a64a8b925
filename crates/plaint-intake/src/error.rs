// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Failure taxonomy for one processing cycle.

use plaint_core::PlaintError;
use thiserror::Error;

/// Why a reserved payload could not be turned into a stored complaint.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// The payload bytes are not JSON at all.
    #[error("unparsable payload: {0}")]
    Parse(#[source] serde_json::Error),

    /// JSON that does not describe a valid submission.
    #[error("invalid schema: {0}")]
    SchemaInvalid(String),

    /// The referenced category does not exist.
    #[error("unknown category `{0}`")]
    ReferenceInvalid(String),

    /// The store refused the write on referential grounds.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// Store or network failure; the same payload may succeed later.
    #[error("transient failure: {0}")]
    TransientInfra(#[source] PlaintError),
}

/// What happens to the in-flight payload after an [`IntakeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Move back to the tail of the intake queue.
    Requeue,
    /// Remove from the in-flight queue for good.
    Drop,
}

impl IntakeError {
    pub fn disposition(&self) -> Disposition {
        match self {
            IntakeError::Parse(_) | IntakeError::TransientInfra(_) => Disposition::Requeue,
            IntakeError::SchemaInvalid(_)
            | IntakeError::ReferenceInvalid(_)
            | IntakeError::ConstraintViolation(_) => Disposition::Drop,
        }
    }

    /// Short reason reported in the cycle outcome.
    pub fn reason(&self) -> &'static str {
        match self {
            IntakeError::Parse(_) => "unparsable payload, will retry",
            IntakeError::SchemaInvalid(_) => "invalid schema",
            IntakeError::ReferenceInvalid(_) => "invalid categoryId",
            IntakeError::ConstraintViolation(_) => "invalid complaint removed from queue",
            IntakeError::TransientInfra(_) => "processing failed, will retry",
        }
    }
}

impl From<PlaintError> for IntakeError {
    /// Constraint violations stay terminal; every other store error is transient.
    fn from(err: PlaintError) -> Self {
        match err {
            PlaintError::ConstraintViolation { message } => IntakeError::ConstraintViolation(message),
            other => IntakeError::TransientInfra(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispositions_follow_taxonomy() {
        let parse = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        assert_eq!(IntakeError::Parse(parse).disposition(), Disposition::Requeue);
        assert_eq!(
            IntakeError::SchemaInvalid("x".into()).disposition(),
            Disposition::Drop
        );
        assert_eq!(
            IntakeError::ReferenceInvalid("c".into()).disposition(),
            Disposition::Drop
        );
        assert_eq!(
            IntakeError::ConstraintViolation("fk".into()).disposition(),
            Disposition::Drop
        );
        assert_eq!(
            IntakeError::TransientInfra(PlaintError::Internal("x".into())).disposition(),
            Disposition::Requeue
        );
    }

    #[test]
    fn store_errors_are_classified() {
        let fk: IntakeError = PlaintError::ConstraintViolation {
            message: "FOREIGN KEY constraint failed".into(),
        }
        .into();
        assert_eq!(fk.reason(), "invalid complaint removed from queue");

        let down: IntakeError = PlaintError::Storage {
            source: "database is locked".into(),
        }
        .into();
        assert_eq!(down.disposition(), Disposition::Requeue);
        assert!(down.reason().ends_with("will retry"));
    }
}
