// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Plaint complaint intake service.

use thiserror::Error;

/// The primary error type used across all Plaint adapter traits and core operations.
#[derive(Debug, Error)]
pub enum PlaintError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Relational store errors (connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Queue store errors (connection refused, command failure).
    #[error("queue error: {message}")]
    Queue {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A write was refused by a referential or uniqueness constraint.
    #[error("constraint violation: {message}")]
    ConstraintViolation { message: String },

    /// Moderation or classification collaborator failures.
    #[error("enrichment error: {message}")]
    Enrichment {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PlaintError {
    /// Whether retrying the same operation later could succeed.
    ///
    /// Store, queue, collaborator, and timeout failures are transient.
    /// Constraint violations, configuration, and internal errors are not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PlaintError::Storage { .. }
                | PlaintError::Queue { .. }
                | PlaintError::Enrichment { .. }
                | PlaintError::Timeout { .. }
        )
    }

    /// Convenience constructor for queue failures that carry a source error.
    pub fn queue<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        PlaintError::Queue {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(PlaintError::Storage {
            source: Box::new(std::io::Error::other("db gone")),
        }
        .is_transient());
        assert!(PlaintError::queue("lmove failed", std::io::Error::other("refused")).is_transient());
        assert!(PlaintError::Timeout {
            duration: std::time::Duration::from_millis(10),
        }
        .is_transient());

        assert!(!PlaintError::ConstraintViolation {
            message: "FOREIGN KEY constraint failed".into(),
        }
        .is_transient());
        assert!(!PlaintError::Config("bad".into()).is_transient());
        assert!(!PlaintError::Internal("bug".into()).is_transient());
    }

    #[test]
    fn display_includes_message() {
        let err = PlaintError::ConstraintViolation {
            message: "FOREIGN KEY constraint failed".into(),
        };
        assert_eq!(
            err.to_string(),
            "constraint violation: FOREIGN KEY constraint failed"
        );
    }
}
