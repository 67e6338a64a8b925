// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Badge evaluation trait.

use async_trait::async_trait;

use crate::error::PlaintError;
use crate::types::{Badge, Complaint};

/// Awards achievement badges after a complaint is registered.
#[async_trait]
pub trait BadgeEvaluator: Send + Sync {
    /// Evaluates badges for the complainant of `complaint`, returning any newly awarded.
    async fn evaluate_badges(&self, complaint: &Complaint) -> Result<Vec<Badge>, PlaintError>;
}
