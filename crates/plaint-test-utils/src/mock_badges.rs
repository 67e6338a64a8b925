// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use plaint_core::types::{Badge, Complaint};
use plaint_core::{BadgeEvaluator, PlaintError};

/// Records which complaints were evaluated and awards one badge per call.
#[derive(Clone, Default)]
pub struct MockBadgeEvaluator {
    evaluated: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl MockBadgeEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Ids of the complaints passed to `evaluate_badges`, in call order.
    pub async fn evaluated(&self) -> Vec<String> {
        self.evaluated.lock().await.clone()
    }
}

#[async_trait]
impl BadgeEvaluator for MockBadgeEvaluator {
    async fn evaluate_badges(&self, complaint: &Complaint) -> Result<Vec<Badge>, PlaintError> {
        self.evaluated.lock().await.push(complaint.id.clone());
        if self.fail {
            return Err(PlaintError::Storage {
                source: "mock badge store unavailable".into(),
            });
        }
        Ok(vec![Badge {
            key: "first_complaint".into(),
            name: "First Voice".into(),
            awarded_at: Utc::now(),
        }])
    }
}
