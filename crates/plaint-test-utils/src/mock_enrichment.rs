// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted moderation and classification collaborators.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use plaint_core::traits::adapter::PluginAdapter;
use plaint_core::types::{AdapterType, HealthStatus, ModerationVerdict};
use plaint_core::{Moderator, PlaintError, SubcategoryClassifier};

#[derive(Clone)]
enum Behavior<T> {
    Answer(T),
    Fail,
    Stall(Duration),
}

async fn act<T: Clone>(behavior: &Behavior<T>, what: &str) -> Result<T, PlaintError> {
    match behavior {
        Behavior::Answer(value) => Ok(value.clone()),
        Behavior::Fail => Err(PlaintError::Enrichment {
            message: format!("mock {what} unavailable"),
            source: None,
        }),
        Behavior::Stall(delay) => {
            tokio::time::sleep(*delay).await;
            Err(PlaintError::Enrichment {
                message: format!("mock {what} answered too late"),
                source: None,
            })
        }
    }
}

macro_rules! mock_adapter {
    ($ty:ty, $name:literal, $kind:expr) => {
        #[async_trait]
        impl PluginAdapter for $ty {
            fn name(&self) -> &str {
                $name
            }

            fn version(&self) -> semver::Version {
                semver::Version::new(0, 1, 0)
            }

            fn adapter_type(&self) -> AdapterType {
                $kind
            }

            async fn health_check(&self) -> Result<HealthStatus, PlaintError> {
                Ok(HealthStatus::Healthy)
            }

            async fn shutdown(&self) -> Result<(), PlaintError> {
                Ok(())
            }
        }
    };
}

#[derive(Clone)]
pub struct MockModerator {
    behavior: Behavior<ModerationVerdict>,
    calls: Arc<AtomicUsize>,
}

impl MockModerator {
    fn with(behavior: Behavior<ModerationVerdict>) -> Self {
        Self {
            behavior,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Finds nothing to moderate.
    pub fn clean() -> Self {
        Self::with(Behavior::Answer(ModerationVerdict::default()))
    }

    /// Flags every text and offers `clean_text` as the replacement.
    pub fn abusive(clean_text: &str) -> Self {
        Self::with(Behavior::Answer(ModerationVerdict {
            has_abuse: true,
            clean_text: Some(clean_text.to_string()),
        }))
    }

    pub fn failing() -> Self {
        Self::with(Behavior::Fail)
    }

    /// Sleeps for `delay` before failing.
    pub fn slow(delay: Duration) -> Self {
        Self::with(Behavior::Stall(delay))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

mock_adapter!(MockModerator, "mock-moderator", AdapterType::Moderation);

#[async_trait]
impl Moderator for MockModerator {
    async fn moderate(&self, _text: &str) -> Result<ModerationVerdict, PlaintError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        act(&self.behavior, "moderator").await
    }
}

#[derive(Clone)]
pub struct MockClassifier {
    behavior: Behavior<Option<String>>,
    calls: Arc<AtomicUsize>,
}

impl MockClassifier {
    fn with(behavior: Behavior<Option<String>>) -> Self {
        Self {
            behavior,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns the raw subcategory unchanged.
    pub fn echo() -> Self {
        Self::with(Behavior::Answer(None))
    }

    pub fn returning(term: &str) -> Self {
        Self::with(Behavior::Answer(Some(term.to_string())))
    }

    pub fn failing() -> Self {
        Self::with(Behavior::Fail)
    }

    pub fn slow(delay: Duration) -> Self {
        Self::with(Behavior::Stall(delay))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

mock_adapter!(MockClassifier, "mock-classifier", AdapterType::Classifier);

#[async_trait]
impl SubcategoryClassifier for MockClassifier {
    async fn standardize_subcategory(
        &self,
        raw: &str,
        _description: &str,
    ) -> Result<String, PlaintError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let term = act(&self.behavior, "classifier").await?;
        Ok(term.unwrap_or_else(|| raw.to_string()))
    }
}
