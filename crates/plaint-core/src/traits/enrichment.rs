// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Traits for the best-effort enrichment collaborators.

use async_trait::async_trait;

use crate::error::PlaintError;
use crate::traits::adapter::PluginAdapter;
use crate::types::ModerationVerdict;

/// Scans free text for abusive content.
#[async_trait]
pub trait Moderator: PluginAdapter {
    /// Returns whether `text` contains abuse and, if so, a sanitized version.
    async fn moderate(&self, text: &str) -> Result<ModerationVerdict, PlaintError>;
}

/// Maps free-text subcategories onto a controlled vocabulary.
#[async_trait]
pub trait SubcategoryClassifier: PluginAdapter {
    /// Returns the standardized term for `raw`.
    ///
    /// `description` is passed as extra context for the classifier.
    async fn standardize_subcategory(
        &self,
        raw: &str,
        description: &str,
    ) -> Result<String, PlaintError>;
}
