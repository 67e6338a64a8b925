// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across adapter traits and the intake pipeline.
//!
//! Wire types (`ComplaintSubmission`, `Complaint`) serialize in camelCase to
//! match what ingress producers and downstream consumers exchange.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Status assigned to every freshly persisted complaint.
pub const STATUS_REGISTERED: &str = "REGISTERED";

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of collaborator behind an adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Queue,
    Storage,
    Moderation,
    Classifier,
    Observability,
}

/// How urgently a complaint needs attention.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

/// Where the complained-about issue is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintLocation {
    /// Six-digit postal PIN code.
    pub pin: String,
    pub district: String,
    pub city: String,
    pub locality: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// A raw complaint as received at ingress.
///
/// Immutable once enqueued. The serialized form is the queue payload, and the
/// exact serialized bytes are the item's identity for removal. Field order in
/// this struct is therefore part of the wire contract: producers should
/// serialize through this type so the output is canonical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintSubmission {
    /// The citizen filing the complaint.
    #[serde(alias = "userId")]
    pub complainant_id: String,
    pub category_id: String,
    /// Free-text subcategory as typed by the citizen.
    pub sub_category: String,
    pub description: String,
    pub urgency: Urgency,
    /// Whether the complaint is visible on public dashboards.
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<ComplaintLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_date: Option<DateTime<Utc>>,
}

/// An entry in the category catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_department: Option<String>,
}

/// A validated, enriched complaint ready for the transactional create.
#[derive(Debug, Clone, PartialEq)]
pub struct NewComplaint {
    pub complainant_id: String,
    pub category_id: String,
    /// Subcategory as submitted.
    pub sub_category: String,
    /// Controlled-vocabulary term from the classifier, when it answered.
    pub standardized_sub_category: Option<String>,
    /// Description after moderation.
    pub description: String,
    pub urgency: Urgency,
    pub is_public: bool,
    pub attachment_url: Option<String>,
    pub assigned_department: Option<String>,
    pub location: Option<ComplaintLocation>,
    pub is_duplicate: bool,
    pub submission_date: DateTime<Utc>,
}

/// A persisted complaint record.
///
/// This is what the processed queue carries and what the manual trigger
/// endpoint returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: String,
    /// Monotonic sequence number assigned by the store.
    pub seq: i64,
    pub complainant_id: String,
    pub category_id: String,
    pub sub_category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standardized_sub_category: Option<String>,
    pub description: String,
    pub urgency: Urgency,
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<ComplaintLocation>,
    pub status: String,
    pub is_duplicate: bool,
    pub submission_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Criteria for the advisory duplicate lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateQuery {
    pub complainant_id: String,
    pub category_id: String,
    pub sub_category: String,
    pub description: String,
    /// Only complaints created at or after this instant count.
    pub since: DateTime<Utc>,
}

/// Result of a moderation scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationVerdict {
    pub has_abuse: bool,
    /// Sanitized replacement text, present when abuse was found.
    #[serde(default)]
    pub clean_text: Option<String>,
}

/// A badge awarded to a complainant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub key: String,
    pub name: String,
    pub awarded_at: DateTime<Utc>,
}

/// Snapshot of the intake and in-flight queue depths. Computed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStatus {
    pub registration_queue_length: u64,
    pub processing_queue_length: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "userId": "00000000-0000-0000-0000-000000000001",
            "categoryId": "11111111-1111-1111-1111-111111111111",
            "subCategory": "Water leakage",
            "description": "There is a water leakage near the park that needs fixing.",
            "urgency": "LOW",
            "attachmentUrl": "https://example.com/image.jpg",
            "assignedDepartment": "WATER_SUPPLY_SANITATION",
            "isPublic": true,
            "location": {
                "pin": "560001",
                "district": "Bangalore",
                "city": "Bangalore",
                "locality": "MG Road",
                "street": "Church Street",
                "latitude": 12.97,
                "longitude": 77.59
            }
        }"#
    }

    #[test]
    fn submission_accepts_user_id_alias() {
        let sub: ComplaintSubmission = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(sub.complainant_id, "00000000-0000-0000-0000-000000000001");
        assert_eq!(sub.urgency, Urgency::Low);
        assert!(sub.is_public);
        assert_eq!(sub.location.as_ref().unwrap().pin, "560001");
        assert!(sub.submission_date.is_none());
    }

    #[test]
    fn submission_serializes_canonically() {
        let sub: ComplaintSubmission = serde_json::from_str(sample_json()).unwrap();
        let first = serde_json::to_string(&sub).unwrap();
        let reparsed: ComplaintSubmission = serde_json::from_str(&first).unwrap();
        let second = serde_json::to_string(&reparsed).unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with(r#"{"complainantId":"#));
    }

    #[test]
    fn unknown_urgency_is_rejected() {
        let json = sample_json().replace("\"LOW\"", "\"WHENEVER\"");
        assert!(serde_json::from_str::<ComplaintSubmission>(&json).is_err());
    }

    #[test]
    fn urgency_display_matches_wire_form() {
        assert_eq!(Urgency::Critical.to_string(), "CRITICAL");
        let parsed: Urgency = "MEDIUM".parse().unwrap();
        assert_eq!(parsed, Urgency::Medium);
    }

    #[test]
    fn moderation_verdict_reads_snake_case() {
        let verdict: ModerationVerdict =
            serde_json::from_str(r#"{"has_abuse": true, "clean_text": "****"}"#).unwrap();
        assert!(verdict.has_abuse);
        assert_eq!(verdict.clean_text.as_deref(), Some("****"));
    }

    #[test]
    fn queue_status_serializes_camel_case() {
        let status = QueueStatus {
            registration_queue_length: 2,
            processing_queue_length: 1,
        };
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(
            json,
            r#"{"registrationQueueLength":2,"processingQueueLength":1}"#
        );
    }
}
