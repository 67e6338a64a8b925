// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sample submissions.

use plaint_core::ComplaintSubmission;
use serde_json::{Value, json};

/// Category seeded into every mock harness.
pub const CATEGORY_ID: &str = "11111111-1111-1111-1111-111111111111";
pub const COMPLAINANT_ID: &str = "00000000-0000-0000-0000-000000000001";

/// A submission that passes every validation step.
pub fn valid_submission_json(category_id: &str) -> Value {
    json!({
        "complainantId": COMPLAINANT_ID,
        "categoryId": category_id,
        "subCategory": "Water leakage",
        "description": "There is a water leakage near the park that needs fixing.",
        "urgency": "LOW",
        "isPublic": true,
        "attachmentUrl": "https://example.com/image.jpg",
        "location": {
            "pin": "560001",
            "district": "Bangalore",
            "city": "Bangalore",
            "locality": "MG Road",
            "street": "Church Street",
            "latitude": 12.97,
            "longitude": 77.59
        },
        "submissionDate": "2026-03-01T10:00:00Z"
    })
}

pub fn valid_submission(category_id: &str) -> ComplaintSubmission {
    serde_json::from_value(valid_submission_json(category_id))
        .expect("fixture submission must deserialize")
}

/// Canonical payload for [`valid_submission`].
pub fn valid_payload(category_id: &str) -> String {
    serde_json::to_string(&valid_submission(category_id)).expect("fixture must serialize")
}
