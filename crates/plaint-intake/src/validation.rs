// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsing and schema checks for queued submissions.
//!
//! A payload goes through two gates here. [`parse_payload`] only asks whether
//! the bytes are JSON at all; anything that is not is a parse failure and gets
//! another pass through the queue. [`validate_submission`] then decides whether
//! the JSON describes an acceptable complaint. Failing that gate is terminal.

use plaint_config::model::ProcessorConfig;
use plaint_core::{ComplaintLocation, ComplaintSubmission};

use crate::error::IntakeError;

/// Field constraints applied to every submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationRules {
    /// Minimum description length in characters, after trimming.
    pub min_description_len: usize,
    /// Maximum description length in characters, after trimming.
    pub max_description_len: usize,
}

impl ValidationRules {
    pub fn from_config(config: &ProcessorConfig) -> Self {
        Self {
            min_description_len: config.min_description_len,
            max_description_len: config.max_description_len,
        }
    }
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self::from_config(&ProcessorConfig::default())
    }
}

/// Parse raw payload bytes into a JSON value.
///
/// Bytes that are not valid UTF-8 fail here like any other malformed JSON.
pub fn parse_payload(raw: &[u8]) -> Result<serde_json::Value, IntakeError> {
    serde_json::from_slice(raw).map_err(IntakeError::Parse)
}

/// Deserialize a parsed payload into a submission and check field constraints.
pub fn validate_submission(
    value: serde_json::Value,
    rules: &ValidationRules,
) -> Result<ComplaintSubmission, IntakeError> {
    let submission: ComplaintSubmission =
        serde_json::from_value(value).map_err(|e| IntakeError::SchemaInvalid(e.to_string()))?;

    require_non_empty("complainantId", &submission.complainant_id)?;
    require_non_empty("categoryId", &submission.category_id)?;
    require_non_empty("subCategory", &submission.sub_category)?;

    let len = submission.description.trim().chars().count();
    if len < rules.min_description_len {
        return Err(IntakeError::SchemaInvalid(format!(
            "description must be at least {} characters, got {len}",
            rules.min_description_len
        )));
    }
    if len > rules.max_description_len {
        return Err(IntakeError::SchemaInvalid(format!(
            "description must be at most {} characters, got {len}",
            rules.max_description_len
        )));
    }

    if let Some(url) = &submission.attachment_url
        && !is_http_url(url)
    {
        return Err(IntakeError::SchemaInvalid(format!(
            "attachmentUrl `{url}` is not an http(s) URL"
        )));
    }

    if let Some(location) = &submission.location {
        validate_location(location)?;
    }

    Ok(submission)
}

fn validate_location(location: &ComplaintLocation) -> Result<(), IntakeError> {
    if location.pin.len() != 6 || !location.pin.bytes().all(|b| b.is_ascii_digit()) {
        return Err(IntakeError::SchemaInvalid(format!(
            "location.pin `{}` must be exactly 6 digits",
            location.pin
        )));
    }
    require_non_empty("location.district", &location.district)?;
    require_non_empty("location.city", &location.city)?;
    require_non_empty("location.locality", &location.locality)?;

    if let Some(lat) = location.latitude
        && !(-90.0..=90.0).contains(&lat)
    {
        return Err(IntakeError::SchemaInvalid(format!(
            "location.latitude {lat} is out of range"
        )));
    }
    if let Some(lon) = location.longitude
        && !(-180.0..=180.0).contains(&lon)
    {
        return Err(IntakeError::SchemaInvalid(format!(
            "location.longitude {lon} is out of range"
        )));
    }
    Ok(())
}

fn require_non_empty(field: &str, value: &str) -> Result<(), IntakeError> {
    if value.trim().is_empty() {
        return Err(IntakeError::SchemaInvalid(format!("{field} must not be empty")));
    }
    Ok(())
}

fn is_http_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn valid() -> serde_json::Value {
        json!({
            "userId": "u-1",
            "categoryId": "c-1",
            "subCategory": "Water leakage",
            "description": "Water has been leaking near the park gate for days.",
            "urgency": "HIGH",
            "isPublic": true,
            "location": {
                "pin": "560001",
                "district": "Bangalore",
                "city": "Bangalore",
                "locality": "MG Road",
                "latitude": 12.97,
                "longitude": 77.59
            }
        })
    }

    fn rules() -> ValidationRules {
        ValidationRules {
            min_description_len: 10,
            max_description_len: 200,
        }
    }

    fn assert_schema_invalid(value: serde_json::Value) {
        match validate_submission(value, &rules()) {
            Err(IntakeError::SchemaInvalid(_)) => {}
            other => panic!("expected SchemaInvalid, got {other:?}"),
        }
    }

    #[test]
    fn accepts_well_formed_submission() {
        let sub = validate_submission(valid(), &rules()).unwrap();
        assert_eq!(sub.complainant_id, "u-1");
        assert_eq!(sub.location.unwrap().pin, "560001");
    }

    #[test]
    fn location_is_optional() {
        let mut value = valid();
        value.as_object_mut().unwrap().remove("location");
        assert!(validate_submission(value, &rules()).is_ok());
    }

    #[test]
    fn garbage_bytes_are_parse_errors() {
        assert!(matches!(
            parse_payload(b"{not json"),
            Err(IntakeError::Parse(_))
        ));
    }

    #[test]
    fn non_utf8_bytes_are_parse_errors() {
        assert!(matches!(
            parse_payload(&[0xff, 0xfe, 0x00]),
            Err(IntakeError::Parse(_))
        ));
        assert!(matches!(
            parse_payload(b"{\"description\": \"\xc3\x28\"}"),
            Err(IntakeError::Parse(_))
        ));
    }

    #[test]
    fn json_of_wrong_shape_is_schema_invalid() {
        let value = parse_payload(b"[1, 2, 3]").unwrap();
        assert_schema_invalid(value);
    }

    #[test]
    fn short_description_is_rejected() {
        let mut value = valid();
        value["description"] = json!("   too short   ");
        assert_schema_invalid(value);
    }

    #[test]
    fn long_description_is_rejected() {
        let mut value = valid();
        value["description"] = json!("x".repeat(201));
        assert_schema_invalid(value);
    }

    #[test]
    fn description_length_counts_characters() {
        let mut value = valid();
        // Ten multi-byte characters.
        value["description"] = json!("ಕಸ".repeat(5));
        assert!(validate_submission(value, &rules()).is_ok());
    }

    #[test]
    fn unknown_urgency_is_rejected() {
        let mut value = valid();
        value["urgency"] = json!("SOMEDAY");
        assert_schema_invalid(value);
    }

    #[test]
    fn missing_category_is_rejected() {
        let mut value = valid();
        value.as_object_mut().unwrap().remove("categoryId");
        assert_schema_invalid(value);
    }

    #[test]
    fn blank_sub_category_is_rejected() {
        let mut value = valid();
        value["subCategory"] = json!("  ");
        assert_schema_invalid(value);
    }

    #[test]
    fn malformed_pin_is_rejected() {
        for pin in ["56001", "5600011", "56000a", ""] {
            let mut value = valid();
            value["location"]["pin"] = json!(pin);
            assert_schema_invalid(value);
        }
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let mut value = valid();
        value["location"]["latitude"] = json!(91.0);
        assert_schema_invalid(value);

        let mut value = valid();
        value["location"]["longitude"] = json!(-180.5);
        assert_schema_invalid(value);
    }

    #[test]
    fn attachment_must_be_http() {
        let mut value = valid();
        value["attachmentUrl"] = json!("ftp://example.com/a.jpg");
        assert_schema_invalid(value);

        let mut value = valid();
        value["attachmentUrl"] = json!("https://example.com/a.jpg");
        assert!(validate_submission(value, &rules()).is_ok());
    }

    proptest! {
        #[test]
        fn description_bounds_hold(len in 0usize..260) {
            let mut value = valid();
            value["description"] = json!("a".repeat(len));
            let result = validate_submission(value, &rules());
            let in_bounds = (10..=200).contains(&len);
            prop_assert_eq!(result.is_ok(), in_bounds);
        }

        #[test]
        fn six_digit_pins_are_accepted(pin in "[0-9]{6}") {
            let mut value = valid();
            value["location"]["pin"] = json!(pin);
            prop_assert!(validate_submission(value, &rules()).is_ok());
        }

        #[test]
        fn arbitrary_text_never_panics(raw in ".{0,64}") {
            if let Ok(value) = parse_payload(raw.as_bytes()) {
                let _ = validate_submission(value, &rules());
            }
        }
    }
}
