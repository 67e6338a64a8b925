// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Complaint persistence and the advisory duplicate lookup.

use chrono::Utc;
use plaint_core::types::STATUS_REGISTERED;
use plaint_core::{
    Complaint, ComplaintLocation, DuplicateQuery, NewComplaint, PlaintError, Urgency,
};
use rusqlite::{params, OptionalExtension};

use super::{format_timestamp, parse_timestamp};
use crate::database::{map_tr_err, Database};

const SELECT_COMPLAINT: &str = "SELECT c.id, c.seq, c.complainant_id, c.category_id, c.sub_category,
        c.standardized_sub_category, c.description, c.urgency, c.is_public, c.attachment_url,
        c.assigned_department, c.status, c.is_duplicate, c.submission_date, c.created_at,
        l.pin, l.district, l.city, l.locality, l.street, l.latitude, l.longitude
     FROM complaints c
     LEFT JOIN complaint_locations l ON l.complaint_id = c.id";

fn row_to_complaint(row: &rusqlite::Row<'_>) -> Result<Complaint, rusqlite::Error> {
    let urgency_raw: String = row.get(7)?;
    let urgency: Urgency = urgency_raw.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let submission_date: String = row.get(13)?;
    let created_at: String = row.get(14)?;
    let pin: Option<String> = row.get(15)?;
    let location = match pin {
        Some(pin) => Some(ComplaintLocation {
            pin,
            district: row.get(16)?,
            city: row.get(17)?,
            locality: row.get(18)?,
            street: row.get(19)?,
            latitude: row.get(20)?,
            longitude: row.get(21)?,
        }),
        None => None,
    };

    Ok(Complaint {
        id: row.get(0)?,
        seq: row.get(1)?,
        complainant_id: row.get(2)?,
        category_id: row.get(3)?,
        sub_category: row.get(4)?,
        standardized_sub_category: row.get(5)?,
        description: row.get(6)?,
        urgency,
        is_public: row.get(8)?,
        attachment_url: row.get(9)?,
        assigned_department: row.get(10)?,
        location,
        status: row.get(11)?,
        is_duplicate: row.get(12)?,
        submission_date: parse_timestamp(13, &submission_date)?,
        created_at: parse_timestamp(14, &created_at)?,
    })
}

/// Create a complaint and its location in one transaction.
///
/// Assigns a fresh id, `seq`, and creation time. A category id that does not
/// exist fails with [`PlaintError::ConstraintViolation`] and writes nothing.
pub async fn create_complaint(
    db: &Database,
    complaint: &NewComplaint,
) -> Result<Complaint, PlaintError> {
    let new = complaint.clone();
    let id = uuid::Uuid::new_v4().to_string();
    let created_at = Utc::now();

    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO complaints (
                    id, complainant_id, category_id, sub_category, standardized_sub_category,
                    description, urgency, is_public, attachment_url, assigned_department,
                    status, is_duplicate, submission_date, created_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                params![
                    id,
                    new.complainant_id,
                    new.category_id,
                    new.sub_category,
                    new.standardized_sub_category,
                    new.description,
                    new.urgency.to_string(),
                    new.is_public,
                    new.attachment_url,
                    new.assigned_department,
                    STATUS_REGISTERED,
                    new.is_duplicate,
                    format_timestamp(&new.submission_date),
                    format_timestamp(&created_at),
                ],
            )?;
            let seq = tx.last_insert_rowid();

            if let Some(loc) = &new.location {
                tx.execute(
                    "INSERT INTO complaint_locations
                        (complaint_id, pin, district, city, locality, street, latitude, longitude)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        id,
                        loc.pin,
                        loc.district,
                        loc.city,
                        loc.locality,
                        loc.street,
                        loc.latitude,
                        loc.longitude
                    ],
                )?;
            }
            tx.commit()?;

            // Read back through the same path used by lookups so the
            // returned record matches stored precision.
            let created = conn.query_row(
                &format!("{SELECT_COMPLAINT} WHERE c.seq = ?1"),
                params![seq],
                row_to_complaint,
            )?;
            Ok(created)
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch a complaint by id.
pub async fn get_complaint(db: &Database, id: &str) -> Result<Option<Complaint>, PlaintError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let complaint = conn
                .query_row(
                    &format!("{SELECT_COMPLAINT} WHERE c.id = ?1"),
                    params![id],
                    row_to_complaint,
                )
                .optional()?;
            Ok(complaint)
        })
        .await
        .map_err(map_tr_err)
}

/// Id of the earliest complaint matching `query` inside its time window.
pub async fn find_recent_duplicate(
    db: &Database,
    query: &DuplicateQuery,
) -> Result<Option<String>, PlaintError> {
    let q = query.clone();
    db.connection()
        .call(move |conn| {
            let id = conn
                .query_row(
                    "SELECT id FROM complaints
                     WHERE complainant_id = ?1 AND category_id = ?2
                       AND sub_category = ?3 AND description = ?4
                       AND created_at >= ?5
                     ORDER BY seq ASC LIMIT 1",
                    params![
                        q.complainant_id,
                        q.category_id,
                        q.sub_category,
                        q.description,
                        format_timestamp(&q.since)
                    ],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(id)
        })
        .await
        .map_err(map_tr_err)
}

/// Number of stored complaints for a complainant, excluding duplicates.
pub async fn count_original_complaints(
    db: &Database,
    complainant_id: &str,
) -> Result<u64, PlaintError> {
    let complainant_id = complainant_id.to_string();
    db.connection()
        .call(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM complaints WHERE complainant_id = ?1 AND is_duplicate = 0",
                params![complainant_id],
                |row| row.get(0),
            )?;
            Ok(count.max(0) as u64)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::categories::create_category;
    use chrono::Duration;
    use tempfile::tempdir;

    async fn setup() -> (Database, String, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("c.db").to_str().unwrap())
            .await
            .unwrap();
        let category = create_category(&db, "Water", None).await.unwrap();
        (db, category.id, dir)
    }

    fn new_complaint(category_id: &str) -> NewComplaint {
        NewComplaint {
            complainant_id: "user-1".to_string(),
            category_id: category_id.to_string(),
            sub_category: "Water leakage".to_string(),
            standardized_sub_category: Some("PIPE_LEAK".to_string()),
            description: "Water leaking near the park gate".to_string(),
            urgency: Urgency::High,
            is_public: true,
            attachment_url: None,
            assigned_department: Some("WATER_SUPPLY_SANITATION".to_string()),
            location: Some(ComplaintLocation {
                pin: "560001".to_string(),
                district: "Bangalore Urban".to_string(),
                city: "Bangalore".to_string(),
                locality: "MG Road".to_string(),
                street: None,
                latitude: Some(12.97),
                longitude: Some(77.59),
            }),
            is_duplicate: false,
            submission_date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_assigns_identity_and_status() {
        let (db, category_id, _dir) = setup().await;
        let first = create_complaint(&db, &new_complaint(&category_id)).await.unwrap();
        let second = create_complaint(&db, &new_complaint(&category_id)).await.unwrap();

        assert_ne!(first.id, second.id);
        assert!(second.seq > first.seq);
        assert_eq!(first.status, STATUS_REGISTERED);
        assert_eq!(first.urgency, Urgency::High);
        assert_eq!(first.location.as_ref().unwrap().pin, "560001");
        assert_eq!(first.standardized_sub_category.as_deref(), Some("PIPE_LEAK"));

        let fetched = get_complaint(&db, &first.id).await.unwrap().unwrap();
        assert_eq!(fetched, first);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn unknown_category_is_a_constraint_violation_and_writes_nothing() {
        let (db, _category_id, _dir) = setup().await;
        let err = create_complaint(&db, &new_complaint("no-such-category"))
            .await
            .unwrap_err();
        assert!(matches!(err, PlaintError::ConstraintViolation { .. }), "got {err:?}");
        assert_eq!(count_original_complaints(&db, "user-1").await.unwrap(), 0);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn complaint_without_location() {
        let (db, category_id, _dir) = setup().await;
        let mut new = new_complaint(&category_id);
        new.location = None;
        let created = create_complaint(&db, &new).await.unwrap();
        assert!(created.location.is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_lookup_respects_fields_and_window() {
        let (db, category_id, _dir) = setup().await;
        let created = create_complaint(&db, &new_complaint(&category_id)).await.unwrap();

        let mut query = DuplicateQuery {
            complainant_id: "user-1".to_string(),
            category_id: category_id.clone(),
            sub_category: "Water leakage".to_string(),
            description: "Water leaking near the park gate".to_string(),
            since: Utc::now() - Duration::hours(24),
        };
        assert_eq!(
            find_recent_duplicate(&db, &query).await.unwrap().as_deref(),
            Some(created.id.as_str())
        );

        query.since = Utc::now() + Duration::hours(1);
        assert!(find_recent_duplicate(&db, &query).await.unwrap().is_none());

        query.since = Utc::now() - Duration::hours(24);
        query.complainant_id = "user-2".to_string();
        assert!(find_recent_duplicate(&db, &query).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn duplicates_are_not_counted() {
        let (db, category_id, _dir) = setup().await;
        create_complaint(&db, &new_complaint(&category_id)).await.unwrap();
        let mut dup = new_complaint(&category_id);
        dup.is_duplicate = true;
        create_complaint(&db, &dup).await.unwrap();
        assert_eq!(count_original_complaints(&db, "user-1").await.unwrap(), 1);
        db.close().await.unwrap();
    }
}
