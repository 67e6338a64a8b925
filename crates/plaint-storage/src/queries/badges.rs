// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Milestone badges awarded to complainants.

use chrono::Utc;
use plaint_core::{Badge, PlaintError};
use rusqlite::params;

use super::{format_timestamp, parse_timestamp};
use crate::database::{map_tr_err, Database};

/// A badge earned on reaching a number of original (non-duplicate) complaints.
#[derive(Debug, Clone, Copy)]
pub struct Milestone {
    pub threshold: u64,
    pub key: &'static str,
    pub name: &'static str,
}

/// Complaint-count milestones, lowest first.
pub const MILESTONES: &[Milestone] = &[
    Milestone {
        threshold: 1,
        key: "first_complaint",
        name: "First Voice",
    },
    Milestone {
        threshold: 5,
        key: "active_citizen",
        name: "Active Citizen",
    },
    Milestone {
        threshold: 25,
        key: "civic_champion",
        name: "Civic Champion",
    },
];

/// Award every milestone reached by `complaint_count` that the complainant
/// does not hold yet. Returns only the newly awarded badges.
pub async fn award_milestones(
    db: &Database,
    complainant_id: &str,
    complaint_count: u64,
) -> Result<Vec<Badge>, PlaintError> {
    let complainant_id = complainant_id.to_string();
    let awarded_at = Utc::now();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let mut awarded = Vec::new();
            for milestone in MILESTONES.iter().filter(|m| complaint_count >= m.threshold) {
                let inserted = tx.execute(
                    "INSERT OR IGNORE INTO complainant_badges
                        (complainant_id, badge_key, name, awarded_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        complainant_id,
                        milestone.key,
                        milestone.name,
                        format_timestamp(&awarded_at)
                    ],
                )?;
                if inserted > 0 {
                    awarded.push(Badge {
                        key: milestone.key.to_string(),
                        name: milestone.name.to_string(),
                        awarded_at,
                    });
                }
            }
            tx.commit()?;
            Ok(awarded)
        })
        .await
        .map_err(map_tr_err)
}

/// Badges held by a complainant, oldest first.
pub async fn list_badges(db: &Database, complainant_id: &str) -> Result<Vec<Badge>, PlaintError> {
    let complainant_id = complainant_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT badge_key, name, awarded_at FROM complainant_badges
                 WHERE complainant_id = ?1 ORDER BY awarded_at, badge_key",
            )?;
            let badges = stmt
                .query_map(params![complainant_id], |row| {
                    let awarded_at: String = row.get(2)?;
                    Ok(Badge {
                        key: row.get(0)?,
                        name: row.get(1)?,
                        awarded_at: parse_timestamp(2, &awarded_at)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(badges)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn milestones_are_awarded_once() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("b.db").to_str().unwrap())
            .await
            .unwrap();

        assert!(award_milestones(&db, "u", 0).await.unwrap().is_empty());

        let first = award_milestones(&db, "u", 1).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].key, "first_complaint");

        assert!(award_milestones(&db, "u", 2).await.unwrap().is_empty());

        let jump = award_milestones(&db, "u", 30).await.unwrap();
        let keys: Vec<_> = jump.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["active_citizen", "civic_champion"]);

        assert_eq!(list_badges(&db, "u").await.unwrap().len(), 3);
        assert!(list_badges(&db, "someone-else").await.unwrap().is_empty());
        db.close().await.unwrap();
    }
}
