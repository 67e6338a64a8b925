// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Category catalog queries.

use plaint_core::{Category, PlaintError};
use rusqlite::{params, OptionalExtension};

use crate::database::{map_tr_err, Database};

fn row_to_category(row: &rusqlite::Row<'_>) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        assigned_department: row.get(2)?,
    })
}

/// Insert a category with a generated id.
///
/// Fails with a storage error when the name is already taken.
pub async fn create_category(
    db: &Database,
    name: &str,
    assigned_department: Option<&str>,
) -> Result<Category, PlaintError> {
    let category = Category {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        assigned_department: assigned_department.map(str::to_string),
    };
    let row = category.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO categories (id, name, assigned_department) VALUES (?1, ?2, ?3)",
                params![row.id, row.name, row.assigned_department],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
    Ok(category)
}

/// Look up a category by id.
pub async fn get_category(db: &Database, id: &str) -> Result<Option<Category>, PlaintError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let category = conn
                .query_row(
                    "SELECT id, name, assigned_department FROM categories WHERE id = ?1",
                    params![id],
                    row_to_category,
                )
                .optional()?;
            Ok(category)
        })
        .await
        .map_err(map_tr_err)
}

/// All categories, ordered by name.
pub async fn list_categories(db: &Database) -> Result<Vec<Category>, PlaintError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, name, assigned_department FROM categories ORDER BY name")?;
            let categories = stmt
                .query_map([], row_to_category)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(categories)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn create_then_lookup() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("cat.db").to_str().unwrap())
            .await
            .unwrap();

        let water = create_category(&db, "Water Supply", Some("WATER_SUPPLY_SANITATION"))
            .await
            .unwrap();
        create_category(&db, "Roads", None).await.unwrap();

        let found = get_category(&db, &water.id).await.unwrap().unwrap();
        assert_eq!(found, water);
        assert!(get_category(&db, "nope").await.unwrap().is_none());

        let names: Vec<String> = list_categories(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Roads", "Water Supply"]);

        assert!(create_category(&db, "Roads", None).await.is_err());
        db.close().await.unwrap();
    }
}
