// 🏷️ Category Registry
//
// Category names are case-sensitive and unique. Categories are created on
// demand and never renamed or deleted; expenses point at them by id.

use crate::auth::Session;
use crate::error::{is_constraint_violation, Result, TrackerError};
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Add a category.
///
/// Returns `Ok(None)` without touching the store when `name` is blank,
/// `DuplicateCategory` when the exact name is already registered.
pub fn add_category(conn: &Connection, session: &Session, name: &str) -> Result<Option<i64>> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(None);
    }

    match conn.execute("INSERT INTO categories (name) VALUES (?1)", [name]) {
        Ok(_) => {
            let id = conn.last_insert_rowid();
            info!(category_id = id, name, user_id = session.user_id(), "category added");
            Ok(Some(id))
        }
        Err(e) if is_constraint_violation(&e) => {
            warn!(name, "category already exists");
            Err(TrackerError::DuplicateCategory(name.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// All category names in registration order
pub fn list_categories(conn: &Connection, _session: &Session) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM categories ORDER BY id")?;

    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, _>>()?;

    Ok(names)
}

/// Exact (case-sensitive) lookup by name
pub fn find_category(conn: &Connection, name: &str) -> Result<Option<Category>> {
    let category = conn
        .query_row(
            "SELECT id, name FROM categories WHERE name = ?1",
            [name],
            |row| {
                Ok(Category {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            },
        )
        .optional()?;

    Ok(category)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::tests::session_for;
    use crate::db::open_in_memory;

    #[test]
    fn test_add_and_list() {
        let conn = open_in_memory().unwrap();
        let session = session_for(&conn, "alice");

        add_category(&conn, &session, "Food").unwrap();
        add_category(&conn, &session, "Transport").unwrap();
        add_category(&conn, &session, "Housing").unwrap();

        let names = list_categories(&conn, &session).unwrap();
        assert_eq!(names, vec!["Food", "Transport", "Housing"]);

        // Stable across calls
        assert_eq!(names, list_categories(&conn, &session).unwrap());
    }

    #[test]
    fn test_duplicate_category() {
        let conn = open_in_memory().unwrap();
        let session = session_for(&conn, "alice");

        add_category(&conn, &session, "Food").unwrap();
        let err = add_category(&conn, &session, "Food").unwrap_err();

        assert!(matches!(err, TrackerError::DuplicateCategory(ref n) if n == "Food"));
        assert_eq!(list_categories(&conn, &session).unwrap(), vec!["Food"]);

        println!("✅ Duplicate category test PASSED");
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let conn = open_in_memory().unwrap();
        let session = session_for(&conn, "alice");

        add_category(&conn, &session, "Food").unwrap();
        add_category(&conn, &session, "food").unwrap();

        assert_eq!(list_categories(&conn, &session).unwrap().len(), 2);
        assert!(find_category(&conn, "FOOD").unwrap().is_none());
        assert_eq!(find_category(&conn, "food").unwrap().unwrap().name, "food");
    }

    #[test]
    fn test_blank_name_is_noop() {
        let conn = open_in_memory().unwrap();
        let session = session_for(&conn, "alice");

        assert_eq!(add_category(&conn, &session, "").unwrap(), None);
        assert_eq!(add_category(&conn, &session, "   ").unwrap(), None);
        assert!(list_categories(&conn, &session).unwrap().is_empty());
    }
}
