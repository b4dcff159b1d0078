//! Category operations on the content store
//!
//! Categories are flat reference data shared by blogs and comments.

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::{SqliteStore, StorageResult};
use crate::models::{Category, CategoryPatch, NewCategory};

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        is_active: row.get(2)?,
    })
}

fn get_category_inner(conn: &Connection, id: i64) -> rusqlite::Result<Option<Category>> {
    conn.query_row(
        "SELECT id, name, is_active FROM categories WHERE id = ?1",
        params![id],
        category_from_row,
    )
    .optional()
}

impl SqliteStore {
    /// Create a category; defaults to active
    pub fn create_category(&self, new: &NewCategory) -> StorageResult<Category> {
        let conn = self.lock();
        let is_active = new.is_active.unwrap_or(true);
        conn.execute(
            "INSERT INTO categories (name, is_active) VALUES (?1, ?2)",
            params![new.name, is_active],
        )?;
        let id = conn.last_insert_rowid();
        Ok(Category {
            id,
            name: new.name.clone(),
            is_active,
        })
    }

    /// Fetch a category by id
    pub fn get_category(&self, id: i64) -> StorageResult<Option<Category>> {
        let conn = self.lock();
        Ok(get_category_inner(&conn, id)?)
    }

    /// Fetch a category by exact name, creating it when absent (CSV import
    /// resolves names this way)
    pub fn get_or_create_category(&self, name: &str) -> StorageResult<Category> {
        let conn = self.lock();
        let existing = conn
            .query_row(
                "SELECT id, name, is_active FROM categories WHERE name = ?1",
                params![name],
                category_from_row,
            )
            .optional()?;

        if let Some(category) = existing {
            return Ok(category);
        }

        conn.execute(
            "INSERT INTO categories (name, is_active) VALUES (?1, 1)",
            params![name],
        )?;
        Ok(Category {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            is_active: true,
        })
    }

    /// Apply a partial update. Returns None when the category does not exist.
    pub fn update_category(
        &self,
        id: i64,
        patch: &CategoryPatch,
    ) -> StorageResult<Option<Category>> {
        let conn = self.lock();
        let Some(existing) = get_category_inner(&conn, id)? else {
            return Ok(None);
        };

        let name = patch.name.clone().unwrap_or_else(|| existing.name.clone());
        let is_active = patch.is_active.unwrap_or(existing.is_active);

        conn.execute(
            "UPDATE categories SET name = ?1, is_active = ?2 WHERE id = ?3",
            params![name, is_active, id],
        )?;

        Ok(Some(Category { id, name, is_active }))
    }

    /// Delete a category; join rows cascade, blogs and comments survive
    pub fn delete_category(&self, id: i64) -> StorageResult<bool> {
        let conn = self.lock();
        let changed = conn.execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    /// List categories by name; inactive ones only when asked for
    pub fn list_categories(&self, include_inactive: bool) -> StorageResult<Vec<Category>> {
        let conn = self.lock();
        let sql = if include_inactive {
            "SELECT id, name, is_active FROM categories ORDER BY name"
        } else {
            "SELECT id, name, is_active FROM categories WHERE is_active = 1 ORDER BY name"
        };
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map([], category_from_row)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    /// Bulk activate / deactivate categories. Returns the number of rows
    /// changed.
    pub fn set_category_active_many(&self, ids: &[i64], is_active: bool) -> StorageResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let conn = self.lock();
        let placeholders: String = ids.iter().map(|_| "?").collect::<Vec<_>>().join(",");
        let sql =
            format!("UPDATE categories SET is_active = ? WHERE id IN ({placeholders})");

        let mut params: Vec<Value> = Vec::with_capacity(ids.len() + 1);
        params.push(Value::Integer(i64::from(is_active)));
        params.extend(ids.iter().map(|&id| Value::Integer(id)));

        let changed = conn.execute(&sql, params_from_iter(params.iter()))?;
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_list_categories() {
        let store = SqliteStore::in_memory().unwrap();
        for name in ["Databases", "Security", "Web Development"] {
            store
                .create_category(&NewCategory {
                    name: name.to_string(),
                    is_active: None,
                })
                .unwrap();
        }

        let all = store.list_categories(true).unwrap();
        assert_eq!(all.len(), 3);
        // Ordered by name
        assert_eq!(all[0].name, "Databases");
        assert_eq!(all[2].name, "Web Development");
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let store = SqliteStore::in_memory().unwrap();
        let first = store.get_or_create_category("Data Science").unwrap();
        let second = store.get_or_create_category("Data Science").unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(store.list_categories(true).unwrap().len(), 1);
    }

    #[test]
    fn test_deactivate_hides_from_active_list() {
        let store = SqliteStore::in_memory().unwrap();
        let category = store
            .create_category(&NewCategory {
                name: "Archived".to_string(),
                is_active: None,
            })
            .unwrap();

        let changed = store
            .set_category_active_many(&[category.id], false)
            .unwrap();
        assert_eq!(changed, 1);

        assert!(store.list_categories(false).unwrap().is_empty());
        assert_eq!(store.list_categories(true).unwrap().len(), 1);
    }

    #[test]
    fn test_update_category() {
        let store = SqliteStore::in_memory().unwrap();
        let category = store
            .create_category(&NewCategory {
                name: "Misc".to_string(),
                is_active: None,
            })
            .unwrap();

        let updated = store
            .update_category(
                category.id,
                &CategoryPatch {
                    name: Some("General".to_string()),
                    is_active: None,
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "General");
        assert!(updated.is_active);

        assert!(store
            .update_category(999, &CategoryPatch::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_delete_category_detaches_but_keeps_content() {
        let store = SqliteStore::in_memory().unwrap();
        let blog = store
            .create_blog(&crate::models::NewBlog {
                title: "Tagged post".to_string(),
                ..Default::default()
            })
            .unwrap();
        let category = store
            .create_category(&NewCategory {
                name: "Ephemeral".to_string(),
                is_active: None,
            })
            .unwrap();
        store.set_blog_categories(blog.id, &[category.id]).unwrap();

        assert!(store.delete_category(category.id).unwrap());
        assert!(store.get_blog(blog.id).unwrap().is_some());
        assert!(store.blog_categories(blog.id).unwrap().is_empty());
    }
}
