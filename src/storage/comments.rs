//! Comment operations on the content store

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::{format_ts, parse_ts, SqliteStore, StorageError, StorageResult};
use crate::models::{Category, Comment, CommentPatch, NewComment};
use crate::storage::listing::{CommentQuery, Page, Paged};

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        blog_id: row.get(1)?,
        comment: row.get(2)?,
        is_active: row.get(3)?,
        date_created: parse_ts(&row.get::<_, String>(4)?),
        last_modified: parse_ts(&row.get::<_, String>(5)?),
    })
}

const COMMENT_COLUMNS: &str = "id, blog_id, comment, is_active, date_created, last_modified";

fn get_comment_inner(conn: &Connection, id: i64) -> rusqlite::Result<Option<Comment>> {
    conn.query_row(
        &format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?1"),
        params![id],
        comment_from_row,
    )
    .optional()
}

fn blog_exists(conn: &Connection, blog_id: i64) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM blogs WHERE id = ?1)",
        params![blog_id],
        |row| row.get(0),
    )
}

fn replace_comment_categories(
    conn: &Connection,
    comment_id: i64,
    category_ids: &[i64],
) -> StorageResult<()> {
    conn.execute(
        "DELETE FROM comment_categories WHERE comment_id = ?1",
        params![comment_id],
    )?;

    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO comment_categories (comment_id, category_id) VALUES (?1, ?2)",
    )?;
    for &category_id in category_ids {
        stmt.execute(params![comment_id, category_id]).map_err(|e| {
            if matches!(e.sqlite_error_code(), Some(rusqlite::ErrorCode::ConstraintViolation)) {
                StorageError::not_found("category", category_id)
            } else {
                StorageError::Sqlite(e)
            }
        })?;
    }
    Ok(())
}

impl SqliteStore {
    /// Create a comment under a blog post. Fails with NotFound when the blog
    /// does not exist.
    pub fn create_comment(&self, blog_id: i64, new: &NewComment) -> StorageResult<Comment> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;

        if !blog_exists(&tx, blog_id)? {
            return Err(StorageError::not_found("blog", blog_id));
        }

        let now = format_ts(chrono::Utc::now());
        let is_active = new.is_active.unwrap_or(true);

        tx.execute(
            "INSERT INTO comments (blog_id, comment, is_active, date_created, last_modified)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![blog_id, new.comment, is_active, now, now],
        )?;
        let id = tx.last_insert_rowid();

        if !new.category_ids.is_empty() {
            replace_comment_categories(&tx, id, &new.category_ids)?;
        }

        let comment =
            get_comment_inner(&tx, id)?.ok_or_else(|| StorageError::not_found("comment", id))?;
        tx.commit()?;

        Ok(comment)
    }

    /// Fetch a comment by id
    pub fn get_comment(&self, id: i64) -> StorageResult<Option<Comment>> {
        let conn = self.lock();
        Ok(get_comment_inner(&conn, id)?)
    }

    /// Apply a partial update; `last_modified` is refreshed. Returns None
    /// when the comment does not exist.
    pub fn update_comment(&self, id: i64, patch: &CommentPatch) -> StorageResult<Option<Comment>> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;

        let Some(existing) = get_comment_inner(&tx, id)? else {
            return Ok(None);
        };

        let text = patch
            .comment
            .clone()
            .unwrap_or_else(|| existing.comment.clone());
        let is_active = patch.is_active.unwrap_or(existing.is_active);
        let now = format_ts(chrono::Utc::now());

        tx.execute(
            "UPDATE comments SET comment = ?1, is_active = ?2, last_modified = ?3 WHERE id = ?4",
            params![text, is_active, now, id],
        )?;

        if let Some(category_ids) = &patch.category_ids {
            replace_comment_categories(&tx, id, category_ids)?;
        }

        let updated =
            get_comment_inner(&tx, id)?.ok_or_else(|| StorageError::not_found("comment", id))?;
        tx.commit()?;

        Ok(Some(updated))
    }

    /// Delete a comment
    pub fn delete_comment(&self, id: i64) -> StorageResult<bool> {
        let conn = self.lock();
        let changed = conn.execute("DELETE FROM comments WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    /// List comments honoring filters, search, ordering, and pagination
    pub fn list_comments(
        &self,
        query: &CommentQuery,
        page: Page,
    ) -> StorageResult<Paged<Comment>> {
        let conn = self.lock();
        let (where_sql, mut params) = query.where_clause();

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM comments {where_sql}"),
            params_from_iter(params.iter()),
            |row| row.get(0),
        )?;

        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments {where_sql} {order_sql} LIMIT ? OFFSET ?",
            order_sql = query.order_clause(),
        );

        params.push(Value::Integer(page.limit()));
        params.push(Value::Integer(page.offset()));

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(params.iter()), comment_from_row)?;
        let items: Vec<Comment> = rows.collect::<rusqlite::Result<_>>()?;

        Ok(Paged::new(items, page, total as usize))
    }

    /// Bulk activate / deactivate. Returns the number of rows changed.
    pub fn set_active_many(&self, ids: &[i64], is_active: bool) -> StorageResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let conn = self.lock();
        let placeholders: String = ids.iter().map(|_| "?").collect::<Vec<_>>().join(",");
        let sql = format!(
            "UPDATE comments SET is_active = ?, last_modified = ? WHERE id IN ({placeholders})"
        );

        let mut params: Vec<Value> = Vec::with_capacity(ids.len() + 2);
        params.push(Value::Integer(i64::from(is_active)));
        params.push(Value::Text(format_ts(chrono::Utc::now())));
        params.extend(ids.iter().map(|&id| Value::Integer(id)));

        let changed = conn.execute(&sql, params_from_iter(params.iter()))?;
        Ok(changed)
    }

    /// Replace the categories attached to a comment
    pub fn set_comment_categories(
        &self,
        comment_id: i64,
        category_ids: &[i64],
    ) -> StorageResult<()> {
        let conn = self.lock();
        if get_comment_inner(&conn, comment_id)?.is_none() {
            return Err(StorageError::not_found("comment", comment_id));
        }
        replace_comment_categories(&conn, comment_id, category_ids)
    }

    /// Categories attached to a comment
    pub fn comment_categories(&self, comment_id: i64) -> StorageResult<Vec<Category>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT c.id, c.name, c.is_active FROM categories c
             JOIN comment_categories cc ON cc.category_id = c.id
             WHERE cc.comment_id = ?1
             ORDER BY c.name",
        )?;
        let rows = stmt.query_map(params![comment_id], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
                is_active: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    /// Insert many comments in one transaction (seeding). Each item is a
    /// (blog id, comment text) pair. Returns the number of rows created.
    pub fn insert_comments(&self, items: &[(i64, String)]) -> StorageResult<usize> {
        if items.is_empty() {
            return Ok(0);
        }

        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let now = format_ts(chrono::Utc::now());

        {
            let mut stmt = tx.prepare(
                "INSERT INTO comments (blog_id, comment, is_active, date_created, last_modified)
                 VALUES (?1, ?2, 1, ?3, ?4)",
            )?;
            for (blog_id, text) in items {
                stmt.execute(params![blog_id, text, now, now])?;
            }
        }

        tx.commit()?;
        Ok(items.len())
    }
}
