//! Blog operations on the content store

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::{format_ts, parse_ts, SqliteStore, StorageError, StorageResult};
use crate::models::{slugify, Blog, BlogDetail, BlogPatch, BlogSummary, Category, NewBlog};
use crate::storage::listing::{BlogQuery, Page, Paged};

fn blog_from_row(row: &Row<'_>) -> rusqlite::Result<Blog> {
    Ok(Blog {
        id: row.get(0)?,
        slug: row.get(1)?,
        title: row.get(2)?,
        body: row.get(3)?,
        date_created: parse_ts(&row.get::<_, String>(4)?),
        last_modified: parse_ts(&row.get::<_, String>(5)?),
        is_draft: row.get(6)?,
    })
}

const BLOG_COLUMNS: &str = "id, slug, title, body, date_created, last_modified, is_draft";

fn get_blog_inner(conn: &Connection, id: i64) -> rusqlite::Result<Option<Blog>> {
    conn.query_row(
        &format!("SELECT {BLOG_COLUMNS} FROM blogs WHERE id = ?1"),
        params![id],
        blog_from_row,
    )
    .optional()
}

fn categories_of_blog(conn: &Connection, blog_id: i64) -> rusqlite::Result<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.name, c.is_active FROM categories c
         JOIN blog_categories bc ON bc.category_id = c.id
         WHERE bc.blog_id = ?1
         ORDER BY c.name",
    )?;
    let rows = stmt.query_map(params![blog_id], |row| {
        Ok(Category {
            id: row.get(0)?,
            name: row.get(1)?,
            is_active: row.get(2)?,
        })
    })?;
    rows.collect()
}

fn comment_count_of_blog(conn: &Connection, blog_id: i64) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM comments WHERE blog_id = ?1",
        params![blog_id],
        |row| row.get(0),
    )
}

/// Replace the m2m rows for a blog. Inserting an unknown category surfaces as
/// a NotFound for that id rather than a bare constraint violation.
fn replace_blog_categories(
    conn: &Connection,
    blog_id: i64,
    category_ids: &[i64],
) -> StorageResult<()> {
    conn.execute(
        "DELETE FROM blog_categories WHERE blog_id = ?1",
        params![blog_id],
    )?;

    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO blog_categories (blog_id, category_id) VALUES (?1, ?2)",
    )?;
    for &category_id in category_ids {
        stmt.execute(params![blog_id, category_id]).map_err(|e| {
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
    /// Create a blog post. The slug is derived from the title; new posts
    /// default to draft.
    pub fn create_blog(&self, new: &NewBlog) -> StorageResult<Blog> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;

        let now = format_ts(chrono::Utc::now());
        let slug = slugify(&new.title);
        let is_draft = new.is_draft.unwrap_or(true);

        tx.execute(
            "INSERT INTO blogs (slug, title, body, date_created, last_modified, is_draft)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![slug, new.title, new.body, now, now, is_draft],
        )?;
        let id = tx.last_insert_rowid();

        if !new.category_ids.is_empty() {
            replace_blog_categories(&tx, id, &new.category_ids)?;
        }

        let blog = get_blog_inner(&tx, id)?.ok_or_else(|| StorageError::not_found("blog", id))?;
        tx.commit()?;

        tracing::debug!(id, slug = %blog.slug, "blog created");
        Ok(blog)
    }

    /// Fetch a blog post by id
    pub fn get_blog(&self, id: i64) -> StorageResult<Option<Blog>> {
        let conn = self.lock();
        Ok(get_blog_inner(&conn, id)?)
    }

    /// Fetch a blog post with its categories and comment count
    pub fn get_blog_detail(&self, id: i64) -> StorageResult<Option<BlogDetail>> {
        let conn = self.lock();
        let Some(blog) = get_blog_inner(&conn, id)? else {
            return Ok(None);
        };
        let categories = categories_of_blog(&conn, id)?;
        let comment_count = comment_count_of_blog(&conn, id)?;
        Ok(Some(BlogDetail {
            blog,
            categories,
            comment_count,
        }))
    }

    /// Apply a partial update. The slug is regenerated when the title changes
    /// (or the stored slug is empty); `last_modified` is refreshed;
    /// `date_created` is never touched. Returns None when the blog does not
    /// exist.
    pub fn update_blog(&self, id: i64, patch: &BlogPatch) -> StorageResult<Option<Blog>> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;

        let Some(existing) = get_blog_inner(&tx, id)? else {
            return Ok(None);
        };

        let title = patch.title.clone().unwrap_or_else(|| existing.title.clone());
        let body = patch.body.clone().unwrap_or_else(|| existing.body.clone());
        let is_draft = patch.is_draft.unwrap_or(existing.is_draft);

        let title_changed = title != existing.title;
        let slug = if title_changed || existing.slug.is_empty() {
            slugify(&title)
        } else {
            existing.slug.clone()
        };

        let now = format_ts(chrono::Utc::now());
        tx.execute(
            "UPDATE blogs SET slug = ?1, title = ?2, body = ?3, is_draft = ?4,
             last_modified = ?5 WHERE id = ?6",
            params![slug, title, body, is_draft, now, id],
        )?;

        if let Some(category_ids) = &patch.category_ids {
            replace_blog_categories(&tx, id, category_ids)?;
        }

        let updated = get_blog_inner(&tx, id)?.ok_or_else(|| StorageError::not_found("blog", id))?;
        tx.commit()?;

        Ok(Some(updated))
    }

    /// Delete a blog post; its comments and join rows cascade
    pub fn delete_blog(&self, id: i64) -> StorageResult<bool> {
        let conn = self.lock();
        let changed = conn.execute("DELETE FROM blogs WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    /// List blogs with the annotated comment count, honoring filters, search,
    /// date drilldown, ordering, and pagination
    pub fn list_blogs(&self, query: &BlogQuery, page: Page) -> StorageResult<Paged<BlogSummary>> {
        let conn = self.lock();
        let (where_sql, mut params) = query.where_clause();

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM blogs b {where_sql}"),
            params_from_iter(params.iter()),
            |row| row.get(0),
        )?;

        let sql = format!(
            "SELECT b.id, b.title, b.slug, b.is_draft, b.date_created, b.last_modified,
                    COALESCE(cc.cnt, 0) AS comment_count
             FROM blogs b
             LEFT JOIN (SELECT blog_id, COUNT(*) AS cnt FROM comments GROUP BY blog_id) cc
               ON cc.blog_id = b.id
             {where_sql}
             {order_sql}
             LIMIT ? OFFSET ?",
            order_sql = query.order_clause(),
        );

        params.push(Value::Integer(page.limit()));
        params.push(Value::Integer(page.offset()));

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(params.iter()), |row| {
            Ok(BlogSummary {
                id: row.get(0)?,
                title: row.get(1)?,
                slug: row.get(2)?,
                is_draft: row.get(3)?,
                date_created: parse_ts(&row.get::<_, String>(4)?),
                last_modified: parse_ts(&row.get::<_, String>(5)?),
                comment_count: row.get(6)?,
            })
        })?;
        let items: Vec<BlogSummary> = rows.collect::<rusqlite::Result<_>>()?;

        Ok(Paged::new(items, page, total as usize))
    }

    /// Bulk publish / revert-to-draft. Returns the number of rows changed.
    pub fn set_draft_many(&self, ids: &[i64], is_draft: bool) -> StorageResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let conn = self.lock();
        let placeholders: String = ids.iter().map(|_| "?").collect::<Vec<_>>().join(",");
        let sql = format!(
            "UPDATE blogs SET is_draft = ?, last_modified = ? WHERE id IN ({placeholders})"
        );

        let mut params: Vec<Value> = Vec::with_capacity(ids.len() + 2);
        params.push(Value::Integer(i64::from(is_draft)));
        params.push(Value::Text(format_ts(chrono::Utc::now())));
        params.extend(ids.iter().map(|&id| Value::Integer(id)));

        let changed = conn.execute(&sql, params_from_iter(params.iter()))?;
        Ok(changed)
    }

    /// Replace the categories attached to a blog
    pub fn set_blog_categories(&self, blog_id: i64, category_ids: &[i64]) -> StorageResult<()> {
        let conn = self.lock();
        if get_blog_inner(&conn, blog_id)?.is_none() {
            return Err(StorageError::not_found("blog", blog_id));
        }
        replace_blog_categories(&conn, blog_id, category_ids)
    }

    /// Categories attached to a blog
    pub fn blog_categories(&self, blog_id: i64) -> StorageResult<Vec<Category>> {
        let conn = self.lock();
        Ok(categories_of_blog(&conn, blog_id)?)
    }

    /// Insert many blogs in one transaction (seeding / import). Returns the
    /// number of rows created.
    pub fn insert_blogs(&self, blogs: &[NewBlog]) -> StorageResult<usize> {
        if blogs.is_empty() {
            return Ok(0);
        }

        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let now = format_ts(chrono::Utc::now());

        {
            let mut stmt = tx.prepare(
                "INSERT INTO blogs (slug, title, body, date_created, last_modified, is_draft)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for new in blogs {
                stmt.execute(params![
                    slugify(&new.title),
                    new.title,
                    new.body,
                    now,
                    now,
                    new.is_draft.unwrap_or(true),
                ])?;
                if !new.category_ids.is_empty() {
                    let id = tx.last_insert_rowid();
                    replace_blog_categories(&tx, id, &new.category_ids)?;
                }
            }
        }

        tx.commit()?;
        Ok(blogs.len())
    }

    /// Ids of all blogs, oldest first (seeding walks this)
    pub fn all_blog_ids(&self) -> StorageResult<Vec<i64>> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT id FROM blogs ORDER BY id")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }
}
