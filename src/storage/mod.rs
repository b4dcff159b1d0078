//! SQLite persistence for blogs, comments, and categories
//!
//! A single [`SqliteStore`] owns the connection behind a `Mutex` and exposes
//! the operations the admin surface, the seeder, and the CLI build on. The
//! schema is created idempotently at open; foreign keys are enforced so
//! comments (and join rows) are cascade-deleted with their blog.

mod blogs;
mod categories;
mod comments;
pub mod listing;

pub use listing::{BlogOrder, BlogQuery, CommentOrder, CommentQuery, Page, Paged, SortDir};

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use thiserror::Error;

use crate::models::ContentStats;

/// Errors from the persistence layer
#[derive(Error, Debug)]
pub enum StorageError {
    /// Underlying SQLite error
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Referenced row does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// Filesystem error while preparing the database location
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// True when the database was busy or locked and the call may be retried
    pub fn is_busy(&self) -> bool {
        match self {
            Self::Sqlite(rusqlite::Error::SqliteFailure(e, _)) => matches!(
                e.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }

    pub(crate) fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

/// Result alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Thread-safe shared store handle
pub type SharedStore = Arc<SqliteStore>;

/// SQLite-backed content store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a store at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        let store = Self::from_connection(conn)?;

        tracing::info!(path = %path.display(), "content store opened");
        Ok(store)
    }

    /// Create an in-memory store (for tests and throwaway runs)
    pub fn in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        // WAL for concurrent readers; foreign_keys so cascades hold
        conn.execute_batch(
            "PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;",
        )?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.create_schema()?;
        Ok(store)
    }

    /// Create the content schema if it does not exist yet
    fn create_schema(&self) -> StorageResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS blogs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                slug TEXT NOT NULL,
                title TEXT NOT NULL,
                body TEXT NOT NULL DEFAULT '',
                date_created TEXT NOT NULL,
                last_modified TEXT NOT NULL,
                is_draft INTEGER NOT NULL DEFAULT 1
            );

            CREATE INDEX IF NOT EXISTS idx_blogs_slug ON blogs(slug);
            CREATE INDEX IF NOT EXISTS idx_blogs_is_draft ON blogs(is_draft);
            CREATE INDEX IF NOT EXISTS idx_blogs_date_created ON blogs(date_created);

            CREATE TABLE IF NOT EXISTS comments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                blog_id INTEGER NOT NULL REFERENCES blogs(id) ON DELETE CASCADE,
                comment TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                date_created TEXT NOT NULL,
                last_modified TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_comments_blog ON comments(blog_id);
            CREATE INDEX IF NOT EXISTS idx_comments_is_active ON comments(is_active);

            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1
            );

            CREATE TABLE IF NOT EXISTS blog_categories (
                blog_id INTEGER NOT NULL REFERENCES blogs(id) ON DELETE CASCADE,
                category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
                PRIMARY KEY (blog_id, category_id)
            );

            CREATE TABLE IF NOT EXISTS comment_categories (
                comment_id INTEGER NOT NULL REFERENCES comments(id) ON DELETE CASCADE,
                category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
                PRIMARY KEY (comment_id, category_id)
            );
            "#,
        )?;

        Ok(())
    }

    pub(crate) fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    /// Row counts across the content tables
    pub fn content_stats(&self) -> StorageResult<ContentStats> {
        let conn = self.lock();

        let count = |sql: &str| -> rusqlite::Result<usize> {
            conn.query_row(sql, [], |row| row.get::<_, i64>(0))
                .map(|n| n as usize)
        };

        Ok(ContentStats {
            blogs: count("SELECT COUNT(*) FROM blogs")?,
            drafts: count("SELECT COUNT(*) FROM blogs WHERE is_draft = 1")?,
            published: count("SELECT COUNT(*) FROM blogs WHERE is_draft = 0")?,
            comments: count("SELECT COUNT(*) FROM comments")?,
            active_comments: count("SELECT COUNT(*) FROM comments WHERE is_active = 1")?,
            categories: count("SELECT COUNT(*) FROM categories")?,
            active_categories: count("SELECT COUNT(*) FROM categories WHERE is_active = 1")?,
        })
    }
}

/// Format a timestamp for storage
pub(crate) fn format_ts(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// Parse a stored timestamp, falling back to now on corruption
pub(crate) fn parse_ts(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewBlog, NewCategory, NewComment};

    #[test]
    fn test_open_in_memory_creates_schema() {
        let store = SqliteStore::in_memory().unwrap();
        let stats = store.content_stats().unwrap();
        assert_eq!(stats.blogs, 0);
        assert_eq!(stats.comments, 0);
        assert_eq!(stats.categories, 0);
    }

    #[test]
    fn test_content_stats_counts() {
        let store = SqliteStore::in_memory().unwrap();

        let blog = store
            .create_blog(&NewBlog {
                title: "First post".to_string(),
                ..Default::default()
            })
            .unwrap();
        store
            .update_blog(
                blog.id,
                &crate::models::BlogPatch {
                    is_draft: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();

        store
            .create_comment(
                blog.id,
                &NewComment {
                    comment: "Nice one".to_string(),
                    ..Default::default()
                },
            )
            .unwrap();

        store
            .create_category(&NewCategory {
                name: "General".to_string(),
                is_active: None,
            })
            .unwrap();

        let stats = store.content_stats().unwrap();
        assert_eq!(stats.blogs, 1);
        assert_eq!(stats.published, 1);
        assert_eq!(stats.drafts, 0);
        assert_eq!(stats.comments, 1);
        assert_eq!(stats.active_comments, 1);
        assert_eq!(stats.categories, 1);
    }

    #[test]
    fn test_parse_ts_roundtrip() {
        let now = Utc::now();
        let parsed = parse_ts(&format_ts(now));
        assert_eq!(parsed.timestamp_micros(), now.timestamp_micros());
    }
}
