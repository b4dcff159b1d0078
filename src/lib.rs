//! quill - Content management backend for a blogging application
//!
//! Data models for blog posts, comments, and categories, a SQLite-backed
//! store, and an administrative HTTP API for content editors: list views
//! with filters/search/pagination/ordering, bulk actions, and CSV/JSON
//! import & export. Sample data comes from the `seed` command.
//!
//! # Architecture
//!
//! - [`config`] - Configuration management and settings
//! - [`models`] - Core data structures and slug derivation
//! - [`storage`] - SQLite persistence and list queries
//! - [`admin`] - Admin HTTP server, bulk actions, import/export
//! - [`seed`] - Fake sample-data generation
//! - [`metrics`] - Prometheus metrics
//! - [`error`] - Unified error handling
//!
//! # Example
//!
//! ```no_run
//! use quill::config::Config;
//! use quill::storage::SqliteStore;
//! use quill::admin::AdminServer;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let store = Arc::new(SqliteStore::open(&config.database.path)?);
//!     let server = AdminServer::new(config, store)?;
//!     // server.start().await?;
//!     Ok(())
//! }
//! ```

pub mod admin;
pub mod commands;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod seed;
pub mod storage;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::admin::{AdminServer, AppState};
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::models::{slugify, Blog, Category, Comment, ContentStats};
    pub use crate::storage::{BlogQuery, CommentQuery, Page, Paged, SharedStore, SqliteStore};
}

// Direct re-exports for convenience
pub use models::{slugify, Blog, Category, Comment};
