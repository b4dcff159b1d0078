//! Common test utilities

use std::sync::Arc;

use quill::config::AdminConfig;
use quill::models::{Blog, Comment, NewBlog, NewComment};
use quill::storage::{SharedStore, SqliteStore};

/// Create an empty in-memory store
pub fn test_store() -> SharedStore {
    Arc::new(SqliteStore::in_memory().unwrap())
}

/// List-view settings used by the API tests
#[allow(dead_code)]
pub fn admin_config() -> AdminConfig {
    AdminConfig {
        page_size: 50,
        max_page_size: 200,
    }
}

/// Build an admin router over a store
#[allow(dead_code)]
pub fn test_router(store: SharedStore) -> axum::Router {
    quill::admin::server::router_with_state(store, admin_config())
}

/// Create a blog with default body text
pub fn create_blog(store: &SqliteStore, title: &str) -> Blog {
    store
        .create_blog(&NewBlog {
            title: title.to_string(),
            body: "Test body content.".to_string(),
            ..Default::default()
        })
        .unwrap()
}

/// Create a comment under a blog
#[allow(dead_code)]
pub fn create_comment(store: &SqliteStore, blog_id: i64, text: &str) -> Comment {
    store
        .create_comment(
            blog_id,
            &NewComment {
                comment: text.to_string(),
                ..Default::default()
            },
        )
        .unwrap()
}
