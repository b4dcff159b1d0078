// Core data structures for the quill content store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub body: String,
    pub date_created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    pub is_draft: bool,
}

/// Input for creating a blog post
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBlog {
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// Defaults to true: new posts start as drafts
    pub is_draft: Option<bool>,
    #[serde(default)]
    pub category_ids: Vec<i64>,
}

/// Partial update for a blog post; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub is_draft: Option<bool>,
    pub category_ids: Option<Vec<i64>>,
}

impl BlogPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.body.is_none()
            && self.is_draft.is_none()
            && self.category_ids.is_none()
    }
}

/// List-view row for blogs with the annotated comment count
#[derive(Debug, Clone, Serialize)]
pub struct BlogSummary {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub is_draft: bool,
    pub date_created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    pub comment_count: i64,
}

/// Full blog view: the post plus its categories and comment count
#[derive(Debug, Clone, Serialize)]
pub struct BlogDetail {
    #[serde(flatten)]
    pub blog: Blog,
    pub categories: Vec<Category>,
    pub comment_count: i64,
}

/// A comment on a blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub blog_id: i64,
    pub comment: String,
    pub is_active: bool,
    pub date_created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

/// Input for creating a comment
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewComment {
    pub comment: String,
    /// Defaults to true
    pub is_active: Option<bool>,
    #[serde(default)]
    pub category_ids: Vec<i64>,
}

/// Partial update for a comment
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentPatch {
    pub comment: Option<String>,
    pub is_active: Option<bool>,
    pub category_ids: Option<Vec<i64>>,
}

/// A content category, referenced by both blogs and comments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
}

/// Input for creating a category
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCategory {
    pub name: String,
    /// Defaults to true
    pub is_active: Option<bool>,
}

/// Partial update for a category
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

/// Row counts across the content tables
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContentStats {
    pub blogs: usize,
    pub drafts: usize,
    pub published: usize,
    pub comments: usize,
    pub active_comments: usize,
    pub categories: usize,
    pub active_categories: usize,
}

/// Derive a URL slug from a post title.
///
/// Lower-cases the title, splits it on whitespace, and joins the words with
/// hyphens. Punctuation and non-ASCII characters pass through untouched, the
/// result is not truncated, and uniqueness is not enforced.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("A Day In The Life"), "a-day-in-the-life");
    }

    #[test]
    fn test_slugify_collapses_whitespace() {
        assert_eq!(slugify("  spaced   out\ttitle "), "spaced-out-title");
    }

    #[test]
    fn test_slugify_keeps_punctuation() {
        // Deliberately naive: punctuation is preserved verbatim
        assert_eq!(slugify("Rust: 2024 Edition!"), "rust:-2024-edition!");
    }

    #[test]
    fn test_slugify_empty_title() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("   "), "");
    }

    #[test]
    fn test_slugify_non_ascii_passthrough() {
        assert_eq!(slugify("Caffè Latte Guide"), "caffè-latte-guide");
    }

    #[test]
    fn test_blog_patch_is_empty() {
        assert!(BlogPatch::default().is_empty());

        let patch = BlogPatch {
            title: Some("New title".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
