//! Export of content tables to CSV or JSON
//!
//! Used by both the admin route (`GET /api/blogs/export`) and the CLI
//! `export` command. Blog exports honor the same filters as the list view
//! and include the joined category names.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{Category, Comment};
use crate::storage::listing::{BlogQuery, CommentQuery, Page};
use crate::storage::SqliteStore;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Json => "application/json",
        }
    }
}

/// One exported blog row; categories are joined with `|`
#[derive(Debug, Clone, Serialize)]
pub struct BlogExportRow {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub is_draft: bool,
    pub date_created: String,
    pub last_modified: String,
    pub comment_count: i64,
    pub categories: String,
}

/// All rows are fetched in one oversized page: exports are whole-table
/// (or whole-filter) snapshots, not paginated views.
fn everything() -> Page {
    Page::new(1, u32::MAX)
}

/// Collect blog export rows honoring list-view filters
pub fn blog_rows(store: &SqliteStore, query: &BlogQuery) -> Result<Vec<BlogExportRow>> {
    let listed = store.list_blogs(query, everything())?;

    let mut rows = Vec::with_capacity(listed.items.len());
    for summary in listed.items {
        let Some(detail) = store.get_blog_detail(summary.id)? else {
            continue;
        };
        let categories = detail
            .categories
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join("|");
        rows.push(BlogExportRow {
            id: detail.blog.id,
            title: detail.blog.title,
            slug: detail.blog.slug,
            body: detail.blog.body,
            is_draft: detail.blog.is_draft,
            date_created: detail.blog.date_created.to_rfc3339(),
            last_modified: detail.blog.last_modified.to_rfc3339(),
            comment_count: detail.comment_count,
            categories,
        });
    }
    Ok(rows)
}

/// Export blogs in the requested format
pub fn export_blogs(
    store: &SqliteStore,
    query: &BlogQuery,
    format: ExportFormat,
) -> Result<Vec<u8>> {
    let rows = blog_rows(store, query)?;
    match format {
        ExportFormat::Json => Ok(serde_json::to_vec_pretty(&rows)?),
        ExportFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(Vec::new());
            wtr.write_record([
                "id",
                "title",
                "slug",
                "body",
                "is_draft",
                "date_created",
                "last_modified",
                "comment_count",
                "categories",
            ])?;
            for row in &rows {
                wtr.write_record([
                    row.id.to_string(),
                    row.title.clone(),
                    row.slug.clone(),
                    row.body.clone(),
                    row.is_draft.to_string(),
                    row.date_created.clone(),
                    row.last_modified.clone(),
                    row.comment_count.to_string(),
                    row.categories.clone(),
                ])?;
            }
            finish_csv(wtr)
        }
    }
}

/// Export all comments in the requested format
pub fn export_comments(store: &SqliteStore, format: ExportFormat) -> Result<Vec<u8>> {
    let listed = store.list_comments(&CommentQuery::default(), everything())?;
    match format {
        ExportFormat::Json => Ok(serde_json::to_vec_pretty(&listed.items)?),
        ExportFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(Vec::new());
            wtr.write_record([
                "id",
                "blog_id",
                "comment",
                "is_active",
                "date_created",
                "last_modified",
            ])?;
            for c in &listed.items {
                write_comment_record(&mut wtr, c)?;
            }
            finish_csv(wtr)
        }
    }
}

fn write_comment_record(wtr: &mut csv::Writer<Vec<u8>>, c: &Comment) -> Result<()> {
    wtr.write_record([
        c.id.to_string(),
        c.blog_id.to_string(),
        c.comment.clone(),
        c.is_active.to_string(),
        c.date_created.to_rfc3339(),
        c.last_modified.to_rfc3339(),
    ])?;
    Ok(())
}

/// Export all categories in the requested format
pub fn export_categories(store: &SqliteStore, format: ExportFormat) -> Result<Vec<u8>> {
    let categories: Vec<Category> = store.list_categories(true)?;
    match format {
        ExportFormat::Json => Ok(serde_json::to_vec_pretty(&categories)?),
        ExportFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(Vec::new());
            wtr.write_record(["id", "name", "is_active"])?;
            for c in &categories {
                wtr.write_record([c.id.to_string(), c.name.clone(), c.is_active.to_string()])?;
            }
            finish_csv(wtr)
        }
    }
}

fn finish_csv(wtr: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    wtr.into_inner()
        .map_err(|e| Error::Io(std::io::Error::other(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewBlog, NewComment};

    fn seeded_store() -> SqliteStore {
        let store = SqliteStore::in_memory().unwrap();
        let category = store.get_or_create_category("Databases").unwrap();
        let blog = store
            .create_blog(&NewBlog {
                title: "Indexes In Depth".to_string(),
                body: "B-trees all the way down".to_string(),
                category_ids: vec![category.id],
                ..Default::default()
            })
            .unwrap();
        store
            .create_comment(
                blog.id,
                &NewComment {
                    comment: "Very thorough".to_string(),
                    ..Default::default()
                },
            )
            .unwrap();
        store
    }

    #[test]
    fn test_format_from_param() {
        assert_eq!(ExportFormat::from_param("csv"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::from_param("json"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::from_param("xlsx"), None);
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Csv.mime_type(), "text/csv");
        assert_eq!(ExportFormat::Json.mime_type(), "application/json");
    }

    #[test]
    fn test_csv_export_has_header_and_rows() {
        let store = seeded_store();
        let bytes = export_blogs(&store, &BlogQuery::default(), ExportFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("id,title,slug,"));

        let row = lines.next().unwrap();
        assert!(row.contains("Indexes In Depth"));
        assert!(row.contains("indexes-in-depth"));
        assert!(row.contains("Databases"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_json_export_roundtrips() {
        let store = seeded_store();
        let bytes = export_blogs(&store, &BlogQuery::default(), ExportFormat::Json).unwrap();
        let rows: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(rows.as_array().unwrap().len(), 1);
        assert_eq!(rows[0]["comment_count"], 1);
        assert_eq!(rows[0]["categories"], "Databases");
    }

    #[test]
    fn test_export_honors_filters() {
        let store = seeded_store();
        let query = BlogQuery {
            search: Some("no such title".to_string()),
            ..Default::default()
        };
        let bytes = export_blogs(&store, &query, ExportFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        // Header only
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_category_and_comment_exports() {
        let store = seeded_store();

        let categories = export_categories(&store, ExportFormat::Csv).unwrap();
        assert!(String::from_utf8(categories).unwrap().contains("Databases"));

        let comments = export_comments(&store, ExportFormat::Csv).unwrap();
        assert!(String::from_utf8(comments).unwrap().contains("Very thorough"));
    }
}
