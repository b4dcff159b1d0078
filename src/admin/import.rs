//! CSV import of blog posts
//!
//! Rows are `title,body,is_draft,categories`; only `title` is required.
//! Categories are pipe-separated names, created on demand. Import is
//! create-only and keeps going past bad rows, recording one error line per
//! row so the report tells the editor exactly what was skipped.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::{SqliteStore, StorageError};

/// Errors that abort an import before any rows are processed
#[derive(Error, Debug)]
pub enum ImportError {
    /// The CSV could not be read at all
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is missing from the header
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    /// The store failed while creating rows
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Outcome of an import run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub created: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct BlogImportRow {
    title: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    is_draft: Option<String>,
    #[serde(default)]
    categories: Option<String>,
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "" => None,
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Import blog posts from CSV bytes
pub fn import_blogs(store: &SqliteStore, data: &[u8]) -> Result<ImportReport, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    if !headers.iter().any(|h| h == "title") {
        return Err(ImportError::MissingColumn("title"));
    }

    let mut report = ImportReport::default();

    for (index, result) in reader.deserialize::<BlogImportRow>().enumerate() {
        // Header is line 1
        let line = index + 2;

        let row = match result {
            Ok(row) => row,
            Err(e) => {
                report.skipped += 1;
                report.errors.push(format!("line {line}: {e}"));
                continue;
            }
        };

        if row.title.trim().is_empty() {
            report.skipped += 1;
            report.errors.push(format!("line {line}: title is required"));
            continue;
        }

        let is_draft = match row.is_draft.as_deref() {
            None | Some("") => None,
            Some(raw) => match parse_flag(raw) {
                Some(flag) => Some(flag),
                None => {
                    report.skipped += 1;
                    report
                        .errors
                        .push(format!("line {line}: unrecognized is_draft value '{raw}'"));
                    continue;
                }
            },
        };

        let mut category_ids = Vec::new();
        if let Some(names) = &row.categories {
            for name in names.split('|').map(str::trim).filter(|n| !n.is_empty()) {
                let category = store.get_or_create_category(name)?;
                category_ids.push(category.id);
            }
        }

        store.create_blog(&crate::models::NewBlog {
            title: row.title,
            body: row.body,
            is_draft,
            category_ids,
        })?;
        report.created += 1;
    }

    tracing::info!(
        created = report.created,
        skipped = report.skipped,
        "blog import finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::listing::{BlogQuery, Page};

    #[test]
    fn test_import_creates_blogs_and_categories() {
        let store = SqliteStore::in_memory().unwrap();
        let csv = "title,body,is_draft,categories\n\
                   Hello World,First body,false,Web Development|Security\n\
                   Second Post,Another body,,\n";

        let report = import_blogs(&store, csv.as_bytes()).unwrap();
        assert_eq!(report.created, 2);
        assert_eq!(report.skipped, 0);
        assert!(report.errors.is_empty());

        let listed = store
            .list_blogs(&BlogQuery::default(), Page::new(1, 10))
            .unwrap();
        assert_eq!(listed.total, 2);

        // First row was explicitly published, second defaulted to draft
        let published = store
            .list_blogs(
                &BlogQuery {
                    is_draft: Some(false),
                    ..Default::default()
                },
                Page::new(1, 10),
            )
            .unwrap();
        assert_eq!(published.total, 1);
        assert_eq!(published.items[0].title, "Hello World");

        assert_eq!(store.list_categories(true).unwrap().len(), 2);
    }

    #[test]
    fn test_import_skips_bad_rows_and_continues() {
        let store = SqliteStore::in_memory().unwrap();
        let csv = "title,body,is_draft,categories\n\
                   ,missing title,,\n\
                   Valid Post,body,maybe,\n\
                   Another Valid,body,true,\n";

        let report = import_blogs(&store, csv.as_bytes()).unwrap();
        assert_eq!(report.created, 1);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors[0].contains("line 2"));
        assert!(report.errors[1].contains("is_draft"));
    }

    #[test]
    fn test_import_requires_title_column() {
        let store = SqliteStore::in_memory().unwrap();
        let csv = "name,body\nSomething,else\n";

        let err = import_blogs(&store, csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ImportError::MissingColumn("title")));
    }

    #[test]
    fn test_reimport_reuses_categories() {
        let store = SqliteStore::in_memory().unwrap();
        let csv = "title,categories\nPost A,Security\nPost B,Security\n";

        import_blogs(&store, csv.as_bytes()).unwrap();
        assert_eq!(store.list_categories(true).unwrap().len(), 1);
    }
}
