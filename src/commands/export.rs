//! The `export` command: write content tables to CSV or JSON files

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::admin::export::{export_blogs, export_categories, export_comments, ExportFormat};
use crate::storage::listing::BlogQuery;
use crate::storage::SqliteStore;

/// Which table to export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportModel {
    Blogs,
    Comments,
    Categories,
}

impl ExportModel {
    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "blogs" => Some(Self::Blogs),
            "comments" => Some(Self::Comments),
            "categories" => Some(Self::Categories),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Blogs => "blogs",
            Self::Comments => "comments",
            Self::Categories => "categories",
        }
    }
}

/// Export a content table to a file (or stdout when no output is given)
pub async fn run(
    database: PathBuf,
    model: String,
    format: String,
    output: Option<PathBuf>,
) -> Result<()> {
    let model = ExportModel::from_param(&model)
        .ok_or_else(|| anyhow::anyhow!("Unknown model '{model}'. Valid: blogs, comments, categories"))?;
    let format = ExportFormat::from_param(&format)
        .ok_or_else(|| anyhow::anyhow!("Unknown format '{format}'. Valid: csv, json"))?;

    let store = SqliteStore::open(&database).context("Failed to open content store")?;

    let bytes = match model {
        ExportModel::Blogs => export_blogs(&store, &BlogQuery::default(), format),
        ExportModel::Comments => export_comments(&store, format),
        ExportModel::Categories => export_categories(&store, format),
    }
    .context("Export failed")?;

    match output {
        Some(path) => {
            std::fs::write(&path, &bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "Exported {} ({} bytes) to {}",
                model.as_str(),
                bytes.len(),
                path.display()
            );
        }
        None => {
            let text = String::from_utf8(bytes).context("Export produced invalid UTF-8")?;
            print!("{text}");
        }
    }

    Ok(())
}
