//! The `stats` command: print content counts

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::storage::SqliteStore;

/// Print row counts for the content tables
pub async fn run(database: PathBuf) -> Result<()> {
    let store = SqliteStore::open(&database).context("Failed to open content store")?;
    let stats = store.content_stats().context("Failed to read stats")?;

    println!("Content statistics");
    println!("==================");
    println!("  Blogs: {} ({} draft, {} published)", stats.blogs, stats.drafts, stats.published);
    println!("  Comments: {} ({} active)", stats.comments, stats.active_comments);
    println!("  Categories: {} ({} active)", stats.categories, stats.active_categories);

    Ok(())
}
