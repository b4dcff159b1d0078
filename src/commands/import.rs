//! The `import` command: load blogs from a CSV file

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::admin::import::import_blogs;
use crate::storage::SqliteStore;

/// Import blog posts from a CSV file and print the report
pub async fn run(database: PathBuf, input: PathBuf) -> Result<()> {
    let data = std::fs::read(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let store = SqliteStore::open(&database).context("Failed to open content store")?;

    let report = import_blogs(&store, &data).context("Import failed")?;

    println!("Import complete");
    println!("  Created: {}", report.created);
    println!("  Skipped: {}", report.skipped);
    if !report.errors.is_empty() {
        println!("  Errors:");
        for error in &report.errors {
            println!("    - {error}");
        }
    }

    Ok(())
}
