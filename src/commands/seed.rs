//! The `seed` command: populate sample data

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::seed::{seed, SeedConfig};
use crate::storage::SqliteStore;

/// Populate the database with fake sample data
pub async fn run(
    database: PathBuf,
    blogs: usize,
    comments_per_blog: usize,
    rng_seed: Option<u64>,
) -> Result<()> {
    if let Err(e) = crate::metrics::init_metrics() {
        eprintln!("Warning: metrics initialization failed: {e}");
    }

    let store = SqliteStore::open(&database).context("Failed to open content store")?;

    println!("Seeding sample data");
    println!("===================");
    println!("  Database: {}", database.display());
    println!("  Blogs: {blogs}");
    println!("  Comments per blog: {comments_per_blog}");
    if let Some(value) = rng_seed {
        println!("  RNG seed: {value}");
    }
    println!();

    let config = SeedConfig {
        blogs,
        comments_per_blog,
        rng_seed,
    };
    let report = seed(&store, &config).context("Seeding failed")?;

    println!("Seed complete");
    println!("  Blogs created: {}", report.blogs);
    println!("  Comments created: {}", report.comments);
    println!("  Categories ensured: {}", report.categories);

    Ok(())
}
