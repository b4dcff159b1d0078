//! Sample-data generation for development databases
//!
//! Populates the store with fake blogs, a few comments per blog, and a fixed
//! category set. Counts mirror a typical development fixture: 500 posts with
//! 3 comments each unless overridden. Deterministic when given an RNG seed.

use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::Fake;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::error::Result;
use crate::models::NewBlog;
use crate::storage::SqliteStore;

/// The fixed category set created by every seed run
pub const CATEGORY_NAMES: [&str; 6] = [
    "Web Development",
    "Databases",
    "Data Science",
    "Security",
    "Cloud",
    "Programming Languages",
];

/// Seed run configuration
#[derive(Debug, Clone)]
pub struct SeedConfig {
    /// Number of blog posts to create
    pub blogs: usize,

    /// Comments created under each blog post
    pub comments_per_blog: usize,

    /// RNG seed for reproducible runs
    pub rng_seed: Option<u64>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            blogs: 500,
            comments_per_blog: 3,
            rng_seed: None,
        }
    }
}

/// Rows created by a seed run
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedReport {
    pub blogs: usize,
    pub comments: usize,
    pub categories: usize,
}

/// Populate the store with sample data
pub fn seed(store: &SqliteStore, config: &SeedConfig) -> Result<SeedReport> {
    let mut rng = match config.rng_seed {
        Some(value) => StdRng::seed_from_u64(value),
        None => StdRng::from_entropy(),
    };

    let mut report = SeedReport::default();

    // Blogs: fake sentence titles, fake paragraph bodies
    let blogs: Vec<NewBlog> = (0..config.blogs)
        .map(|_| NewBlog {
            title: Sentence(4..9).fake_with_rng(&mut rng),
            body: Paragraph(3..8).fake_with_rng(&mut rng),
            ..Default::default()
        })
        .collect();
    report.blogs = store.insert_blogs(&blogs)?;
    tracing::info!(count = report.blogs, "seeded blogs");

    // Comments: a fixed handful under every post
    let mut comments: Vec<(i64, String)> =
        Vec::with_capacity(report.blogs * config.comments_per_blog);
    for blog_id in store.all_blog_ids()? {
        for _ in 0..config.comments_per_blog {
            comments.push((blog_id, Paragraph(2..5).fake_with_rng(&mut rng)));
        }
    }
    report.comments = store.insert_comments(&comments)?;
    tracing::info!(count = report.comments, "seeded comments");

    // Categories: fixed reference data, idempotent across runs
    for name in CATEGORY_NAMES {
        store.get_or_create_category(name)?;
        report.categories += 1;
    }
    tracing::info!(count = report.categories, "seeded categories");

    crate::metrics::record_seeded("blog", report.blogs);
    crate::metrics::record_seeded("comment", report.comments);
    crate::metrics::record_seeded("category", report.categories);

    Ok(report)
}
