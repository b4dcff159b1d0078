//! The `serve` command: run the admin server

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::admin::AdminServer;
use crate::config::Config;
use crate::storage::SqliteStore;

/// Configuration parameters for the serve command
pub struct ServeParams {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    pub no_cors: bool,
    pub no_request_logging: bool,
}

/// Start the admin server
pub async fn serve(params: ServeParams) -> Result<()> {
    let mut config = match &params.config_file {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };

    // CLI flags override file/env configuration
    if let Some(host) = params.host {
        config.server.host = host;
    }
    if let Some(port) = params.port {
        config.server.port = port;
    }
    if let Some(database) = params.database {
        config.database.path = database;
    }
    if params.no_cors {
        config.server.enable_cors = false;
    }
    if params.no_request_logging {
        config.server.enable_request_logging = false;
    }

    config.validate().context("Invalid configuration")?;

    if let Err(e) = crate::metrics::init_metrics() {
        eprintln!("Warning: metrics initialization failed: {e}");
    }

    let store = Arc::new(
        SqliteStore::open(&config.database.path).context("Failed to open content store")?,
    );

    let server = AdminServer::new(config, store).context("Failed to create admin server")?;

    println!("{}", server.info().display());
    println!();
    println!("API Endpoints:");
    println!("  GET  /api/health               - Health check");
    println!("  GET  /api/stats                - Content counts");
    println!("  GET  /metrics                  - Prometheus metrics");
    println!("  GET  /api/blogs                - List blogs (filters, search, pagination)");
    println!("  POST /api/blogs                - Create blog");
    println!("  GET  /api/blogs/{{id}}           - Blog detail");
    println!("  PUT  /api/blogs/{{id}}           - Update blog");
    println!("  DEL  /api/blogs/{{id}}           - Delete blog");
    println!("  POST /api/blogs/actions        - Bulk publish / revert to draft");
    println!("  GET  /api/blogs/export         - Export blogs (csv, json)");
    println!("  POST /api/blogs/import         - Import blogs from CSV");
    println!("  GET  /api/blogs/{{id}}/comments  - Comments under a blog");
    println!("  POST /api/blogs/{{id}}/comments  - Add a comment");
    println!("  GET  /api/comments             - List comments");
    println!("  POST /api/comments/actions     - Bulk activate / deactivate");
    println!("  GET  /api/categories           - List categories");
    println!("  POST /api/categories/actions   - Bulk activate / deactivate");
    println!();
    println!("Press Ctrl+C to stop.\n");

    server
        .start_with_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("shutdown signal received");
                }
                Err(e) => {
                    tracing::error!("failed to wait for Ctrl+C: {}", e);
                }
            }
        })
        .await?;

    println!("Admin server stopped.");
    Ok(())
}
