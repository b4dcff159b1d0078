use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quill::commands;
use quill::commands::serve::ServeParams;

#[derive(Parser)]
#[command(
    name = "quill",
    version,
    about = "Content management backend for a blogging application",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the admin server
    Serve {
        /// Bind host
        #[arg(long)]
        host: Option<String>,

        /// Bind port
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database path
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// TOML config file (otherwise environment variables are used)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Disable permissive CORS
        #[arg(long, default_value = "false")]
        no_cors: bool,

        /// Disable per-request tracing
        #[arg(long, default_value = "false")]
        no_request_logging: bool,
    },

    /// Populate the database with fake sample data
    Seed {
        /// SQLite database path
        #[arg(short, long, default_value = "data/quill.db")]
        database: PathBuf,

        /// Number of blog posts to create
        #[arg(short, long, default_value = "500")]
        blogs: usize,

        /// Comments created under each blog post
        #[arg(long, default_value = "3")]
        comments_per_blog: usize,

        /// RNG seed for reproducible data
        #[arg(long)]
        rng_seed: Option<u64>,
    },

    /// Export a content table to CSV or JSON
    Export {
        /// SQLite database path
        #[arg(short, long, default_value = "data/quill.db")]
        database: PathBuf,

        /// Table to export (blogs, comments, categories)
        #[arg(short, long, default_value = "blogs")]
        model: String,

        /// Output format (csv, json)
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import blog posts from a CSV file
    Import {
        /// SQLite database path
        #[arg(short, long, default_value = "data/quill.db")]
        database: PathBuf,

        /// CSV file to import
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print content counts
    Stats {
        /// SQLite database path
        #[arg(short, long, default_value = "data/quill.db")]
        database: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(&cli.log_format, cli.verbose)?;

    tracing::info!("quill content backend starting");

    match cli.command {
        Commands::Serve {
            host,
            port,
            database,
            config,
            no_cors,
            no_request_logging,
        } => {
            tracing::info!(
                host = ?host,
                port = ?port,
                database = ?database,
                "starting serve command"
            );
            commands::serve::serve(ServeParams {
                host,
                port,
                database,
                config_file: config,
                no_cors,
                no_request_logging,
            })
            .await?;
        }

        Commands::Seed {
            database,
            blogs,
            comments_per_blog,
            rng_seed,
        } => {
            tracing::info!(
                database = %database.display(),
                blogs = %blogs,
                comments_per_blog = %comments_per_blog,
                "starting seed command"
            );
            commands::seed::run(database, blogs, comments_per_blog, rng_seed).await?;
        }

        Commands::Export {
            database,
            model,
            format,
            output,
        } => {
            tracing::info!(
                database = %database.display(),
                model = %model,
                format = %format,
                "starting export command"
            );
            commands::export::run(database, model, format, output).await?;
        }

        Commands::Import { database, input } => {
            tracing::info!(
                database = %database.display(),
                input = %input.display(),
                "starting import command"
            );
            commands::import::run(database, input).await?;
        }

        Commands::Stats { database } => {
            commands::stats::run(database).await?;
        }
    }

    tracing::info!("quill completed successfully");
    Ok(())
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("quill=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new("quill=info,warn")
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
