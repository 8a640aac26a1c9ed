//! # LinkPilot CLI (`linkpilot`)
//!
//! ## Usage
//!
//! ```bash
//! linkpilot --config ./config/linkpilot.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `linkpilot init` | Create the SQLite database and run schema migrations |
//! | `linkpilot import` | Load documents from the `[import]` directory |
//! | `linkpilot analyze <id>` | Keywords and internal-link suggestions for a document |
//! | `linkpilot orphans` | Published documents with no inbound internal links |
//! | `linkpilot stats <id>` | Outgoing and incoming link counts for a document |
//! | `linkpilot serve` | Start the HTTP server |
//!
//! Log verbosity follows `RUST_LOG` (default `linkpilot=info`); logs go to
//! stderr so `--json` output stays clean.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use linkpilot::analyze::{self, ContentSource};
use linkpilot::{config, import, migrate, orphans, server, stats};

/// LinkPilot: internal-link suggestions and orphaned-content detection.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/linkpilot.example.toml` for a full example.
#[derive(Parser)]
#[command(name = "linkpilot", version, about)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/linkpilot.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Idempotent: running it multiple times is safe.
    Init,

    /// Import documents from the JSON files under `[import].root`.
    Import,

    /// Extract keywords and suggest documents to link to.
    ///
    /// Analyzes the stored body unless `--content` or `--file` is given.
    Analyze {
        /// Document id. The document itself is never suggested.
        id: i64,

        /// Analyze this text instead of the stored body.
        #[arg(long, conflicts_with = "file")]
        content: Option<String>,

        /// Analyze the contents of this file instead of the stored body.
        #[arg(long)]
        file: Option<PathBuf>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List published documents that no other document links to.
    Orphans {
        /// Document types to scan (repeatable or comma-separated).
        /// Defaults to `[orphans].post_types`.
        #[arg(long = "type", value_delimiter = ',')]
        types: Vec<String>,

        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Page size. Defaults to `[orphans].per_page`.
        #[arg(long)]
        per_page: Option<usize>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show outgoing and incoming link counts for a document.
    Stats {
        id: i64,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP server on `[server].bind`.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("linkpilot=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Import => {
            import::run_import(&cfg).await?;
        }
        Commands::Analyze {
            id,
            content,
            file,
            json,
        } => {
            let source = match (content, file) {
                (Some(content), _) => ContentSource::Inline(content),
                (None, Some(path)) => ContentSource::File(path),
                (None, None) => ContentSource::Stored,
            };
            analyze::run_analyze(&cfg, id, source, json).await?;
        }
        Commands::Orphans {
            types,
            page,
            per_page,
            json,
        } => {
            orphans::run_orphans(&cfg, &types, page, per_page, json).await?;
        }
        Commands::Stats { id, json } => {
            stats::run_stats(&cfg, id, json).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
