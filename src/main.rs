//! # Lorekeeper CLI (`lore`)
//!
//! The `lore` binary serves the knowledge base over HTTP and provides
//! operational commands that exercise the same core directly.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `lore serve` | Start the HTTP server |
//! | `lore query "<text>"` | Embed a query and print the most similar chunks |
//! | `lore stats` | Print a summary of the knowledge base |
//! | `lore wipe` | Delete every stored chunk |
//!
//! All commands accept `--config` pointing to a TOML file; built-in
//! defaults are used when the file does not exist.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use lorekeeper::config::{self, Config};
use lorekeeper::embedding::EmbeddingClient;
use lorekeeper::server;
use lorekeeper::store::KnowledgeBase;

/// Lorekeeper — a self-hosted RAG knowledge base for game-world lore.
#[derive(Parser)]
#[command(
    name = "lore",
    about = "Lorekeeper — a self-hosted RAG knowledge base for game-world lore",
    version
)]
struct Cli {
    /// Path to configuration file (TOML). Built-in defaults are used if
    /// the file does not exist.
    #[arg(long, global = true, default_value = "./config/lore.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    ///
    /// Loads the snapshot, binds the configured address, and serves the
    /// ingest/query/wipe API until terminated.
    Serve,

    /// Embed a query and print the most similar stored chunks.
    Query {
        /// The query text.
        text: String,

        /// Maximum number of results to return.
        #[arg(long, default_value_t = 5)]
        top_k: usize,
    },

    /// Print a summary of the knowledge base.
    Stats,

    /// Delete every stored chunk and reset the snapshot.
    Wipe,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Query { text, top_k } => {
            run_query(&cfg, &text, top_k).await?;
        }
        Commands::Stats => {
            run_stats(&cfg)?;
        }
        Commands::Wipe => {
            let store = KnowledgeBase::load(&cfg.store.path);
            store.wipe()?;
            println!("wiped {}", cfg.store.path.display());
        }
    }

    Ok(())
}

/// Run the query command: embed the text and print ranked results.
async fn run_query(cfg: &Config, text: &str, top_k: usize) -> anyhow::Result<()> {
    if text.trim().is_empty() {
        println!("No results.");
        return Ok(());
    }

    let store = KnowledgeBase::load(&cfg.store.path);
    let embedder = EmbeddingClient::new(&cfg.model)?;
    let query_vec = embedder.embed(text).await?;
    let results = store.search(&query_vec, top_k);

    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        let title = if result.title.is_empty() {
            "(untitled)"
        } else {
            &result.title
        };
        println!("{}. [{:.3}] {}", i + 1, result.score, title);
        println!("    source: {}", result.id);
        println!("    excerpt: \"{}\"", excerpt(&result.text));
        println!();
    }

    Ok(())
}

/// First 240 characters of a chunk, newlines collapsed.
fn excerpt(text: &str) -> String {
    text.chars()
        .take(240)
        .collect::<String>()
        .replace('\n', " ")
        .trim()
        .to_string()
}

/// Run the stats command: print snapshot and model details.
fn run_stats(cfg: &Config) -> anyhow::Result<()> {
    let store = KnowledgeBase::load(&cfg.store.path);
    let snapshot_size = std::fs::metadata(&cfg.store.path)
        .map(|m| m.len())
        .unwrap_or(0);

    println!("Lorekeeper — Knowledge Base Stats");
    println!("=================================");
    println!();
    println!("  Snapshot:    {}", cfg.store.path.display());
    println!("  Size:        {}", format_bytes(snapshot_size));
    println!("  Chunks:      {}", store.len());
    println!();
    println!("  LLM model:   {}", cfg.model.llm);
    println!("  Embed model: {}", cfg.model.embed);

    Ok(())
}

/// Format a byte count in human-readable units.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
