//! TOML configuration.
//!
//! Every field has a default matching the conventional local Ollama
//! setup, so the server runs with no config file at all; a file overrides
//! only the keys it sets. A missing file is not an error — an unreadable
//! or invalid one is.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Listen address for the HTTP facade.
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// Base URL of the Ollama-compatible model service.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Completion model identifier, reported by `/ping`.
    #[serde(default = "default_llm_model")]
    pub llm: String,
    /// Embedding model identifier.
    #[serde(default = "default_embed_model")]
    pub embed: String,
    /// Per-request timeout for embedding calls, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    /// Window length in characters.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Characters shared between consecutive windows.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Path of the JSON snapshot file.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            llm: default_llm_model(),
            embed: default_embed_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:3033".to_string()
}
fn default_base_url() -> String {
    "http://127.0.0.1:11434".to_string()
}
fn default_llm_model() -> String {
    "qwen2.5:14b".to_string()
}
fn default_embed_model() -> String {
    "nomic-embed-text".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_chunk_size() -> usize {
    1200
}
fn default_chunk_overlap() -> usize {
    200
}
fn default_store_path() -> PathBuf {
    PathBuf::from("kb.json")
}

/// Load configuration from `path`, falling back to built-in defaults when
/// the file does not exist.
pub fn load_config(path: &Path) -> Result<Config> {
    let config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content).with_context(|| "Failed to parse config file")?
    } else {
        Config::default()
    };

    // Validate chunking
    if config.chunking.chunk_size == 0 {
        bail!("chunking.chunk_size must be > 0");
    }

    // Validate model service
    if config.model.base_url.trim().is_empty() {
        bail!("model.base_url must not be empty");
    }
    if config.model.timeout_secs == 0 {
        bail!("model.timeout_secs must be > 0");
    }

    // Validate server
    if config.server.bind.trim().is_empty() {
        bail!("server.bind must not be empty");
    }

    Ok(config)
}
