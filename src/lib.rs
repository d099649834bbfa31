//! # Lorekeeper
//!
//! A self-hosted RAG knowledge base for game-world lore. Documents go in,
//! overlapping chunks come back out ranked by semantic similarity.
//!
//! ```text
//! ┌────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Documents  │──▶│   Pipeline     │──▶│  Knowledge     │
//! │ {id,title, │   │ chunk + embed │   │  base (JSON    │
//! │  content}  │   └───────┬───────┘   │  snapshot)     │
//! └────────────┘           │           └───────┬───────┘
//!                  ┌───────▼───────┐           │
//!                  │    Ollama      │   ┌───────▼───────┐
//!                  │  /api/embed    │   │  HTTP + CLI    │
//!                  └───────────────┘   └───────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`chunk`] | Sliding-window text chunking |
//! | [`embedding`] | Embedding model client and vector math |
//! | [`store`] | In-memory knowledge base with a JSON snapshot |
//! | [`retrieval`] | Exact top-K cosine ranking |
//! | [`ingest`] | Best-effort ingestion pipeline |
//! | [`server`] | HTTP facade |

pub mod chunk;
pub mod config;
pub mod embedding;
pub mod ingest;
pub mod models;
pub mod retrieval;
pub mod server;
pub mod store;
