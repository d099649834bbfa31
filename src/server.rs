//! HTTP facade for the knowledge base.
//!
//! Exposes status, ingestion, retrieval, and wipe over a JSON API:
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`    | `/ping`   | Model identifiers and current chunk count |
//! | `POST`   | `/ingest` | Chunk, embed, and store a batch of documents |
//! | `POST`   | `/query`  | Rank stored chunks against a query string |
//! | `DELETE` | `/wipe`   | Clear all records |
//! | `POST`   | `/wipe`   | Legacy alias for clients that cannot issue DELETE |
//!
//! # Error Contract
//!
//! All error responses carry a structured body:
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "query must not be empty" } }
//! ```
//!
//! Error codes: `bad_request` (400), `upstream` (502, the embedding
//! service failed), `internal` (500, snapshot write failure). Malformed
//! requests are rejected before any store mutation.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted — the harvesting
//! collaborator runs in a browser context.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::embedding::EmbeddingClient;
use crate::ingest::ingest_documents;
use crate::models::{Document, ScoredChunk};
use crate::store::KnowledgeBase;

/// Request bodies up to 50 MiB: a full journal export arrives in one call.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Number of results for `/query` when `topK` is omitted.
const DEFAULT_TOP_K: usize = 5;

/// Shared application state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<KnowledgeBase>,
    pub embedder: Arc<EmbeddingClient>,
}

/// Build the router with all routes and middleware attached.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ping", get(handle_ping))
        .route("/ingest", post(handle_ingest))
        .route("/query", post(handle_query))
        .route("/wipe", delete(handle_wipe).post(handle_wipe))
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// Load the knowledge base and serve the HTTP API until terminated.
///
/// Returns an error only for unrecoverable startup conditions (the
/// listen address cannot be bound); request-level failures are answered
/// with structured error responses instead.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let store = Arc::new(KnowledgeBase::load(&config.store.path));
    let embedder = Arc::new(EmbeddingClient::new(&config.model)?);

    tracing::info!(
        records = store.len(),
        snapshot = %config.store.path.display(),
        "knowledge base loaded"
    );

    let bind_addr = config.server.bind.clone();
    let state = AppState {
        config: Arc::new(config.clone()),
        store,
        embedder,
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(
        %bind_addr,
        llm = %config.model.llm,
        embed = %config.model.embed,
        "listening"
    );
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

/// Inner error detail with a machine-readable code and human-readable message.
#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// Constructs a 400 Bad Request error.
fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

/// Constructs a 502 error for embedding service failures.
fn upstream_error(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_GATEWAY,
        code: "upstream".to_string(),
        message: message.into(),
    }
}

/// Constructs a 500 error for persistence failures.
fn internal_error(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

// ============ GET /ping ============

/// JSON response body for `GET /ping`.
#[derive(Serialize)]
struct PingResponse {
    status: String,
    /// Configured completion model identifier.
    llm: String,
    /// Configured embedding model identifier.
    embed: String,
    /// Current total of stored chunk records.
    count: usize,
}

/// Handler for `GET /ping`. No side effects.
async fn handle_ping(State(state): State<AppState>) -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok".to_string(),
        llm: state.config.model.llm.clone(),
        embed: state.config.model.embed.clone(),
        count: state.store.len(),
    })
}

// ============ POST /ingest ============

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IngestRequest {
    docs: Vec<Document>,
    chunk_size: Option<usize>,
    chunk_overlap: Option<usize>,
}

#[derive(Serialize)]
struct IngestResponse {
    /// Chunks embedded and stored by this call.
    added: usize,
    /// Documents submitted in the request.
    docs: usize,
}

/// Handler for `POST /ingest`.
///
/// Chunk parameters default to the configured values when omitted.
/// Embedding failures skip individual chunks and lower `added`; only a
/// malformed request or a snapshot write failure fails the call.
async fn handle_ingest(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<IngestResponse>, AppError> {
    let request: IngestRequest = serde_json::from_value(body)
        .map_err(|e| bad_request(format!("invalid ingest request: {}", e)))?;

    let chunk_size = request
        .chunk_size
        .unwrap_or(state.config.chunking.chunk_size);
    let chunk_overlap = request
        .chunk_overlap
        .unwrap_or(state.config.chunking.chunk_overlap);
    if chunk_size == 0 {
        return Err(bad_request("chunkSize must be at least 1"));
    }

    let summary = ingest_documents(
        &state.store,
        &state.embedder,
        &request.docs,
        chunk_size,
        chunk_overlap,
    )
    .await
    .map_err(|e| internal_error(e.to_string()))?;

    tracing::info!(
        added = summary.added,
        docs = summary.docs,
        skipped = summary.skipped,
        "ingest complete"
    );

    Ok(Json(IngestResponse {
        added: summary.added,
        docs: summary.docs,
    }))
}

// ============ POST /query ============

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest {
    query: String,
    top_k: Option<usize>,
}

#[derive(Serialize)]
struct QueryResponse {
    results: Vec<ScoredChunk>,
}

/// Handler for `POST /query`.
///
/// Embeds the query text and ranks every stored chunk by cosine
/// similarity, most similar first. Records embedded under a different
/// dimensionality are excluded from the scan.
async fn handle_query(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<QueryResponse>, AppError> {
    let request: QueryRequest = serde_json::from_value(body)
        .map_err(|e| bad_request(format!("invalid query request: {}", e)))?;

    if request.query.trim().is_empty() {
        return Err(bad_request("query must not be empty"));
    }
    let top_k = request.top_k.unwrap_or(DEFAULT_TOP_K);

    let query_vec = state
        .embedder
        .embed(&request.query)
        .await
        .map_err(|e| upstream_error(format!("query embedding failed: {}", e)))?;

    let results = state.store.search(&query_vec, top_k);
    Ok(Json(QueryResponse { results }))
}

// ============ /wipe ============

#[derive(Serialize)]
struct WipeResponse {
    wiped: bool,
}

/// Handler for `DELETE /wipe` and its legacy `POST /wipe` alias.
/// Idempotent: wiping an empty store succeeds.
async fn handle_wipe(State(state): State<AppState>) -> Result<Json<WipeResponse>, AppError> {
    state
        .store
        .wipe()
        .map_err(|e| internal_error(e.to_string()))?;
    tracing::info!("knowledge base wiped");
    Ok(Json(WipeResponse { wiped: true }))
}
