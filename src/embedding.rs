//! Embedding model client and vector math.
//!
//! [`EmbeddingClient`] is a thin adapter over an Ollama-compatible
//! `/api/embed` endpoint. It carries no retry policy: a failed call is an
//! error the caller decides how to handle (ingestion skips the chunk).
//! The configured request timeout bounds a hung upstream.
//!
//! Embedding services do not agree on a response shape, so the parser
//! accepts a top-level `embedding` array, the batched `embeddings[0]`
//! form, or the OpenAI-style `data[0].embedding`.

use std::time::Duration;

use anyhow::{anyhow, bail, Result};

use crate::config::ModelConfig;

/// HTTP client for the configured embedding model.
pub struct EmbeddingClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl EmbeddingClient {
    /// Build a client from the model configuration.
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.embed.clone(),
        })
    }

    /// Identifier of the embedding model this client requests.
    pub fn model_name(&self) -> &str {
        &self.model
    }

    /// Embed a single text, returning its vector.
    ///
    /// # Errors
    ///
    /// Fails on network errors, timeouts, non-success status codes,
    /// unparseable responses, and responses with no embedding field.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let body = serde_json::json!({
            "model": self.model,
            "input": text,
        });

        let response = self
            .http
            .post(format!("{}/api/embed", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("embedding API error {}: {}", status, body_text);
        }

        let json: serde_json::Value = response.json().await?;
        parse_embedding(&json)
    }
}

/// Extract the embedding vector from a model service response.
fn parse_embedding(json: &serde_json::Value) -> Result<Vec<f32>> {
    let field = json
        .get("embedding")
        .or_else(|| json.get("embeddings").and_then(|e| e.get(0)))
        .or_else(|| {
            json.get("data")
                .and_then(|d| d.get(0))
                .and_then(|item| item.get("embedding"))
        });

    let values = field
        .and_then(|f| f.as_array())
        .ok_or_else(|| anyhow!("embedding response has no embedding field"))?;

    Ok(values
        .iter()
        .map(|v| v.as_f64().unwrap_or(0.0) as f32)
        .collect())
}

/// Compute cosine similarity between two embedding vectors.
///
/// Returns a value in `[-1.0, 1.0]`:
/// - `1.0` = identical direction
/// - `0.0` = orthogonal (unrelated)
/// - `-1.0` = opposite direction
///
/// Returns `0.0` for empty vectors, vectors of different lengths, or
/// zero-magnitude vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    dot / denom
}
