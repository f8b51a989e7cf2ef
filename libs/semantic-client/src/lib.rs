//! Semantic Engine Client
//!
//! Thin async client over the external embedding/similarity microservice. The
//! engine owns the vector index and the embedding model; this crate only
//! speaks its two endpoints: ranked similarity search and administrative
//! embedding registration (the latter is used by ingestion, never by the
//! translation path).
//!
//! No retry policy is applied here: a single failed call surfaces as
//! [`Error`] so callers can distinguish "engine said nothing matches" from
//! "engine could not be reached".
//!
//! # Examples
//!
//! ```rust,no_run
//! use bridge_semantic_client::SemanticClient;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SemanticClient::new("http://localhost:5000", Duration::from_secs(5))?;
//! let candidates = client.search("chronic watery diarrhoea", 3).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod models;

pub use error::{Error, Result};
pub use models::{Candidate, RegisterRequest, RegisterResponse, SearchRequest, SearchResponse};

use std::time::Duration;

/// Client for the semantic-search engine.
///
/// Cheap to clone; the underlying `reqwest::Client` is reference-counted.
#[derive(Debug, Clone)]
pub struct SemanticClient {
    http: reqwest::Client,
    base_url: String,
}

impl SemanticClient {
    /// Build a client for the engine at `base_url`.
    ///
    /// `timeout` bounds every request end-to-end; a hung engine fails the
    /// call instead of hanging the request that triggered it.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        if base_url.is_empty() {
            return Err(Error::Configuration("empty base URL".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Similarity search: top `top_k` candidate codes for `query`, most
    /// relevant first, in engine order.
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<Candidate>> {
        let url = format!("{}/semantic_search", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&SearchRequest { query, top_k })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::MalformedResponse(e.to_string()))?;

        tracing::debug!(
            query_len = query.len(),
            candidates = parsed.suggestions.len(),
            "Semantic search completed"
        );

        Ok(parsed.suggestions)
    }

    /// Register (or refresh) the embedding for one code.
    ///
    /// Administrative call used during ingestion. Must not be called from the
    /// translation path.
    pub async fn register_embedding(&self, id: &str, text: &str) -> Result<()> {
        let url = format!("{}/add-embedding", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&RegisterRequest { id, text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: RegisterResponse = response
            .json()
            .await
            .map_err(|e| Error::MalformedResponse(e.to_string()))?;

        // The engine reports validation problems with a 200 + error status.
        if parsed.status != "success" {
            return Err(Error::MalformedResponse(format!(
                "engine rejected embedding for {id}: {}",
                parsed.message.unwrap_or_default()
            )));
        }

        Ok(())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
