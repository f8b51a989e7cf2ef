//! Wire types for the semantic engine API

use serde::{Deserialize, Serialize};

/// One ranked candidate returned by the engine, most relevant first.
///
/// Scores come from the engine unmodified; the engine documents them as
/// cosine similarities but no range is enforced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub code: String,
    pub score: f64,
}

/// Body for `POST /semantic_search`
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
    pub top_k: usize,
}

/// Response from `POST /semantic_search`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub suggestions: Vec<Candidate>,
}

/// Body for `POST /add-embedding`
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub id: &'a str,
    pub text: &'a str,
}

/// Response from `POST /add-embedding`
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}
