//! Error types for the semantic-search client

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Semantic engine client errors
///
/// Every variant means the engine could not be consulted; callers must not
/// collapse these into an empty result set.
#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Semantic engine returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed semantic engine response: {0}")]
    MalformedResponse(String),

    #[error("Invalid client configuration: {0}")]
    Configuration(String),
}
