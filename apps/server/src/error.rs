//! Error types for the bridge server
//!
//! Failure taxonomy (all request-scoped; the translation path never writes,
//! so one failing request cannot corrupt state for the next):
//! - `MissingParameters` — caller supplied neither code nor text (400).
//! - `SemanticEngine` — the external similarity engine could not be
//!   consulted (502). Deliberately distinct from an empty result so callers
//!   can tell "no mapping exists" from "could not check".
//! - `Database` — mapping/terminology store failure (500).
//!
//! "Nothing found" is NOT an error: it is a 200 with `result: false`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Missing parameters: provide at least a code or a text")]
    MissingParameters,

    #[error("Semantic engine unavailable: {0}")]
    SemanticEngine(#[from] bridge_semantic_client::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Ingestion failed: {0}")]
    Ingest(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Stable machine-readable classification used in the error envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Database(_) => "store_unavailable",
            Error::MissingParameters => "missing_parameters",
            Error::SemanticEngine(_) => "semantic_engine_unavailable",
            Error::NotFound(_) => "not_found",
            Error::Validation(_) => "invalid_request",
            Error::Ingest(_) => "ingestion_failed",
            Error::Other(_) => "internal_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Error::MissingParameters | Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::SemanticEngine(_) => StatusCode::BAD_GATEWAY,
            Error::Ingest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Database(_) | Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        // Server-side failures get logged with detail; the envelope still
        // carries a human-readable string per the API contract.
        let details = match &self {
            Error::Database(e) => {
                tracing::error!(error = %e, "Store failure");
                "terminology store unavailable".to_string()
            }
            Error::Other(e) => {
                tracing::error!(error = %e, "Internal error");
                "internal server error".to_string()
            }
            Error::SemanticEngine(e) => {
                tracing::warn!(error = %e, "Semantic engine failure");
                self.to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(json!({
            "error": self.kind(),
            "details": details,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parameters_is_client_error() {
        assert_eq!(Error::MissingParameters.status(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::MissingParameters.kind(), "missing_parameters");
    }

    #[test]
    fn semantic_failure_is_bad_gateway_not_not_found() {
        let err = Error::SemanticEngine(bridge_semantic_client::Error::Status {
            status: 503,
            body: String::new(),
        });
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.kind(), "semantic_engine_unavailable");
    }

    #[test]
    fn store_failure_is_server_error() {
        let err = Error::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.kind(), "store_unavailable");
    }
}
