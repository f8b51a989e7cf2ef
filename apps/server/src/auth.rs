//! Authentication primitives
//!
//! The service acts as a resource server: an external identity provider
//! issues tokens, this server only validates them. Validation is HS256 with
//! a shared secret from configuration; when auth is disabled every request
//! passes through untouched.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::state::AppState;

/// Authenticated caller, injected into request extensions on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub subject: String,
    pub scopes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    scope: Option<String>,
    #[allow(dead_code)]
    exp: usize,
}

#[derive(Debug, Clone)]
pub enum AuthError {
    MissingToken,
    InvalidToken(String),
}

impl AuthError {
    fn details(&self) -> String {
        match self {
            Self::MissingToken => "missing bearer token".to_string(),
            Self::InvalidToken(msg) => format!("invalid bearer token: {msg}"),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": "unauthorized",
            "details": self.details(),
        }));
        let mut response = (StatusCode::UNAUTHORIZED, body).into_response();
        response.headers_mut().insert(
            header::WWW_AUTHENTICATE,
            header::HeaderValue::from_static("Bearer"),
        );
        response
    }
}

/// Bearer-token gate applied to protected routes.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth = &state.config.auth;
    if !auth.enabled {
        return next.run(request).await;
    }

    let path = request.uri().path();
    if auth.public_paths.iter().any(|p| p == path) {
        return next.run(request).await;
    }

    let token = match bearer_token(&request) {
        Some(t) => t,
        None => return AuthError::MissingToken.into_response(),
    };

    match validate_token(&token, &auth.secret) {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(String::from)
}

fn validate_token(token: &str, secret: &str) -> Result<Principal, AuthError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let data = decode::<Claims>(token, &key, &validation)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    Ok(Principal {
        subject: data.claims.sub,
        scopes: data
            .claims
            .scope
            .map(|s| s.split_whitespace().map(String::from).collect())
            .unwrap_or_default(),
    })
}
