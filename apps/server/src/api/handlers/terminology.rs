//! Terminology lookup endpoints

use crate::{
    db::traits::TerminologyStore,
    models::TerminologyEntry,
    state::AppState,
    Error, Result,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

const MAX_SEARCH_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub term: String,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    20
}

/// `GET /terminology/search?term=...&limit=...` — autocomplete over display
/// terms.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<TerminologyEntry>>> {
    if params.term.trim().is_empty() {
        return Err(Error::Validation("term must not be empty".to_string()));
    }
    let limit = params.limit.clamp(1, MAX_SEARCH_LIMIT);

    let entries = state.terminology.search_display(params.term.trim(), limit).await?;
    Ok(Json(entries))
}

/// `GET /terminology/code/:code`
pub async fn get_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<TerminologyEntry>> {
    let entry = state
        .terminology
        .get_by_code(&code)
        .await?
        .ok_or_else(|| Error::NotFound(format!("no terminology entry for code {code}")))?;

    Ok(Json(entry))
}
